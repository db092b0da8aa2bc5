/// Errors from talking to the Framemark server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a fallback when the body had none.
        message: String,
    },

    /// The configured server URL cannot be used as a base for requests.
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Text suitable for a toast: the server's own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_surface_the_server_message() {
        let err = ClientError::Api {
            status: 500,
            message: "disk full".into(),
        };
        assert_eq!(err.user_message(), "disk full");
        assert_eq!(err.to_string(), "API error (500): disk full");
    }
}
