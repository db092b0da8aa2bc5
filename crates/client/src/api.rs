//! REST client for the Framemark server.
//!
//! Wraps the JSON endpoints and static frame URLs using [`reqwest`].

use async_trait::async_trait;
use framemark_core::contract::{AnnotateRequest, AnnotateResponse, ErrorBody, VideoData};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Fallback message when a failed save returns no readable error body.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Everything the driver needs from the server.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// `GET /api/videos`.
    async fn list_videos(&self) -> Result<Vec<String>, ClientError>;

    /// `GET /api/video_data/{video}`.
    async fn video_data(&self, video: &str) -> Result<VideoData, ClientError>;

    /// `POST /api/annotate`.
    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, ClientError>;

    /// Fetch a frame image by its server-relative URL and discard the bytes.
    async fn preload_image(&self, url: &str) -> Result<(), ClientError>;
}

/// HTTP client for a single Framemark server.
#[derive(Debug)]
pub struct FramemarkApi {
    client: reqwest::Client,
    base_url: Url,
}

impl FramemarkApi {
    /// * `api_url` - Base HTTP URL, e.g. `http://127.0.0.1:5001`.
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(api_url).map_err(|e| ClientError::InvalidUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: api_url.to_string(),
                reason: "not a base URL".into(),
            });
        }
        Ok(Self { client, base_url })
    }

    /// Base URL extended with `segments`, each percent-encoded on its own.
    pub fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    ///
    /// On failure the `message` of a JSON error body is used, falling back to
    /// `fallback(status)` when the body is unreadable or carries no message.
    async fn ensure_success(
        response: reqwest::Response,
        fallback: impl FnOnce(u16) -> String,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| fallback(status.as_u16()));
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for FramemarkApi {
    async fn list_videos(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .client
            .get(self.endpoint(["api", "videos"])?)
            .send()
            .await?;
        let response = Self::ensure_success(response, |status| format!("Server error: {status}")).await?;
        Self::parse_json(response).await
    }

    async fn video_data(&self, video: &str) -> Result<VideoData, ClientError> {
        let response = self
            .client
            .get(self.endpoint(["api", "video_data", video])?)
            .send()
            .await?;
        let response = Self::ensure_success(response, |status| format!("Server error: {status}")).await?;
        Self::parse_json(response).await
    }

    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint(["api", "annotate"])?)
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response, |_| UNKNOWN_ERROR.to_string()).await?;
        Self::parse_json(response).await
    }

    /// `url` is a raw server path such as `/static/frames/{video}/{folder}/{file}`.
    async fn preload_image(&self, url: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .get(self.endpoint(url.trim_start_matches('/').split('/'))?)
            .send()
            .await?;
        let response = Self::ensure_success(response, |status| format!("Image load failed: {status}")).await?;
        response.bytes().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn endpoint_encodes_each_segment() {
        let api = FramemarkApi::new("http://127.0.0.1:5001").unwrap();
        let url = api.endpoint(["api", "video_data", "clip #1?v 2"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5001/api/video_data/clip%20%231%3Fv%202"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let api = FramemarkApi::new("http://example.com/framemark").unwrap();
        let url = api.endpoint(["api", "videos"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/framemark/api/videos");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert_matches!(
            FramemarkApi::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        );
        assert_matches!(
            FramemarkApi::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl { .. })
        );
    }
}
