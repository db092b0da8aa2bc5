use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use framemark_client::commands::{parse_command, Command};
use framemark_client::config::ClientConfig;
use framemark_client::{Driver, FramemarkApi, TextSurface};
use framemark_core::InputEvent;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing (stderr, so it does not interleave with the surface) ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "framemark_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, "Loaded client configuration");

    // --- Driver ---
    let api = FramemarkApi::new(&config.api_url).expect("Invalid FRAMEMARK_API_URL");
    let backend = Arc::new(api);
    let (driver, handle) = Driver::new(backend, TextSurface::stdout());
    let driver_task = tokio::spawn(driver.run());

    // --- Input loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl-C), shutting down");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        };

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Events(events)) => {
                for event in events {
                    handle.send(event);
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    handle.send(InputEvent::FocusLost);
    handle.shutdown();
    if let Err(e) = driver_task.await {
        tracing::error!(error = %e, "Driver task failed");
    }
}
