use std::time::Duration;

use serde_json::json;
use tiingo_rs::{StreamBuilder, StreamState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // The authorization field is filled from TIINGO_API_KEY.
    let session = StreamBuilder::new()
        .config(json!({
            "eventName": "subscribe",
            "eventData": { "thresholdLevel": 5 }
        }))
        .channel("iex")
        .on_message(|msg| println!("{msg}"))
        .build()?;

    let mut state = session.state();
    let handle = session.spawn();

    let reached = *state.wait_for(|s| *s != StreamState::Connecting).await?;
    if reached == StreamState::Closed {
        return Ok(handle.wait().await?);
    }
    println!("subscribed; streaming for 30 seconds");

    tokio::time::sleep(Duration::from_secs(30)).await;
    handle.stop().await?;
    Ok(())
}
