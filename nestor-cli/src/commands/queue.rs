//! Queue command.

use anyhow::{Context, Result};
use nestor_client::Client;

/// Show the jobs waiting for an executor.
pub async fn run(client: &Client) -> Result<()> {
    let queue = client.queue().await.context("Failed to read queue")?;

    if queue.is_empty() {
        println!("Queue is empty");
    }
    for job in queue {
        println!("- {}", job);
    }
    Ok(())
}
