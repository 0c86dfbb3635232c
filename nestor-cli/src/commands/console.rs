//! Console command - tail a build console.

use anyhow::{Context, Result};
use futures::StreamExt;
use nestor_client::{Client, ConsoleEvent};
use std::io::Write;

/// Stream the console of the last build of `job` to stdout until it ends or Ctrl+C.
pub async fn run(client: &Client, job: &str) -> Result<()> {
    let mut console = client.console(job);
    let stop = console.stop_handle();

    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping console stream");
            stop.stop();
        }
    });

    let mut stdout = std::io::stdout();
    while let Some(event) = console.next().await {
        match event.with_context(|| format!("Failed to read console of {}", job))? {
            ConsoleEvent::Data(text) => {
                stdout.write_all(&text)?;
                stdout.flush()?;
            }
            ConsoleEvent::End => tracing::debug!(job = %job, "Console ended"),
        }
    }

    ctrl_c.abort();
    Ok(())
}
