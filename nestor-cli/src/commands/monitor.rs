//! Monitor command.

use super::paint;
use anyhow::{Context, Result};
use nestor_client::{Client, Monitor, MonitorOptions};

/// Print the aggregate status now and on every scheduled tick, until Ctrl+C.
pub async fn run(
    client: Client,
    job: Option<String>,
    view: Option<String>,
    schedule: Option<String>,
) -> Result<()> {
    let options = MonitorOptions {
        job_name: job,
        view_name: view,
        schedule,
    };
    let monitor = Monitor::new(client, options).context("Failed to create monitor")?;
    let handle = monitor.handle();

    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    monitor
        .run(|result| match result {
            Ok(Some(status)) => println!("{}", paint(&status)),
            Ok(None) => println!("No known status"),
            Err(e) => eprintln!("Monitor check failed: {}", e),
        })
        .await?;

    ctrl_c.abort();
    Ok(())
}
