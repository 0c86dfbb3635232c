//! Build, build-by and stop commands.

use anyhow::{Context, Result};
use nestor_client::{BuildCriteria, Client, JobStatus};
use std::time::Duration;

/// Trigger a build, optionally tailing its console.
pub async fn run(
    client: &Client,
    job: &str,
    params: Option<&str>,
    console: bool,
    pending_ms: u64,
) -> Result<()> {
    client
        .build(job, params)
        .await
        .with_context(|| format!("Failed to build {}", job))?;
    println!("Job {} was started successfully", job);

    if console {
        // The build sits in the queue for a while; the console would show the previous build.
        tokio::time::sleep(Duration::from_millis(pending_ms)).await;
        super::console::run(client, job).await?;
    }

    Ok(())
}

/// Trigger builds of every job in a status.
pub async fn by_status(client: &Client, status: Option<&str>) -> Result<()> {
    let criteria = BuildCriteria {
        status: status.map(|s| s.parse::<JobStatus>().unwrap_or_else(|never| match never {})),
    };

    let built = client
        .build_by(&criteria)
        .await
        .context("Failed to trigger builds")?;

    if built.is_empty() {
        println!("No job matched");
    }
    for job in built {
        println!("Job {} was started successfully", job);
    }

    Ok(())
}

/// Stop the last build of a job.
pub async fn stop(client: &Client, job: &str) -> Result<()> {
    client
        .stop(job)
        .await
        .with_context(|| format!("Failed to stop {}", job))?;
    println!("Job {} was stopped successfully", job);
    Ok(())
}
