//! Dashboard and job commands.

use super::paint;
use anyhow::{Context, Result};
use nestor_client::Client;

/// Show the status of every job, or of the jobs in a view.
pub async fn run(client: &Client, view: Option<&str>) -> Result<()> {
    let jobs = match view {
        Some(view) => client.view_dashboard(view).await,
        None => client.dashboard().await,
    }
    .context("Failed to read dashboard")?;

    if jobs.is_empty() {
        println!("Jobless Jenkins");
        return Ok(());
    }

    for job in jobs {
        println!("{} - {}", paint(&job.status), job.name);
    }
    Ok(())
}

/// Show the status and health reports of a job.
pub async fn job(client: &Client, name: &str) -> Result<()> {
    let job = client
        .job(name)
        .await
        .with_context(|| format!("Failed to read job {}", name))?;

    println!("{} | {}", job.name, paint(&job.status));
    for report in job.reports {
        println!(" - {}", report);
    }
    Ok(())
}
