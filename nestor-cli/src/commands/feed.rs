//! Feed command.

use anyhow::{Context, Result};
use nestor_client::{Client, FeedScope};

/// Print the RSS feed of all builds, of a job, or of a view.
pub async fn run(client: &Client, job: Option<String>, view: Option<String>) -> Result<()> {
    let scope = match (job, view) {
        (Some(job), _) => FeedScope::Job(job),
        (None, Some(view)) => FeedScope::View(view),
        (None, None) => FeedScope::All,
    };

    let feed = client.feed(&scope).await.context("Failed to read feed")?;
    println!("{}", feed);
    Ok(())
}
