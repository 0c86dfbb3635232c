//! Discover command.

use anyhow::{Context, Result};

/// Look for a Jenkins instance on `host`.
pub async fn run(host: &str) -> Result<()> {
    let info = nestor_client::discover(host)
        .await
        .with_context(|| format!("Discovery on {} failed", host))?;

    println!(
        "Jenkins {} running at {}",
        info.version.as_deref().unwrap_or("(unknown version)"),
        info.url.as_deref().unwrap_or("(no URL configured)")
    );
    if let Some(id) = info.server_id {
        println!("Server id: {}", id);
    }
    Ok(())
}
