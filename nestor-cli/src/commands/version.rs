//! Version command - show client and server versions.

use anyhow::{Context, Result};
use nestor_client::Client;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub async fn run(client: &Client) -> Result<()> {
    let server = client
        .version()
        .await
        .with_context(|| format!("Failed to reach {}", client.base_url()))?;

    println!("nestor {}", VERSION);
    println!("Jenkins {} at {}", server, client.base_url());
    Ok(())
}
