//! CLI command implementations.

pub mod build;
pub mod console;
pub mod dashboard;
pub mod discover;
pub mod executor;
pub mod feed;
pub mod monitor;
pub mod queue;
pub mod version;

use anyhow::{Context, Result};
use clap::Args;
use nestor_client::{Client, JobStatus};
use std::time::Duration;

/// How to reach the Jenkins server.
#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Jenkins URL
    #[arg(
        long,
        env = "JENKINS_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub url: String,

    /// User name for basic auth
    #[arg(long, env = "JENKINS_USER", global = true)]
    pub user: Option<String>,

    /// API token for basic auth
    #[arg(long, env = "JENKINS_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    pub timeout: u64,
}

impl ServerArgs {
    /// Build a client from the arguments.
    pub fn connect(&self) -> Result<Client> {
        let mut client = Client::new(&self.url)
            .with_context(|| format!("Invalid Jenkins URL: {}", self.url))?
            .with_timeout(Duration::from_secs(self.timeout))
            .context("Failed to create HTTP client")?;

        if let Some(ref user) = self.user {
            client = client.with_credentials(user, self.token.as_deref().unwrap_or_default());
        }

        tracing::debug!(url = %client.base_url(), "Client ready");
        Ok(client)
    }
}

/// Status label colored for the terminal.
pub fn paint(status: &JobStatus) -> String {
    let code = match status {
        JobStatus::Ok => "32",
        JobStatus::Warn => "33",
        JobStatus::Fail => "31",
        JobStatus::Aborted => "90",
        JobStatus::Unknown(_) => "0",
    };
    format!("\x1b[{}m{}\x1b[0m", code, status)
}
