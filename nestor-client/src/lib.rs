//! Async Rust client for the Jenkins HTTP management API.
//!
//! # Features
//!
//! - Build triggering, with parameters or in bulk by dashboard status
//! - Dashboard, job, queue and executor readers
//! - Live console streaming of the last build of a job
//! - Aggregate status derivation and periodic monitoring on a cron schedule
//! - UDP discovery of Jenkins instances on the network
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use nestor_client::{Client, ConsoleEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("http://localhost:8080")?
//!     .with_credentials("admin", "api-token");
//!
//! client.build("my-app", Some("branch=main")).await?;
//!
//! let mut console = client.console("my-app");
//! while let Some(event) = console.next().await {
//!     if let ConsoleEvent::Data(text) = event? {
//!         print!("{}", String::from_utf8_lossy(&text));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`, with one variant per failure
//! callers typically react to:
//!
//! ```no_run
//! # use nestor_client::{Client, ClientError};
//! # async fn example() -> Result<(), ClientError> {
//! # let client = Client::new("http://localhost:8080")?;
//! match client.build("my-app", None).await {
//!     Ok(()) => println!("Build triggered"),
//!     Err(ClientError::JobNotFound(name)) => println!("No job named {}", name),
//!     Err(ClientError::ParametersRequired(_)) => println!("Pass build parameters"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod builds;
mod client;
mod console;
mod discovery;
mod error;
mod executors;
mod jobs;
mod monitor;
mod queue;
mod server;
mod status;
mod types;

pub use builds::parse_params;
pub use client::{Client, DEFAULT_POLL_INTERVAL};
pub use console::{
    ConsoleEvent, ConsoleStream, FetchFuture, LastBuildConsole, ProgressiveChunk,
    ProgressiveSource, StopHandle,
};
pub use discovery::{DISCOVERY_PORT, DISCOVERY_TIMEOUT, Discovery, discover};
pub use error::{ClientError, Result};
pub use executors::running_job_name;
pub use monitor::{DEFAULT_SCHEDULE, Monitor, MonitorHandle, MonitorOptions};
pub use status::{JobStatus, aggregate};
pub use types::{
    BuildCriteria, BuildParameter, DiscoveryInfo, ExecutorStatus, FeedScope, JobDetail,
    JobSummary, NodeExecutors,
};
