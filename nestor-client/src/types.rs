//! Type definitions for the Jenkins client.

use crate::status::JobStatus;
use serde::{Deserialize, Serialize};

/// A job as listed on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    /// Job name.
    pub name: String,
    /// Status derived from the job's color token.
    pub status: JobStatus,
}

/// Status and health of a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetail {
    /// Job name.
    pub name: String,
    /// Status derived from the job's color token.
    pub status: JobStatus,
    /// Health report descriptions, as reported by the server.
    pub reports: Vec<String>,
}

/// State of one executor on a compute node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorStatus {
    /// Display name of the owning node.
    pub node_name: String,
    /// Whether the executor is idle.
    pub idle: bool,
    /// Whether the server considers the running build stuck.
    pub stuck: bool,
    /// Progress of the running build in percent, when known.
    pub progress: Option<i64>,
    /// Name of the running job, derived with [`crate::running_job_name`].
    pub running_job: Option<String>,
}

/// Executors of one compute node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeExecutors {
    /// Display name of the node.
    pub node_name: String,
    /// Executors in server order.
    pub executors: Vec<ExecutorStatus>,
}

/// A name/value pair sent with a parameterized build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

/// Jobs to select in [`crate::Client::build_by`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCriteria {
    /// Only build jobs currently in this status. `None` builds every job.
    pub status: Option<JobStatus>,
}

/// Which feed to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Every build on the server.
    All,
    /// Builds of one job.
    Job(String),
    /// Builds of the jobs in one view.
    View(String),
}

/// Reply to a discovery broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscoveryInfo {
    /// Server version.
    pub version: Option<String>,
    /// Root URL configured on the server.
    pub url: Option<String>,
    /// Unique identifier of the instance.
    #[serde(rename = "server-id")]
    pub server_id: Option<String>,
    /// TCP port for inbound agents.
    #[serde(rename = "slave-port")]
    pub agent_port: Option<u16>,
}
