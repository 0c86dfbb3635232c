//! Error types for the Jenkins client.

use thiserror::Error;

/// Errors that can occur when using the Jenkins client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the supplied credentials (401).
    #[error("Authentication failed, check the username and API token")]
    AuthenticationFailed,

    /// The server requires credentials for this operation (403).
    #[error("Authentication required, supply a username and API token")]
    AuthenticationRequired,

    /// Job does not exist (404 on a job endpoint).
    #[error("Job {0} does not exist")]
    JobNotFound(String),

    /// Legacy servers answer 405 when a parameterized job is built without parameters.
    #[error("Job {0} requires build parameters")]
    ParametersRequired(String),

    /// View does not exist (404 on a view endpoint).
    #[error("View {0} does not exist")]
    ViewNotFound(String),

    /// The server did not send the `x-jenkins` version header.
    #[error("Not a Jenkins server")]
    NotAJenkinsServer,

    /// No discovery reply arrived before the timeout.
    #[error("Unable to find any Jenkins instance")]
    DiscoveryTimeout,

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket level failure (discovery).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to deserialize a JSON response.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Failed to deserialize an XML payload.
    #[error("Failed to parse XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Server returned a status code no operation expects.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid cron expression for the monitor.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A monitor can only be run once.
    #[error("Monitor is already running or has finished")]
    MonitorAlreadyRun,

    /// Response was missing something the operation needs.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
