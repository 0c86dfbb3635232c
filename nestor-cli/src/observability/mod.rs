//! Logging setup for the CLI.
//!
//! The log format is controlled via the `NESTOR_LOG_FORMAT` env var:
//! - `json` - Structured JSON output
//! - `pretty` - Human-readable multi-line output
//! - `compact` - Compact single-line format (default)
//!
//! Logs are written to stderr so command output on stdout stays pipeable.

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig};
pub use tracing_setup::init_tracing;
