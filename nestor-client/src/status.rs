//! Status vocabulary: color tokens to coarse job outcomes.

use crate::types::JobSummary;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Suffix Jenkins appends to a color token while a build is running.
const BUILDING_SUFFIX: &str = "_anime";

/// Known statuses, most severe first.
const SEVERITY_ORDER: [JobStatus; 4] = [
    JobStatus::Fail,
    JobStatus::Warn,
    JobStatus::Aborted,
    JobStatus::Ok,
];

/// Coarse outcome of a job's last build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Last build succeeded (`blue`, `green`).
    Ok,
    /// Last build was unstable (`yellow`).
    Warn,
    /// Last build failed (`red`).
    Fail,
    /// Last build was aborted (`grey`).
    Aborted,
    /// Any other token, uppercased (e.g. `DISABLED`, `NOTBUILT`).
    Unknown(String),
}

impl JobStatus {
    /// Map a raw color token to a status.
    ///
    /// The `_anime` suffix only says a build is in progress and is ignored.
    /// Unrecognised tokens are kept, uppercased, so newer servers still render.
    pub fn classify(token: &str) -> Self {
        let token = token.strip_suffix(BUILDING_SUFFIX).unwrap_or(token);
        match token {
            "blue" | "green" => JobStatus::Ok,
            "grey" => JobStatus::Aborted,
            "red" => JobStatus::Fail,
            "yellow" => JobStatus::Warn,
            other => JobStatus::Unknown(other.to_uppercase()),
        }
    }

    /// Status label as shown to users.
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Ok => "OK",
            JobStatus::Warn => "WARN",
            JobStatus::Fail => "FAIL",
            JobStatus::Aborted => "ABORTED",
            JobStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Ok(match upper.as_str() {
            "OK" => JobStatus::Ok,
            "WARN" => JobStatus::Warn,
            "FAIL" => JobStatus::Fail,
            "ABORTED" => JobStatus::Aborted,
            _ => JobStatus::Unknown(upper),
        })
    }
}

/// Derive one status for a set of jobs.
///
/// With `job_name`, only that job is considered. Returns the most severe known
/// status present, or `None` when there are no jobs or only unknown statuses.
pub fn aggregate(jobs: &[JobSummary], job_name: Option<&str>) -> Option<JobStatus> {
    let present: HashSet<&JobStatus> = jobs
        .iter()
        .filter(|job| job_name.is_none_or(|name| job.name == name))
        .map(|job| &job.status)
        .collect();

    SEVERITY_ORDER
        .iter()
        .find(|status| present.contains(status))
        .cloned()
}
