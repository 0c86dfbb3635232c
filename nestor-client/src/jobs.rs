//! Dashboard and job readers.

use crate::client::{Client, Request};
use crate::error::{ClientError, Result};
use crate::status::JobStatus;
use crate::types::{JobDetail, JobSummary};
use serde::Deserialize;

/// Response from `/api/json` and `/view/{name}/api/json`.
#[derive(Debug, Deserialize)]
struct DashboardResponse {
    #[serde(default)]
    jobs: Vec<DashboardJob>,
}

#[derive(Debug, Deserialize)]
struct DashboardJob {
    name: String,
    /// Folders and other non-buildable items carry no color.
    color: Option<String>,
}

/// Response from `/job/{name}/api/json`.
#[derive(Debug, Deserialize)]
struct JobResponse {
    color: Option<String>,
    #[serde(default, rename = "healthReport")]
    health_report: Vec<HealthReport>,
}

#[derive(Debug, Deserialize)]
struct HealthReport {
    description: String,
}

fn status_of(color: Option<&str>) -> JobStatus {
    JobStatus::classify(color.unwrap_or_default())
}

impl Client {
    /// List every job on the server with its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or credentials are rejected.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nestor_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// for job in client.dashboard().await? {
    ///     println!("{} - {}", job.status, job.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dashboard(&self) -> Result<Vec<JobSummary>> {
        let reply = self
            .send(&Request::get("api/json"))
            .await?
            .into_reply(|| crate::client::resource_not_found("api/json"))?;

        Ok(summaries(reply.json()?))
    }

    /// List the jobs of a view with their status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ViewNotFound`] if the view does not exist.
    pub async fn view_dashboard(&self, view_name: &str) -> Result<Vec<JobSummary>> {
        let path = format!("view/{}/api/json", view_name);
        let reply = self
            .send(&Request::get(path))
            .await?
            .into_reply(|| ClientError::ViewNotFound(view_name.to_string()))?;

        Ok(summaries(reply.json()?))
    }

    /// Get the status and health reports of a job.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobNotFound`] if the job does not exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nestor_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// let job = client.job("my-app").await?;
    /// println!("{} | {}", job.name, job.status);
    /// for report in &job.reports {
    ///     println!("  - {}", report);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn job(&self, name: &str) -> Result<JobDetail> {
        let path = format!("job/{}/api/json", name);
        let reply = self
            .send(&Request::get(path))
            .await?
            .into_reply(|| ClientError::JobNotFound(name.to_string()))?;

        let job: JobResponse = reply.json()?;
        Ok(JobDetail {
            name: name.to_string(),
            status: status_of(job.color.as_deref()),
            reports: job
                .health_report
                .into_iter()
                .map(|r| r.description)
                .collect(),
        })
    }
}

fn summaries(response: DashboardResponse) -> Vec<JobSummary> {
    response
        .jobs
        .into_iter()
        .map(|j| JobSummary {
            status: status_of(j.color.as_deref()),
            name: j.name,
        })
        .collect()
}
