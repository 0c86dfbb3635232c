//! Build trigger operations.

use crate::client::{Client, Outcome, Request};
use crate::error::{ClientError, Result};
use crate::types::{BuildCriteria, BuildParameter};
use futures::future::join_all;
use serde_json::json;

/// Token sent with every remote build trigger.
const BUILD_TOKEN: &str = "nestor";

/// Split a raw `key=value&key=value` string into build parameters.
///
/// Order is preserved. There is no decoding: a value cannot contain `&`, and
/// anything after a second `=` is dropped. A key without `=` gets an empty value.
pub fn parse_params(raw: &str) -> Vec<BuildParameter> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.split('=');
            BuildParameter {
                name: parts.next().unwrap_or_default().to_string(),
                value: parts.next().unwrap_or_default().to_string(),
            }
        })
        .collect()
}

impl Client {
    /// Trigger a build of a job.
    ///
    /// # Arguments
    ///
    /// * `job_name` - Job to build
    /// * `params` - Optional `key=value&key=value` build parameters
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobNotFound`] if the job does not exist and
    /// [`ClientError::ParametersRequired`] if a legacy server refuses a build
    /// without parameters.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nestor_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = Client::new("http://localhost:8080")?;
    /// client.build("my-app", Some("branch=main&deploy=true")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(&self, job_name: &str, params: Option<&str>) -> Result<()> {
        let parameters = params.map(parse_params).unwrap_or_default();
        let request = Request::post(format!("job/{}/build", job_name))
            .query("token", BUILD_TOKEN)
            .json(json!({ "parameter": parameters }));

        match self.send(&request).await? {
            Outcome::Success(reply) => {
                tracing::info!(
                    job = %job_name,
                    status = reply.status.as_u16(),
                    parameters = parameters.len(),
                    "Build triggered"
                );
                Ok(())
            }
            Outcome::MethodNotAllowed => Err(ClientError::ParametersRequired(job_name.to_string())),
            other => other
                .into_reply(|| ClientError::JobNotFound(job_name.to_string()))
                .map(|_| ()),
        }
    }

    /// Trigger builds of every dashboard job matching the criteria.
    ///
    /// All builds are triggered concurrently and awaited together. Returns the
    /// names of the triggered jobs, or the first error in dashboard order once
    /// every trigger has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the dashboard cannot be read or any trigger fails.
    pub async fn build_by(&self, criteria: &BuildCriteria) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .dashboard()
            .await?
            .into_iter()
            .filter(|job| criteria.status.as_ref().is_none_or(|s| &job.status == s))
            .map(|job| job.name)
            .collect();

        tracing::info!(jobs = names.len(), "Triggering builds");

        let results = join_all(names.iter().map(|name| self.build(name, None))).await;
        results.into_iter().collect::<Result<Vec<()>>>()?;

        Ok(names)
    }

    /// Stop the last build of a job.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobNotFound`] if the job does not exist.
    pub async fn stop(&self, job_name: &str) -> Result<()> {
        let request = Request::post(format!("job/{}/lastBuild/stop", job_name));
        self.send(&request)
            .await?
            .into_reply(|| ClientError::JobNotFound(job_name.to_string()))?;

        tracing::info!(job = %job_name, "Build stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, value: &str) -> BuildParameter {
        BuildParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn parse_params_keeps_order() {
        assert_eq!(
            parse_params("k1=v1&k2=v2"),
            vec![param("k1", "v1"), param("k2", "v2")]
        );
    }

    #[test]
    fn parse_params_empty() {
        assert!(parse_params("").is_empty());
        assert_eq!(parse_params("a=1&"), vec![param("a", "1")]);
    }

    #[test]
    fn parse_params_missing_value() {
        assert_eq!(parse_params("flag"), vec![param("flag", "")]);
    }

    #[test]
    fn parse_params_drops_after_second_equals() {
        assert_eq!(parse_params("expr=a=b"), vec![param("expr", "a")]);
    }
}
