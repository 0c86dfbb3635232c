//! Executor reader.

use crate::client::{Client, Request, resource_not_found};
use crate::error::Result;
use crate::types::{ExecutorStatus, NodeExecutors};
use serde::Deserialize;

/// Response from `/computer/api/json?depth=1`.
#[derive(Debug, Deserialize)]
struct ComputerResponse {
    #[serde(default)]
    computer: Vec<Computer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Computer {
    display_name: String,
    #[serde(default)]
    executors: Vec<Executor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Executor {
    idle: bool,
    #[serde(default)]
    likely_stuck: bool,
    progress: Option<i64>,
    current_executable: Option<Executable>,
}

#[derive(Debug, Deserialize)]
struct Executable {
    url: Option<String>,
}

impl Client {
    /// List the executors of every compute node.
    ///
    /// Nodes are returned in server order, each with its executors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or credentials are rejected.
    pub async fn executors(&self) -> Result<Vec<NodeExecutors>> {
        let request = Request::get("computer/api/json").query("depth", 1);
        let reply = self
            .send(&request)
            .await?
            .into_reply(|| resource_not_found("computer/api/json"))?;

        let response: ComputerResponse = reply.json()?;
        Ok(group_by_node(response))
    }
}

fn group_by_node(response: ComputerResponse) -> Vec<NodeExecutors> {
    let mut nodes: Vec<NodeExecutors> = Vec::new();

    for computer in response.computer {
        let executors = computer.executors.into_iter().map(|e| {
            let running_job = if e.idle {
                None
            } else {
                e.current_executable
                    .and_then(|x| x.url)
                    .and_then(|url| running_job_name(&url))
            };
            ExecutorStatus {
                node_name: computer.display_name.clone(),
                idle: e.idle,
                stuck: e.likely_stuck,
                progress: e.progress,
                running_job,
            }
        });

        // Display names are unique in practice, merge just in case.
        match nodes
            .iter_mut()
            .find(|n| n.node_name == computer.display_name)
        {
            Some(node) => node.executors.extend(executors),
            None => {
                let executors = executors.collect();
                nodes.push(NodeExecutors {
                    node_name: computer.display_name,
                    executors,
                });
            }
        }
    }

    nodes
}

/// Best-effort job name from a build URL.
///
/// Takes the path segment right after the first `/job/`. For jobs inside
/// folders (`/job/folder/job/app/3/`) this yields the folder name, not the job.
pub fn running_job_name(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/job/")?;
    let name = rest.split('/').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
