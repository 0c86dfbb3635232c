//! Executor command.

use anyhow::{Context, Result};
use nestor_client::{Client, ExecutorStatus};

/// Show executors grouped by node.
pub async fn run(client: &Client) -> Result<()> {
    let nodes = client
        .executors()
        .await
        .context("Failed to read executors")?;

    if nodes.is_empty() {
        println!("No executor found");
    }

    for node in nodes {
        let active = node.executors.iter().filter(|e| !e.idle).count();
        println!("+ {} | {}/{}", node.node_name, active, node.executors.len());
        for executor in &node.executors {
            if let Some(line) = describe(executor) {
                println!("  - {}", line);
            }
        }
    }
    Ok(())
}

/// One line for a busy executor, nothing for an idle one.
fn describe(executor: &ExecutorStatus) -> Option<String> {
    if executor.idle {
        return None;
    }

    let job = executor.running_job.as_deref().unwrap_or("unknown job");
    let mut line = match executor.progress {
        Some(progress) if progress >= 0 => format!("{} | {}%", job, progress),
        _ => job.to_string(),
    };
    if executor.stuck {
        line.push_str(" stuck!");
    }
    Some(line)
}
