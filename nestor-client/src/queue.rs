//! Build queue reader.

use crate::client::{Client, Request, resource_not_found};
use crate::error::Result;
use serde::Deserialize;

/// Response from `/queue/api/json`.
#[derive(Debug, Deserialize)]
struct QueueResponse {
    #[serde(default)]
    items: Vec<QueueItem>,
}

#[derive(Debug, Deserialize)]
struct QueueItem {
    task: Task,
}

#[derive(Debug, Deserialize)]
struct Task {
    name: String,
}

impl Client {
    /// List the names of jobs waiting for an executor, in server order.
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
    /// let queue = client.queue().await?;
    /// if queue.is_empty() {
    ///     println!("Queue is empty");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn queue(&self) -> Result<Vec<String>> {
        let reply = self
            .send(&Request::get("queue/api/json"))
            .await?
            .into_reply(|| resource_not_found("queue/api/json"))?;

        let response: QueueResponse = reply.json()?;
        Ok(response.items.into_iter().map(|i| i.task.name).collect())
    }
}
