//! Server level operations: version probe and build feeds.

use crate::client::{Client, Request, resource_not_found};
use crate::error::{ClientError, Result};
use crate::types::FeedScope;

/// Header carrying the server version.
const VERSION_HEADER: &str = "x-jenkins";

impl Client {
    /// Get the version of the Jenkins server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAJenkinsServer`] if the server does not send
    /// a version header.
    pub async fn version(&self) -> Result<String> {
        let reply = self
            .send(&Request::head(""))
            .await?
            .into_reply(|| ClientError::NotAJenkinsServer)?;

        reply
            .header(VERSION_HEADER)
            .map(str::to_string)
            .ok_or(ClientError::NotAJenkinsServer)
    }

    /// Fetch the raw RSS feed of all builds, of a job, or of a view.
    ///
    /// The feed is returned as XML text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobNotFound`] or [`ClientError::ViewNotFound`]
    /// when the scoped job or view does not exist.
    pub async fn feed(&self, scope: &FeedScope) -> Result<String> {
        let path = match scope {
            FeedScope::All => "rssAll".to_string(),
            FeedScope::Job(name) => format!("job/{}/rssAll", name),
            FeedScope::View(name) => format!("view/{}/rssAll", name),
        };

        let reply = self
            .send(&Request::get(path.as_str()))
            .await?
            .into_reply(|| match scope {
                FeedScope::All => resource_not_found(&path),
                FeedScope::Job(name) => ClientError::JobNotFound(name.clone()),
                FeedScope::View(name) => ClientError::ViewNotFound(name.clone()),
            })?;

        Ok(reply.text())
    }
}
