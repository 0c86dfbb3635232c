//! Periodic status monitoring.
//!
//! A [`Monitor`] reads the dashboard, derives one aggregate status and hands it
//! to a callback, once immediately and then on every tick of a cron schedule.

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::status::{JobStatus, aggregate};
use chrono::{DateTime, Utc};
use cron::Schedule;
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Once per minute.
pub const DEFAULT_SCHEDULE: &str = "0 * * * * *";

/// What to monitor and when.
#[derive(Debug, Clone, Default)]
pub struct MonitorOptions {
    /// Only derive the status of this job.
    pub job_name: Option<String>,
    /// Read the jobs of this view instead of the whole dashboard.
    pub view_name: Option<String>,
    /// Six-field cron expression (`sec min hour day month weekday`).
    /// Defaults to [`DEFAULT_SCHEDULE`].
    pub schedule: Option<String>,
}

/// Periodic dashboard status check.
///
/// Ticks never overlap: the next fire time is computed once the previous tick
/// has completed, so fire times that pass during a slow tick are skipped.
///
/// # Example
///
/// ```no_run
/// use nestor_client::{Client, Monitor, MonitorOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?;
/// let monitor = Monitor::new(client, MonitorOptions::default())?;
/// monitor
///     .run(|status| match status {
///         Ok(Some(status)) => println!("{}", status),
///         Ok(None) => println!("no status"),
///         Err(e) => eprintln!("{}", e),
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Monitor {
    client: Client,
    options: MonitorOptions,
    schedule: Schedule,
    schedule_expr: String,
    shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
    shutdown_rx: Mutex<Option<oneshot::Receiver<()>>>,
}

/// Stops a running [`Monitor`].
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl MonitorHandle {
    /// Stop the monitor. A tick in progress completes first.
    pub fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().take() {
            let _ = tx.send(());
        }
    }
}

impl Monitor {
    /// Create a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidSchedule`] if the cron expression is invalid.
    pub fn new(client: Client, options: MonitorOptions) -> Result<Self> {
        let schedule_expr = options
            .schedule
            .clone()
            .unwrap_or_else(|| DEFAULT_SCHEDULE.to_string());
        let schedule = Schedule::from_str(&schedule_expr).map_err(|e| {
            ClientError::InvalidSchedule(format!(
                "Invalid cron expression '{}': {}",
                schedule_expr, e
            ))
        })?;

        let (tx, rx) = oneshot::channel();
        Ok(Self {
            client,
            options,
            schedule,
            schedule_expr,
            shutdown_tx: Arc::new(Mutex::new(Some(tx))),
            shutdown_rx: Mutex::new(Some(rx)),
        })
    }

    /// Handle that stops [`Monitor::run`].
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Next scheduled tick.
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.upcoming(Utc).next()
    }

    /// Read the dashboard once and derive the aggregate status.
    ///
    /// # Errors
    ///
    /// Returns an error if the dashboard or view cannot be read.
    pub async fn check(&self) -> Result<Option<JobStatus>> {
        let jobs = match self.options.view_name {
            Some(ref view) => self.client.view_dashboard(view).await?,
            None => self.client.dashboard().await?,
        };
        Ok(aggregate(&jobs, self.options.job_name.as_deref()))
    }

    /// Check now, then on every tick until stopped through a [`MonitorHandle`].
    ///
    /// A failed tick is passed to `on_tick` and does not stop the monitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor was already run.
    pub async fn run<F>(&self, mut on_tick: F) -> Result<()>
    where
        F: FnMut(Result<Option<JobStatus>>) + Send,
    {
        let mut shutdown_rx = self
            .shutdown_rx
            .lock()
            .take()
            .ok_or(ClientError::MonitorAlreadyRun)?;

        tracing::info!(
            schedule = %self.schedule_expr,
            job = ?self.options.job_name,
            view = ?self.options.view_name,
            "Monitor started"
        );

        self.tick(&mut on_tick).await;

        loop {
            let now = Utc::now();
            let next = match self.schedule.upcoming(Utc).next() {
                Some(next) => next,
                None => {
                    tracing::warn!(schedule = %self.schedule_expr, "No more scheduled times");
                    break;
                }
            };
            let duration = (next - now).to_std().unwrap_or(std::time::Duration::ZERO);

            tracing::debug!(
                next_fire = %next,
                wait_secs = duration.as_secs(),
                "Waiting for next monitor tick"
            );

            tokio::select! {
                _ = &mut shutdown_rx => {
                    tracing::info!("Monitor shutting down");
                    break;
                }
                _ = tokio::time::sleep(duration) => {
                    self.tick(&mut on_tick).await;
                }
            }
        }

        Ok(())
    }

    async fn tick<F>(&self, on_tick: &mut F)
    where
        F: FnMut(Result<Option<JobStatus>>),
    {
        let result = self.check().await;
        match result {
            Ok(ref status) => tracing::debug!(status = ?status, "Monitor tick"),
            Err(ref e) => tracing::warn!(error = %e, "Monitor tick failed"),
        }
        on_tick(result);
    }
}
