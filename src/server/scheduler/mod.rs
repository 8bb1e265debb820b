//! Scheduler for periodic maintenance of warehouse sessions.
//!
//! Idle sessions are also dropped lazily when their user makes the next request; the sweep
//! releases sessions of users who never return.

use std::sync::Arc;

use chrono::Utc;
use dioxus_logger::tracing;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, service::session::WarehouseSessionService};

/// Runs every 30 seconds
pub const SESSION_SWEEP_CRON: &str = "*/30 * * * * *";

/// Job scheduler for background session maintenance.
pub struct Scheduler {
    sessions: WarehouseSessionService,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(sessions: WarehouseSessionService) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { sessions, sched })
    }

    /// Registers the session sweep and starts the scheduler.
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(SESSION_SWEEP_CRON, "session sweep", sweep_sessions)
            .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The job receives a clone of the session service and logs the number of items it
    /// processed, or the error it failed with.
    ///
    /// # Arguments
    /// - `cron` - Cron expression with seconds, e.g. `*/30 * * * * *`
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async function returning the number of items processed
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(WarehouseSessionService) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let sessions = self.sessions.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let sessions = sessions.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(sessions).await {
                        Ok(count) => tracing::debug!("Processed {} item(s) in {}", count, name),
                        Err(e) => tracing::error!("Error running {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}

/// Drops warehouse sessions idle past the timeout, returning how many slots were removed
pub async fn sweep_sessions(sessions: WarehouseSessionService) -> Result<usize, Error> {
    Ok(sessions.registry().sweep(Utc::now()).await)
}
