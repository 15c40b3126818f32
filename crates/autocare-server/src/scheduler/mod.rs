//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring reminder job.

mod reminders;

use std::sync::Arc;

use autocare_core::{AppConfig, ReminderProcessor};
use tokio_cron_scheduler::{JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    processor: Arc<ReminderProcessor>,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    reminders::register_reminder_job(
        &scheduler,
        processor,
        &config.reminder_cron,
        config.reminder_utc_offset,
    )
    .await?;

    scheduler.start().await?;
    Ok(scheduler)
}
