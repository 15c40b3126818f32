use std::sync::Arc;

use autocare_core::ReminderProcessor;
use chrono::{FixedOffset, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Register the daily reminder run.
///
/// `cron` is evaluated at `offset`, so `0 0 9 * * *` fires at 09:00 local
/// time. Each run uses the local date at fire time as its reference date
/// and always sends for real.
pub(super) async fn register_reminder_job(
    scheduler: &JobScheduler,
    processor: Arc<ReminderProcessor>,
    cron: &str,
    offset: FixedOffset,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async_tz(cron, offset, move |_uuid, _lock| {
        let processor = Arc::clone(&processor);

        Box::pin(async move {
            let reference = Utc::now().with_timezone(&offset).date_naive();
            tracing::info!(%reference, "scheduler: starting daily reminder run");
            run_reminder_job(&processor, reference).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, %offset, "scheduler: registered daily reminder job");
    Ok(())
}

async fn run_reminder_job(processor: &ReminderProcessor, reference: chrono::NaiveDate) {
    match processor.process(reference, false).await {
        Ok(summary) => {
            let failed = summary
                .results
                .iter()
                .filter(|r| matches!(r, autocare_core::ReminderOutcome::Failed { .. }))
                .count();
            tracing::info!(
                processed = summary.reminders_processed,
                failed,
                "scheduler: daily reminder run complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: daily reminder run failed");
        }
    }
}
