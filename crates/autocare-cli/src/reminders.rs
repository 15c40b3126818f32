use std::sync::Arc;

use autocare_core::{AppConfig, ReminderOutcome, ReminderProcessor, ReminderRunSummary};
use autocare_db::PgStore;
use autocare_sms::{TwilioClient, TwilioCredentials};
use chrono::NaiveDate;

/// Run the reminder batch once and print a per-reminder table.
///
/// # Errors
///
/// Returns an error if the SMS client cannot be built or due reminders
/// cannot be loaded. Per-reminder failures are printed, not returned.
pub(crate) async fn run_reminders(
    pool: sqlx::PgPool,
    config: &AppConfig,
    reference: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<()> {
    let gateway = TwilioClient::new(
        TwilioCredentials {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_from_number.clone(),
        },
        config.sms_timeout_secs,
    )?;
    let processor = ReminderProcessor::new(Arc::new(PgStore::new(pool)), Arc::new(gateway));

    let summary = processor.process(reference, dry_run).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &ReminderRunSummary) {
    println!(
        "reference date {}{}: {} reminder(s) attempted",
        summary.reference_date,
        if summary.dry_run { " (dry run)" } else { "" },
        summary.reminders_processed
    );
    if summary.results.is_empty() {
        return;
    }

    println!("{:<38}{:<11}{:<11}DETAIL", "ID", "STATUS", "TEMPLATE");
    for outcome in &summary.results {
        match outcome {
            ReminderOutcome::Processed {
                id,
                template_type,
                recipient,
                message_preview,
                ..
            } => println!(
                "{:<38}{:<11}{:<11}{recipient}: {message_preview}",
                id.to_string(),
                "processed",
                template_type.as_str()
            ),
            ReminderOutcome::Failed { id, error } => {
                println!("{:<38}{:<11}{:<11}{error}", id.to_string(), "failed", "-");
            }
        }
    }
}
