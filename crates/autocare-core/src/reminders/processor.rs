//! Batch processor that sends due and overdue service reminders.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::templates::{self, RenderedMessage};
use super::{classify, selection_cutoff, DueReminder, TemplateType};
use crate::error::{GatewayError, ReminderError, StoreError};
use crate::services::{MessageGateway, ReminderStore};

const PREVIEW_CHARS: usize = 50;

/// Result for a single reminder in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReminderOutcome {
    #[serde(rename_all = "camelCase")]
    Processed {
        id: Uuid,
        template_type: TemplateType,
        recipient: String,
        message_preview: String,
        /// Gateway message id; absent on dry runs.
        message_id: Option<String>,
    },
    Failed {
        id: Uuid,
        error: String,
    },
}

impl ReminderOutcome {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            ReminderOutcome::Processed { id, .. } | ReminderOutcome::Failed { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRunSummary {
    pub success: bool,
    /// Reminders that were attempted (processed or failed); skipped ones
    /// are not counted.
    pub reminders_processed: usize,
    pub dry_run: bool,
    pub reference_date: NaiveDate,
    pub results: Vec<ReminderOutcome>,
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error("customer has no phone number on file")]
    MissingPhone,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("message sent but reminder could not be updated: {0}")]
    Update(#[source] StoreError),
}

/// Selects due reminders, renders and sends them, and marks them sent.
///
/// Records are handled one at a time in selection order. A failure on one
/// record is reported in the summary and never stops the batch.
pub struct ReminderProcessor {
    store: Arc<dyn ReminderStore>,
    gateway: Arc<dyn MessageGateway>,
}

impl ReminderProcessor {
    #[must_use]
    pub fn new(store: Arc<dyn ReminderStore>, gateway: Arc<dyn MessageGateway>) -> Self {
        Self { store, gateway }
    }

    /// Runs the batch as of `reference`.
    ///
    /// With `dry_run` set, messages are rendered and logged but the gateway
    /// is not called and no record is modified.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::Selection`] if the due reminders cannot be
    /// loaded. Per-record failures are reported in the summary instead.
    pub async fn process(
        &self,
        reference: NaiveDate,
        dry_run: bool,
    ) -> Result<ReminderRunSummary, ReminderError> {
        let cutoff = selection_cutoff(reference);
        let due = self
            .store
            .due_reminders(cutoff)
            .await
            .map_err(ReminderError::Selection)?;

        tracing::info!(
            count = due.len(),
            %reference,
            %cutoff,
            dry_run,
            "reminders: selected due reminders"
        );

        let mut results = Vec::with_capacity(due.len());
        for item in &due {
            let id = item.reminder.id;
            let classification = classify(item.reminder.target_date, reference);
            let Some(message) = templates::render(item, classification) else {
                tracing::debug!(%id, target_date = %item.reminder.target_date, "reminders: not yet due; skipping");
                continue;
            };

            match self.dispatch(item, &message, dry_run).await {
                Ok(outcome) => results.push(outcome),
                Err(e) => {
                    tracing::warn!(%id, error = %e, "reminders: failed to process reminder");
                    results.push(ReminderOutcome::Failed {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            attempted = results.len(),
            failed = results
                .iter()
                .filter(|r| matches!(r, ReminderOutcome::Failed { .. }))
                .count(),
            dry_run,
            "reminders: run complete"
        );

        Ok(ReminderRunSummary {
            success: true,
            reminders_processed: results.len(),
            dry_run,
            reference_date: reference,
            results,
        })
    }

    async fn dispatch(
        &self,
        item: &DueReminder,
        message: &RenderedMessage,
        dry_run: bool,
    ) -> Result<ReminderOutcome, DispatchError> {
        let id = item.reminder.id;
        let recipient = item
            .customer
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(DispatchError::MissingPhone)?;

        let message_id = if dry_run {
            tracing::info!(
                %id,
                recipient,
                template = %message.template_type,
                body = %message.body,
                "reminders: dry run, not sending"
            );
            None
        } else {
            let receipt = self.gateway.send(recipient, &message.body).await?;
            tracing::info!(
                %id,
                recipient,
                template = %message.template_type,
                message_id = %receipt.id,
                "reminders: message sent"
            );
            self.store
                .mark_sent(id, Utc::now(), message.template_type)
                .await
                .map_err(DispatchError::Update)?;
            Some(receipt.id)
        };

        Ok(ReminderOutcome::Processed {
            id,
            template_type: message.template_type,
            recipient: recipient.to_owned(),
            message_preview: preview(&message.body),
            message_id,
        })
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_CHARS {
        return body.to_owned();
    }
    let mut out: String = body.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
