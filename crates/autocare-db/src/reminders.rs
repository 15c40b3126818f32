//! Database operations for the `service_reminders` table.

use autocare_core::reminders::{CustomerContact, ReminderRecord, VehicleInfo};
use autocare_core::{DueReminder, TemplateType};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// An unsent reminder joined with its customer profile and vehicle.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueReminderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub target_date: NaiveDate,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub notification_sent: bool,
    pub last_notification_sent_at: Option<DateTime<Utc>>,
    pub template_type: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
}

impl From<DueReminderRow> for DueReminder {
    fn from(row: DueReminderRow) -> Self {
        DueReminder {
            reminder: ReminderRecord {
                id: row.id,
                customer_id: row.customer_id,
                vehicle_id: row.vehicle_id,
                service_type: row.service_type,
                target_date: row.target_date,
                mileage: row.mileage,
                notes: row.notes,
                notification_sent: row.notification_sent,
                last_notification_sent_at: row.last_notification_sent_at,
                template_type: row.template_type.as_deref().and_then(TemplateType::parse),
            },
            customer: CustomerContact {
                full_name: row.full_name,
                phone: row.phone,
            },
            vehicle: VehicleInfo {
                make: row.make,
                model: row.model,
                year: row.year,
            },
        }
    }
}

/// Returns unsent reminders with `target_date <= cutoff`, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_due_reminders(
    pool: &PgPool,
    cutoff: NaiveDate,
) -> Result<Vec<DueReminderRow>, DbError> {
    let rows = sqlx::query_as::<_, DueReminderRow>(
        "SELECT r.id, r.customer_id, r.vehicle_id, r.service_type, r.target_date, r.mileage, \
                r.notes, r.notification_sent, r.last_notification_sent_at, r.template_type, \
                p.full_name, p.phone, v.make, v.model, v.year \
         FROM service_reminders r \
         JOIN profiles p ON p.id = r.customer_id \
         JOIN vehicles v ON v.id = r.vehicle_id \
         WHERE r.notification_sent = false AND r.target_date <= $1 \
         ORDER BY r.target_date, r.created_at",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Flags a reminder as sent, recording when and with which template.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no reminder has `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn mark_reminder_sent(
    pool: &PgPool,
    id: Uuid,
    sent_at: DateTime<Utc>,
    template: TemplateType,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE service_reminders \
         SET notification_sent = true, last_notification_sent_at = $2, \
             template_type = $3, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(sent_at)
    .bind(template.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
