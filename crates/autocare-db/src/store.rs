use async_trait::async_trait;
use autocare_core::{
    CenterDirectory, DueReminder, RegisteredCenter, ReminderStore, StoreError, TemplateType,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{centers, reminders, DbError};

/// Postgres-backed [`CenterDirectory`] and [`ReminderStore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => StoreError::NotFound,
            other => StoreError::backend(other),
        }
    }
}

#[async_trait]
impl CenterDirectory for PgStore {
    async fn registered_centers(&self) -> Result<Vec<RegisteredCenter>, StoreError> {
        let rows = centers::list_registered_centers(&self.pool).await?;
        Ok(rows.into_iter().map(RegisteredCenter::from).collect())
    }
}

#[async_trait]
impl ReminderStore for PgStore {
    async fn due_reminders(&self, cutoff: NaiveDate) -> Result<Vec<DueReminder>, StoreError> {
        let rows = reminders::list_due_reminders(&self.pool, cutoff).await?;
        tracing::debug!(count = rows.len(), %cutoff, "loaded due reminders");
        Ok(rows.into_iter().map(DueReminder::from).collect())
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
        template: TemplateType,
    ) -> Result<(), StoreError> {
        reminders::mark_reminder_sent(&self.pool, id, sent_at, template).await?;
        Ok(())
    }
}
