//! Collaborator traits injected into the nearby search and the reminder
//! processor. Production implementations live in `autocare-db`,
//! `autocare-places` and `autocare-sms`; tests use in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::centers::{LocationRecord, RegisteredCenter};
use crate::error::{GatewayError, PlaceSearchError, StoreError};
use crate::geo::Coordinates;
use crate::reminders::{DueReminder, TemplateType};

/// Read access to the business's registered service centers.
#[async_trait]
pub trait CenterDirectory: Send + Sync {
    async fn registered_centers(&self) -> Result<Vec<RegisteredCenter>, StoreError>;
}

/// Parameters for one place-search call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub origin: Coordinates,
    /// Free-text query; `None` means a plain nearby search.
    pub text: Option<String>,
    pub radius_m: u32,
    pub max_results: usize,
}

/// External place-search provider.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<LocationRecord>, PlaceSearchError>;
}

/// Storage for service reminders.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Unsent reminders with `target_date <= cutoff`, oldest first, joined
    /// with customer and vehicle context.
    async fn due_reminders(&self, cutoff: NaiveDate) -> Result<Vec<DueReminder>, StoreError>;

    /// Flags a reminder as sent and records when and with which template.
    async fn mark_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
        template: TemplateType,
    ) -> Result<(), StoreError>;
}

/// Gateway acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReceipt {
    pub id: String,
}

/// Outbound text messaging.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<MessageReceipt, GatewayError>;
}
