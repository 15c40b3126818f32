//! Service reminders: records, classification against a reference date,
//! message templates and the batch processor.

mod processor;
pub mod templates;

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use processor::{ReminderOutcome, ReminderProcessor, ReminderRunSummary};

/// Reminders due within this many days of the reference date are sent.
pub const LOOKAHEAD_DAYS: i64 = 3;

/// Which message layout a reminder was rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateType {
    #[serde(rename = "upcoming")]
    Upcoming,
    #[serde(rename = "follow-up")]
    FollowUp,
}

impl TemplateType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Upcoming => "upcoming",
            TemplateType::FollowUp => "follow-up",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upcoming" => Some(Self::Upcoming),
            "follow-up" => Some(Self::FollowUp),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled service reminder as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub target_date: NaiveDate,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub notification_sent: bool,
    pub last_notification_sent_at: Option<DateTime<Utc>>,
    pub template_type: Option<TemplateType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
}

impl VehicleInfo {
    /// `"2019 Honda Civic"`, or `"Honda Civic"` without a year.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{year} {} {}", self.make, self.model),
            None => format!("{} {}", self.make, self.model),
        }
    }
}

/// A reminder joined with everything needed to render and address it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueReminder {
    pub reminder: ReminderRecord,
    pub customer: CustomerContact,
    pub vehicle: VehicleInfo,
}

/// How a reminder relates to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Upcoming { days_until_due: i64 },
    FollowUp { days_late: i64 },
    /// Further out than [`LOOKAHEAD_DAYS`].
    Skip,
}

impl Classification {
    #[must_use]
    pub fn template_type(self) -> Option<TemplateType> {
        match self {
            Classification::Upcoming { .. } => Some(TemplateType::Upcoming),
            Classification::FollowUp { .. } => Some(TemplateType::FollowUp),
            Classification::Skip => None,
        }
    }
}

/// Classifies a reminder due on `target` as seen on `reference`.
#[must_use]
pub fn classify(target: NaiveDate, reference: NaiveDate) -> Classification {
    let days_until_due = (target - reference).num_days();
    if days_until_due < 0 {
        Classification::FollowUp {
            days_late: -days_until_due,
        }
    } else if days_until_due <= LOOKAHEAD_DAYS {
        Classification::Upcoming { days_until_due }
    } else {
        Classification::Skip
    }
}

/// Latest target date selected for a run on `reference`.
#[must_use]
pub fn selection_cutoff(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_add_days(Days::new(LOOKAHEAD_DAYS.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX)
}
