//! Domain core for the autocare backend: service-center reconciliation,
//! service reminders, and shared configuration.

mod app_config;
pub mod centers;
mod config;
mod error;
pub mod geo;
pub mod matcher;
pub mod nearby;
pub mod reminders;
pub mod services;
pub mod similarity;

pub use app_config::{AppConfig, Environment};
pub use centers::{LocationRecord, ReconciledResult, RegisteredCenter, ResultSource};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{
    ConfigError, GatewayError, NearbyError, PlaceSearchError, ReminderError, StoreError,
};
pub use geo::{haversine_km, Coordinates};
pub use matcher::{MatchMode, Matcher};
pub use nearby::{NearbyOutcome, NearbyQuery, NearbySearch, MAX_RADIUS_M, MAX_RESULTS};
pub use reminders::{
    DueReminder, ReminderOutcome, ReminderProcessor, ReminderRunSummary, TemplateType,
};
pub use services::{
    CenterDirectory, MessageGateway, MessageReceipt, PlaceQuery, PlaceSearch, ReminderStore,
};
pub use similarity::{DiceCoefficient, Similarity};
