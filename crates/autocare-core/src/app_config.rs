use std::net::SocketAddr;

use chrono::FixedOffset;

use crate::matcher::MatchMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub google_places_api_key: String,
    pub places_timeout_secs: u64,
    pub places_default_radius_m: u32,
    pub places_max_results: usize,
    pub match_mode: MatchMode,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from_number: String,
    pub sms_timeout_secs: u64,
    pub reminder_cron: String,
    pub reminder_utc_offset: FixedOffset,
}

impl AppConfig {
    /// Today's date at the configured reminder offset.
    #[must_use]
    pub fn local_today(&self) -> chrono::NaiveDate {
        chrono::Utc::now()
            .with_timezone(&self.reminder_utc_offset)
            .date_naive()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("google_places_api_key", &"[redacted]")
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_default_radius_m", &self.places_default_radius_m)
            .field("places_max_results", &self.places_max_results)
            .field("match_mode", &self.match_mode)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &"[redacted]")
            .field("twilio_from_number", &self.twilio_from_number)
            .field("sms_timeout_secs", &self.sms_timeout_secs)
            .field("reminder_cron", &self.reminder_cron)
            .field("reminder_utc_offset", &self.reminder_utc_offset)
            .finish()
    }
}
