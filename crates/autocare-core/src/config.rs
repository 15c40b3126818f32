use chrono::FixedOffset;

use crate::app_config::{AppConfig, Environment};
use crate::matcher::MatchMode;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so tests
/// can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let database_url = require("DATABASE_URL")?;
    let google_places_api_key = require("GOOGLE_PLACES_API_KEY")?;
    let twilio_account_sid = require("TWILIO_ACCOUNT_SID")?;
    let twilio_auth_token = require("TWILIO_AUTH_TOKEN")?;
    let twilio_from_number = require("TWILIO_FROM_NUMBER")?;

    let env = parse_environment(&or_default("AUTOCARE_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_var(
        &or_default("AUTOCARE_BIND_ADDR", "0.0.0.0:3000"),
        "AUTOCARE_BIND_ADDR",
    )?;
    let log_level = or_default("AUTOCARE_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_var(
        &or_default("AUTOCARE_DB_MAX_CONNECTIONS", "10"),
        "AUTOCARE_DB_MAX_CONNECTIONS",
    )?;
    let db_min_connections: u32 = parse_var(
        &or_default("AUTOCARE_DB_MIN_CONNECTIONS", "1"),
        "AUTOCARE_DB_MIN_CONNECTIONS",
    )?;
    let db_acquire_timeout_secs: u64 = parse_var(
        &or_default("AUTOCARE_DB_ACQUIRE_TIMEOUT_SECS", "10"),
        "AUTOCARE_DB_ACQUIRE_TIMEOUT_SECS",
    )?;

    let places_timeout_secs: u64 = parse_var(
        &or_default("AUTOCARE_PLACES_TIMEOUT_SECS", "15"),
        "AUTOCARE_PLACES_TIMEOUT_SECS",
    )?;
    let places_default_radius_m: u32 = parse_var(
        &or_default("AUTOCARE_PLACES_DEFAULT_RADIUS_M", "5000"),
        "AUTOCARE_PLACES_DEFAULT_RADIUS_M",
    )?;
    let places_max_results: usize = parse_var(
        &or_default("AUTOCARE_PLACES_MAX_RESULTS", "60"),
        "AUTOCARE_PLACES_MAX_RESULTS",
    )?;

    let raw_mode = or_default("AUTOCARE_MATCH_MODE", "fuzzy");
    let match_mode = MatchMode::parse(&raw_mode).ok_or_else(|| {
        invalid(
            "AUTOCARE_MATCH_MODE",
            format!("expected 'strict' or 'fuzzy', got '{raw_mode}'"),
        )
    })?;

    let sms_timeout_secs: u64 = parse_var(
        &or_default("AUTOCARE_SMS_TIMEOUT_SECS", "15"),
        "AUTOCARE_SMS_TIMEOUT_SECS",
    )?;

    let reminder_cron = or_default("AUTOCARE_REMINDER_CRON", "0 0 9 * * *");
    let fields = reminder_cron.split_whitespace().count();
    if !(6..=7).contains(&fields) {
        return Err(invalid(
            "AUTOCARE_REMINDER_CRON",
            format!("expected 6 or 7 cron fields, got {fields}"),
        ));
    }

    let reminder_utc_offset: FixedOffset = parse_var(
        &or_default("AUTOCARE_REMINDER_UTC_OFFSET", "+00:00"),
        "AUTOCARE_REMINDER_UTC_OFFSET",
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        google_places_api_key,
        places_timeout_secs,
        places_default_radius_m,
        places_max_results,
        match_mode,
        twilio_account_sid,
        twilio_auth_token,
        twilio_from_number,
        sms_timeout_secs,
        reminder_cron,
        reminder_utc_offset,
    })
}

fn parse_var<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse `AUTOCARE_ENV`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "AUTOCARE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
