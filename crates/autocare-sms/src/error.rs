use autocare_core::GatewayError;
use thiserror::Error;

/// Errors returned by the Twilio client.
#[derive(Debug, Error)]
pub enum SmsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Twilio refused the message, e.g. code 21211 for an invalid number.
    #[error("Twilio error {code} (HTTP {http_status}): {message}")]
    Api {
        http_status: u16,
        code: String,
        message: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<SmsError> for GatewayError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::Api { code, message, .. } => GatewayError::Rejected { code, message },
            other => GatewayError::Transport(Box::new(other)),
        }
    }
}
