//! HTTP client for the Twilio Messages API.

use std::time::Duration;

use async_trait::async_trait;
use autocare_core::{GatewayError, MessageGateway, MessageReceipt};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::SmsError;

const DEFAULT_BASE_URL: &str = "https://api.twilio.com/";

/// Account credentials and the sender number messages go out from.
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[redacted]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Client for sending SMS through Twilio.
pub struct TwilioClient {
    client: Client,
    credentials: TwilioCredentials,
    messages_url: Url,
}

impl TwilioClient {
    /// Creates a new client pointed at the production Twilio API.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(credentials: TwilioCredentials, timeout_secs: u64) -> Result<Self, SmsError> {
        Self::with_base_url(credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`SmsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        credentials: TwilioCredentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("autocare/0.1 (service-reminders)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| SmsError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let messages_url = Url::parse(&normalised)
            .and_then(|base| {
                base.join(&format!(
                    "2010-04-01/Accounts/{}/Messages.json",
                    credentials.account_sid
                ))
            })
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
            messages_url,
        })
    }

    /// Sends `body` to `to` and returns the Twilio message SID.
    ///
    /// # Errors
    ///
    /// - [`SmsError::Api`] if Twilio rejects the message.
    /// - [`SmsError::Http`] on network failure.
    /// - [`SmsError::Deserialize`] if the response does not match the expected shape.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<String, SmsError> {
        let form = [
            ("To", to),
            ("From", self.credentials.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let resource: MessageResource =
            serde_json::from_str(&text).map_err(|e| SmsError::Deserialize {
                context: "Messages.json".to_owned(),
                source: e,
            })?;
        tracing::debug!(sid = %resource.sid, "twilio accepted message");
        Ok(resource.sid)
    }
}

/// Twilio error bodies carry a numeric `code` and a `message`; anything
/// else falls back to the HTTP status.
fn api_error(status: StatusCode, text: &str) -> SmsError {
    let parsed = serde_json::from_str::<TwilioErrorBody>(text).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.code)
        .map_or_else(|| status.as_u16().to_string(), |c| c.to_string());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());
    SmsError::Api {
        http_status: status.as_u16(),
        code,
        message,
    }
}

#[async_trait]
impl MessageGateway for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<MessageReceipt, GatewayError> {
        let id = self.send_message(to, body).await?;
        Ok(MessageReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+15550009999".to_string(),
        }
    }

    #[test]
    fn messages_url_includes_account() {
        let client = TwilioClient::with_base_url(credentials(), 5, "https://api.twilio.com")
            .expect("client");
        assert_eq!(
            client.messages_url.as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn api_error_reads_twilio_body() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":21211,"message":"The 'To' number is not valid.","status":400}"#,
        );
        assert!(matches!(
            err,
            SmsError::Api { http_status: 400, ref code, .. } if code == "21211"
        ));
    }

    #[test]
    fn api_error_falls_back_to_status() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        match err {
            SmsError::Api { code, message, .. } => {
                assert_eq!(code, "502");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn credentials_debug_redacts_token() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("secret"));
    }
}
