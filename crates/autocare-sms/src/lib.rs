//! Twilio Messages API client used as the outbound SMS gateway.

mod client;
mod error;

pub use client::{TwilioClient, TwilioCredentials};
pub use error::SmsError;
