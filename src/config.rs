use chrono_tz::Tz;
use dotenv::dotenv;
use secrecy::Secret;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use url::Url;

use crate::error::ReminderError;

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";
pub const DEFAULT_SMS_TIMEOUT_SECS: &str = "10";

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub reminder: ReminderConfig,
    pub sms: SmsConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug)]
pub struct ReminderConfig {
    /// Zone whose civil calendar decides what "today" is.
    pub timezone: Tz,
}

#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: Secret<String>,
    pub from_number: String,
    pub api_url: Url,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub receiver_url: Option<String>,
    pub api_key: Option<Secret<String>>,
}

impl Settings {
    pub fn new() -> Result<Self, ReminderError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup, e.g. the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReminderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let receiver_url = optional(&lookup, "TELEMETRY_RECEIVER_URL");
        let api_key = match receiver_url {
            Some(_) => Some(Secret::new(required(&lookup, "TELEMETRY_API_KEY")?)),
            None => optional(&lookup, "TELEMETRY_API_KEY").map(Secret::new),
        };

        let timeout_secs: u64 = parsed(&lookup, "SMS_TIMEOUT_SECS", DEFAULT_SMS_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ReminderError::Configuration(
                "SMS_TIMEOUT_SECS must be at least 1 second".to_string(),
            ));
        }

        Ok(Settings {
            database_url: required(&lookup, "DATABASE_URL")?,
            reminder: ReminderConfig {
                timezone: parsed(&lookup, "REMINDER_TIMEZONE", DEFAULT_TIMEZONE)?,
            },
            sms: SmsConfig {
                account_sid: required(&lookup, "TWILIO_SID")?,
                auth_token: Secret::new(required(&lookup, "TWILIO_TOKEN")?),
                from_number: required(&lookup, "TWILIO_FROM_NUMBER")?,
                api_url: parsed(&lookup, "TWILIO_API_URL", DEFAULT_TWILIO_API_URL)?,
                timeout_secs,
            },
            telemetry: TelemetryConfig {
                receiver_url,
                api_key,
            },
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ReminderError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)
        .ok_or_else(|| ReminderError::Configuration(format!("{} environment variable not found", key)))
}

fn parsed<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ReminderError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = optional(lookup, key).unwrap_or_else(|| default.to_string());

    value
        .trim()
        .parse()
        .map_err(|e| ReminderError::Configuration(format!("failed to parse {}: {}", key, e)))
}
