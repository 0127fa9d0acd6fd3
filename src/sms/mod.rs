use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod twilio;

pub const COUNTRY_CODE: &str = "+1";
pub const SIGNATURE: &str = " - Planty🌱";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("SMS rejected by transport ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    #[error("Unexpected response from SMS transport: {0}")]
    InvalidResponse(String),
}

/// Outbound text message delivery. Returns the transport's tracking id.
#[automock]
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<String, SmsError>;
}

pub fn reminder_body(plant_name: &str) -> String {
    format!("It's time to water your {}!{}", plant_name, SIGNATURE)
}

/// Stored numbers are national digits; the transport wants the country code.
pub fn international_number(phone_digits: &str) -> String {
    format!("{}{}", COUNTRY_CODE, phone_digits)
}

/// Sends watering reminders from a fixed origin number.
pub struct Notifier {
    transport: Box<dyn SmsTransport>,
    from_number: String,
}

impl Notifier {
    pub fn new(transport: Box<dyn SmsTransport>, from_number: String) -> Self {
        Self {
            transport,
            from_number,
        }
    }

    /// Sends exactly one reminder. Failures are returned as-is; there is no retry.
    #[tracing::instrument(name = "Send watering reminder", skip(self, phone_digits))]
    pub async fn notify(&self, phone_digits: &str, plant_name: &str) -> Result<String, SmsError> {
        let to = international_number(phone_digits);
        let body = reminder_body(plant_name);

        self.transport.send(&to, &self.from_number, &body).await
    }
}
