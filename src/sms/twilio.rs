use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::SmsConfig;
use crate::sms::{SmsError, SmsTransport};

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    message: String,
}

/// Client for the Twilio Programmable Messaging REST API.
pub struct TwilioClient {
    client: Client,
    api_url: Url,
    account_sid: String,
    auth_token: Secret<String>,
}

impl TwilioClient {
    pub fn new(config: &SmsConfig) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url.as_str().trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsTransport for TwilioClient {
    #[tracing::instrument(name = "Twilio send", skip(self, to, body))]
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<String, SmsError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let message: MessageResponse = response
                .json()
                .await
                .map_err(|e| SmsError::InvalidResponse(e.to_string()))?;

            return Ok(message.sid);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(error) => (error.code, error.message),
            Err(_) => (None, text),
        };

        Err(SmsError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
