use thiserror::Error;

use crate::sms::SmsError;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error(transparent)]
    Transport(#[from] SmsError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}
