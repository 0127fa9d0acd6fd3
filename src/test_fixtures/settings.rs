use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::config::Settings;

lazy_static! {
    pub static ref TEST_ENV: HashMap<&'static str, &'static str> = HashMap::from([
        ("DATABASE_URL", "test.db"),
        ("TWILIO_SID", "AC00000000000000000000000000000000"),
        ("TWILIO_TOKEN", "test-auth-token"),
        ("TWILIO_FROM_NUMBER", "+16505550100"),
        ("REMINDER_TIMEZONE", "America/Los_Angeles"),
        ("SMS_TIMEOUT_SECS", "2"),
    ]);
}

/// Test settings with some keys replaced, e.g. the database path or the
/// address of a mock SMS server.
pub fn settings_with(overrides: &[(&str, &str)]) -> Settings {
    Settings::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .or_else(|| TEST_ENV.get(key).copied())
            .map(|value| value.to_string())
    })
    .expect("valid test settings")
}
