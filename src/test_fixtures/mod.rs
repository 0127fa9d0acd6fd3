pub mod association;
pub mod delivery;
pub mod plant;
pub mod settings;
pub mod user;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Parses an RFC 3339 timestamp, e.g. `2024-01-01T08:00:00Z`.
pub fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

pub fn reference_timezone() -> Tz {
    Tz::America__Los_Angeles
}
