use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::repository::models::plant_user::WateringAssociation;

/// Decides which associations are due on the civil day of an instant in the
/// configured reference timezone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleEvaluator {
    timezone: Tz,
}

impl ScheduleEvaluator {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn weekday(&self, instant: DateTime<Utc>) -> Weekday {
        instant.with_timezone(&self.timezone).weekday()
    }

    /// The civil date of `instant` in the reference timezone.
    pub fn today(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    pub fn is_due(&self, association: &WateringAssociation, instant: DateTime<Utc>) -> bool {
        let watering_days = association.watering_days();
        if watering_days.is_empty() {
            return false;
        }

        watering_days.contains(&self.weekday(instant))
    }
}
