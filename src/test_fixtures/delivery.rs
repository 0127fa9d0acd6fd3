use chrono::NaiveDate;
use rstest::fixture;

use crate::repository::models::reminder_delivery::ReminderDelivery;

#[fixture]
pub fn delivery(
    #[default(1)] plant_user_id: i32,
    #[default(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())] sent_on: NaiveDate,
    #[default("SM1")] message_id: String,
) -> ReminderDelivery {
    ReminderDelivery {
        id: plant_user_id,
        plant_user_id,
        sent_on,
        message_id,
        created_at: sent_on.and_hms_opt(20, 0, 0).unwrap(),
    }
}
