use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::reminder_delivery;

/// One reminder that went out for an association on a civil day.
#[derive(Clone, Debug, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = reminder_delivery)]
pub struct ReminderDelivery {
    pub id: i32,
    pub plant_user_id: i32,
    pub sent_on: NaiveDate,
    pub message_id: String,
    pub created_at: NaiveDateTime,
}
