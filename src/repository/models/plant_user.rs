use chrono::{NaiveDateTime, Weekday};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::repository::models::care::WaterClass;
use crate::schema::plant_user;

#[derive(Clone, Debug, Identifiable, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = plant_user)]
pub struct PlantUser {
    pub id: i32,
    pub user_id: i32,
    pub plant_id: i32,
    pub created_at: NaiveDateTime,
}

/// A plant_user row joined with the water class of its plant. The water class
/// is absent when the plant row no longer exists.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize, Deserialize)]
pub struct WateringAssociation {
    pub id: i32,
    pub user_id: i32,
    pub plant_id: i32,
    pub water: Option<WaterClass>,
}

impl WateringAssociation {
    /// `plant.water` is NOT NULL, so an absent class means the join found no plant.
    pub fn plant_missing(&self) -> bool {
        self.water.is_none()
    }

    pub fn watering_days(&self) -> &'static [Weekday] {
        match self.water {
            Some(water) => water.watering_days(),
            None => &[],
        }
    }
}
