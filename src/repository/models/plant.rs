use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::repository::models::care::{HumidityClass, SunClass, TemperatureClass, WaterClass};
use crate::schema::plant;

#[derive(Clone, Debug, Identifiable, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = plant)]
pub struct Plant {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub image: String,
    pub water: WaterClass,
    pub sun: SunClass,
    pub humidity: HumidityClass,
    pub temperature: TemperatureClass,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreatePlantParams {
    #[validate(length(min = 1))]
    pub name: String,
    pub species: String,
    pub image: String,
    pub water: WaterClass,
    pub sun: SunClass,
    pub humidity: HumidityClass,
    pub temperature: TemperatureClass,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct UpdatePlantParams {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub species: Option<String>,
    pub image: Option<String>,
    pub water: Option<WaterClass>,
    pub sun: Option<SunClass>,
    pub humidity: Option<HumidityClass>,
    pub temperature: Option<TemperatureClass>,
}

#[derive(Insertable)]
#[diesel(table_name = plant)]
pub struct NewPlant {
    pub name: String,
    pub species: String,
    pub image: String,
    pub water: WaterClass,
    pub sun: SunClass,
    pub humidity: HumidityClass,
    pub temperature: TemperatureClass,
}

#[derive(AsChangeset)]
#[diesel(table_name = plant)]
pub struct PlantChangeset {
    pub name: Option<String>,
    pub species: Option<String>,
    pub image: Option<String>,
    pub water: Option<WaterClass>,
    pub sun: Option<SunClass>,
    pub humidity: Option<HumidityClass>,
    pub temperature: Option<TemperatureClass>,
    pub updated_at: NaiveDateTime,
}

impl From<CreatePlantParams> for NewPlant {
    fn from(params: CreatePlantParams) -> Self {
        NewPlant {
            name: title_case(&params.name),
            species: title_case(&params.species),
            image: params.image.trim().to_string(),
            water: params.water,
            sun: params.sun,
            humidity: params.humidity,
            temperature: params.temperature,
        }
    }
}

impl PlantChangeset {
    pub fn new(params: UpdatePlantParams, updated_at: NaiveDateTime) -> Self {
        PlantChangeset {
            name: params.name.as_deref().map(title_case),
            species: params.species.as_deref().map(title_case),
            image: params.image.map(|image| image.trim().to_string()),
            water: params.water,
            sun: params.sun,
            humidity: params.humidity,
            temperature: params.temperature,
            updated_at,
        }
    }
}

/// Capitalizes the first letter of every word and lowercases the rest.
/// Surrounding whitespace is dropped.
pub fn title_case(value: &str) -> String {
    let mut previous_is_alpha = false;

    value
        .trim()
        .chars()
        .flat_map(|c| {
            let cased: Vec<char> = if previous_is_alpha {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            previous_is_alpha = c.is_alphabetic();
            cased
        })
        .collect()
}
