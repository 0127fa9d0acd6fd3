use chrono::NaiveDateTime;
use rstest::fixture;

use crate::repository::models::care::{HumidityClass, SunClass, TemperatureClass, WaterClass};
use crate::repository::models::plant::{CreatePlantParams, Plant};

#[fixture]
pub fn plant(
    #[default(1)] id: i32,
    #[default("Fern")] name: String,
    #[default(WaterClass::Daily)] water: WaterClass,
) -> Plant {
    let created_at =
        NaiveDateTime::parse_from_str("2021-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

    Plant {
        id,
        name,
        species: "Nephrolepis Exaltata".into(),
        image: "img/plants/fern.jpg".into(),
        water,
        sun: SunClass::BrightIndirect,
        humidity: HumidityClass::High,
        temperature: TemperatureClass::Average,
        created_at,
        updated_at: created_at,
    }
}

#[fixture]
pub fn create_plant_params(
    #[default("Boston Fern")] name: String,
    #[default(WaterClass::Daily)] water: WaterClass,
) -> CreatePlantParams {
    CreatePlantParams {
        name,
        species: "nephrolepis exaltata".into(),
        image: "img/plants/fern.jpg".into(),
        water,
        sun: SunClass::BrightIndirect,
        humidity: HumidityClass::High,
        temperature: TemperatureClass::Average,
    }
}
