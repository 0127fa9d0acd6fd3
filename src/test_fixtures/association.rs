use rstest::fixture;

use crate::repository::models::{care::WaterClass, plant_user::WateringAssociation};

#[fixture]
pub fn association(
    #[default(1)] id: i32,
    #[default(1)] user_id: i32,
    #[default(1)] plant_id: i32,
    #[default(Some(WaterClass::Daily))] water: Option<WaterClass>,
) -> WateringAssociation {
    WateringAssociation {
        id,
        user_id,
        plant_id,
        water,
    }
}
