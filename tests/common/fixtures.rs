use planty::repository::models::{
    care::{HumidityClass, SunClass, TemperatureClass, WaterClass},
    plant::{CreatePlantParams, Plant},
    plant_user::PlantUser,
    user::{CreateUserParams, User},
};
use planty::repository::Repo;

pub async fn insert_user(repo: Repo, username: &str, phone: &str) -> User {
    repo.create_user(CreateUserParams {
        username: username.into(),
        first_name: "Ada".into(),
        last_name: "Gardener".into(),
        email: format!("{}@test.local", username),
        phone: phone.into(),
        password_hash: "not-a-real-hash".into(),
    })
    .await
    .unwrap()
}

pub async fn insert_plant(repo: Repo, name: &str, water: WaterClass) -> Plant {
    repo.create_plant(CreatePlantParams {
        name: name.into(),
        species: "unknown".into(),
        image: "".into(),
        water,
        sun: SunClass::PartialSun,
        humidity: HumidityClass::Medium,
        temperature: TemperatureClass::Average,
    })
    .await
    .unwrap()
}

pub async fn add_to_collection(repo: Repo, user: &User, plant: &Plant) -> PlantUser {
    repo.create_plant_user(user.id, plant.id).await.unwrap()
}
