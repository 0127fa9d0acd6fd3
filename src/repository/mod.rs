mod implementation;
pub mod models;

use anyhow::Error;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use models::{
    plant::{CreatePlantParams, Plant, UpdatePlantParams},
    plant_user::{PlantUser, WateringAssociation},
    reminder_delivery::ReminderDelivery,
    user::{CreateUserParams, User},
};

pub use implementation::Implementation;

/// Used in the application to access the database
pub type Repo = &'static dyn Repository;

/// Creates a testable interface for the database pool.
#[automock]
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    async fn create_plant(&self, params: CreatePlantParams) -> Result<Plant, Error>;
    async fn create_plant_user(&self, user_id: i32, plant_id: i32) -> Result<PlantUser, Error>;
    async fn create_user(&self, params: CreateUserParams) -> Result<User, Error>;
    /// Removes the plant along with its associations and their delivery history.
    async fn delete_plant(&self, plant_id: i32) -> Result<(), Error>;
    async fn delete_plant_user(&self, plant_user_id: i32) -> Result<(), Error>;
    async fn plant_by_id(&self, plant_id: i32) -> Result<Option<Plant>, Error>;
    /// Every association with the water class of its plant, in id order.
    async fn plant_users(&self) -> Result<Vec<WateringAssociation>, Error>;
    async fn plant_users_for_user(&self, user_id: i32) -> Result<Vec<PlantUser>, Error>;
    async fn plants(&self) -> Result<Vec<Plant>, Error>;
    async fn record_reminder(
        &self,
        plant_user_id: i32,
        sent_on: NaiveDate,
        message_id: String,
    ) -> Result<ReminderDelivery, Error>;
    async fn reminder_sent(&self, plant_user_id: i32, sent_on: NaiveDate) -> Result<bool, Error>;
    async fn search_plants(&self, term: String) -> Result<Vec<Plant>, Error>;
    async fn update_plant(
        &self,
        plant_id: i32,
        params: UpdatePlantParams,
    ) -> Result<Option<Plant>, Error>;
    async fn user_by_id(&self, user_id: i32) -> Result<Option<User>, Error>;
    async fn user_by_username(&self, username: String) -> Result<Option<User>, Error>;
    async fn users(&self) -> Result<Vec<User>, Error>;
}

pub async fn implementation(database_uri: &str) -> Result<Repo, Error> {
    let implementation = Implementation::new(database_uri).await?;
    let repository = Box::new(implementation);

    Ok(Box::leak(repository))
}
