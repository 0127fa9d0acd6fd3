use anyhow::{anyhow, Error};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use validator::Validate;

use crate::database::{new_pool, run_migrations, DbConn, DbPool};
use crate::repository::models::{
    plant::{CreatePlantParams, NewPlant, Plant, PlantChangeset, UpdatePlantParams},
    plant_user::{PlantUser, WateringAssociation},
    reminder_delivery::ReminderDelivery,
    user::{CreateUserParams, NewUser, User},
};
use crate::repository::Repository;
use crate::schema::{plant, plant_user, reminder_delivery, user};
use crate::util::spawn_blocking_with_tracing;

pub struct Implementation {
    pool: DbPool,
}

impl Implementation {
    /// Opens the database at `database_uri` and applies pending migrations.
    pub async fn new(database_uri: &str) -> Result<Self, Error> {
        let database_uri = database_uri.to_string();
        let pool = spawn_blocking_with_tracing(move || {
            let pool = new_pool(&database_uri)?;
            run_migrations(&pool)?;

            Ok::<DbPool, Error>(pool)
        })
        .await??;

        Ok(Implementation { pool })
    }
}

fn get_conn(pool: &DbPool) -> Result<DbConn, Error> {
    pool.get().map_err(|e| anyhow!("Database error: {:?}", e))
}

fn is_unique_violation(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[async_trait]
impl Repository for Implementation {
    async fn create_plant(&self, params: CreatePlantParams) -> Result<Plant, Error> {
        params.validate()?;

        let new_plant = NewPlant::from(params);
        if new_plant.name.is_empty() {
            return Err(anyhow!("Plant name cannot be blank."));
        }

        let pool = self.pool.clone();
        let plant = spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            diesel::insert_into(plant::table)
                .values(&new_plant)
                .returning(Plant::as_returning())
                .get_result(&mut conn)
                .map_err(|e| match e {
                    e if is_unique_violation(&e) => anyhow!("Plant already exists."),
                    e => anyhow!("Internal server error when creating plant: {}", e),
                })
        })
        .await??;

        Ok(plant)
    }

    async fn create_plant_user(&self, user_id: i32, plant_id: i32) -> Result<PlantUser, Error> {
        let pool = self.pool.clone();
        let plant_user = spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            diesel::insert_into(plant_user::table)
                .values((
                    plant_user::user_id.eq(user_id),
                    plant_user::plant_id.eq(plant_id),
                ))
                .returning(PlantUser::as_returning())
                .get_result(&mut conn)
                .map_err(|e| match e {
                    e if is_unique_violation(&e) => anyhow!("Plant already in collection."),
                    e => anyhow!("Internal server error when adding plant to user: {}", e),
                })
        })
        .await??;

        Ok(plant_user)
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<User, Error> {
        params.validate()?;

        let pool = self.pool.clone();
        let new_user = spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            diesel::insert_into(user::table)
                .values(NewUser::from(&params))
                .returning(User::as_returning())
                .get_result(&mut conn)
                .map_err(|e| match e {
                    e if is_unique_violation(&e) => anyhow!("Username already exists."),
                    e => anyhow!("Internal server error when creating user: {}", e),
                })
        })
        .await??;

        Ok(new_user)
    }

    async fn delete_plant(&self, plant_id: i32) -> Result<(), Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            conn.transaction::<_, Error, _>(|conn| {
                let plant_user_ids = plant_user::table
                    .filter(plant_user::plant_id.eq(plant_id))
                    .select(plant_user::id)
                    .load::<i32>(conn)?;

                diesel::delete(
                    reminder_delivery::table
                        .filter(reminder_delivery::plant_user_id.eq_any(&plant_user_ids)),
                )
                .execute(conn)?;

                diesel::delete(plant_user::table.filter(plant_user::plant_id.eq(plant_id)))
                    .execute(conn)?;

                let deleted = diesel::delete(plant::table.find(plant_id)).execute(conn)?;
                if deleted == 0 {
                    return Err(anyhow!("Plant not found."));
                }

                Ok(())
            })
        })
        .await?
    }

    async fn delete_plant_user(&self, plant_user_id: i32) -> Result<(), Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            conn.transaction::<_, Error, _>(|conn| {
                diesel::delete(
                    reminder_delivery::table
                        .filter(reminder_delivery::plant_user_id.eq(plant_user_id)),
                )
                .execute(conn)?;

                let deleted = diesel::delete(plant_user::table.find(plant_user_id)).execute(conn)?;
                if deleted == 0 {
                    return Err(anyhow!("Plant is not in this collection."));
                }

                Ok(())
            })
        })
        .await?
    }

    async fn plant_by_id(&self, plant_id: i32) -> Result<Option<Plant>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            plant::table
                .find(plant_id)
                .select(Plant::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| anyhow!("Internal server error when fetching plant: {}", e))
        })
        .await?
    }

    async fn plant_users(&self) -> Result<Vec<WateringAssociation>, Error> {
        let pool = self.pool.clone();
        let associations = spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            plant_user::table
                .left_join(plant::table)
                .select((
                    plant_user::id,
                    plant_user::user_id,
                    plant_user::plant_id,
                    plant::water.nullable(),
                ))
                .order(plant_user::id.asc())
                .load::<WateringAssociation>(&mut conn)
                .map_err(|e| anyhow!(e))
        })
        .await?
        .map_err(|e| {
            anyhow!(
                "Internal server error when getting watering associations: {}",
                e
            )
        })?;

        Ok(associations)
    }

    async fn plant_users_for_user(&self, user_id: i32) -> Result<Vec<PlantUser>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            plant_user::table
                .filter(plant_user::user_id.eq(user_id))
                .order(plant_user::id.asc())
                .select(PlantUser::as_select())
                .load(&mut conn)
                .map_err(|e| anyhow!("Internal server error when getting user plants: {}", e))
        })
        .await?
    }

    async fn plants(&self) -> Result<Vec<Plant>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            plant::table
                .order(plant::name.asc())
                .select(Plant::as_select())
                .load(&mut conn)
                .map_err(|e| anyhow!("Internal server error when getting plants: {}", e))
        })
        .await?
    }

    async fn record_reminder(
        &self,
        plant_user_id: i32,
        sent_on: NaiveDate,
        message_id: String,
    ) -> Result<ReminderDelivery, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            diesel::insert_into(reminder_delivery::table)
                .values((
                    reminder_delivery::plant_user_id.eq(plant_user_id),
                    reminder_delivery::sent_on.eq(sent_on),
                    reminder_delivery::message_id.eq(message_id),
                ))
                .returning(ReminderDelivery::as_returning())
                .get_result(&mut conn)
                .map_err(|e| match e {
                    e if is_unique_violation(&e) => {
                        anyhow!("Reminder already recorded for {}.", sent_on)
                    }
                    e => anyhow!("Internal server error when recording reminder: {}", e),
                })
        })
        .await?
    }

    async fn reminder_sent(&self, plant_user_id: i32, sent_on: NaiveDate) -> Result<bool, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            diesel::select(exists(
                reminder_delivery::table
                    .filter(reminder_delivery::plant_user_id.eq(plant_user_id))
                    .filter(reminder_delivery::sent_on.eq(sent_on)),
            ))
            .get_result::<bool>(&mut conn)
            .map_err(|e| anyhow!("Internal server error when checking reminders: {}", e))
        })
        .await?
    }

    async fn search_plants(&self, term: String) -> Result<Vec<Plant>, Error> {
        let pattern = format!(
            "%{}%",
            term.trim()
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );

        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            // SQLite LIKE is case-insensitive for ASCII.
            plant::table
                .filter(plant::name.like(pattern).escape('\\'))
                .order(plant::name.asc())
                .select(Plant::as_select())
                .load(&mut conn)
                .map_err(|e| anyhow!("Internal server error when searching plants: {}", e))
        })
        .await?
    }

    async fn update_plant(
        &self,
        plant_id: i32,
        params: UpdatePlantParams,
    ) -> Result<Option<Plant>, Error> {
        params.validate()?;

        let changeset = PlantChangeset::new(params, Utc::now().naive_utc());
        if changeset.name.as_deref() == Some("") {
            return Err(anyhow!("Plant name cannot be blank."));
        }

        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            conn.transaction::<_, Error, _>(|conn| {
                let existing = plant::table
                    .find(plant_id)
                    .select(plant::id)
                    .first::<i32>(conn)
                    .optional()?;

                if existing.is_none() {
                    return Ok(None);
                }

                if let Some(name) = &changeset.name {
                    let taken = diesel::select(exists(
                        plant::table
                            .filter(plant::name.eq(name))
                            .filter(plant::id.ne(plant_id)),
                    ))
                    .get_result::<bool>(conn)?;

                    if taken {
                        return Err(anyhow!("Plant name already exists."));
                    }
                }

                let plant = diesel::update(plant::table.find(plant_id))
                    .set(&changeset)
                    .returning(Plant::as_returning())
                    .get_result(conn)?;

                Ok(Some(plant))
            })
        })
        .await?
    }

    async fn user_by_id(&self, user_id: i32) -> Result<Option<User>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            user::table
                .find(user_id)
                .select(User::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| anyhow!("Internal server error when fetching user: {}", e))
        })
        .await?
    }

    async fn user_by_username(&self, username: String) -> Result<Option<User>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            let result = user::table
                .filter(user::username.eq(username))
                .select(User::as_select())
                .first(&mut conn);

            match result {
                Ok(user) => Ok(Some(user)),
                Err(e) => match e {
                    DieselError::NotFound => Ok(None),
                    _ => Err(anyhow!(e)),
                },
            }
        })
        .await?
    }

    async fn users(&self) -> Result<Vec<User>, Error> {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = get_conn(&pool)?;

            user::table
                .order(user::id.asc())
                .select(User::as_select())
                .load(&mut conn)
                .map_err(|e| anyhow!("Internal server error when getting users: {}", e))
        })
        .await?
    }
}
