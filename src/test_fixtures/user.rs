use chrono::NaiveDateTime;
use rstest::fixture;

use crate::repository::models::user::{CreateUserParams, User};

#[fixture]
pub fn user(#[default(1)] id: i32, #[default("5551234567")] phone: String) -> User {
    User {
        id,
        username: format!("gardener{}", id),
        first_name: "Ada".into(),
        last_name: "Gardener".into(),
        email: format!("gardener{}@test.local", id),
        phone,
        password_hash: "not-a-real-hash".into(),
        created_at: NaiveDateTime::parse_from_str("2021-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
    }
}

#[fixture]
pub fn create_user_params(
    #[default("gardener")] username: String,
    #[default("5551234567")] phone: String,
) -> CreateUserParams {
    CreateUserParams {
        email: format!("{}@test.local", username),
        username,
        first_name: "Ada".into(),
        last_name: "Gardener".into(),
        phone,
        password_hash: "not-a-real-hash".into(),
    }
}
