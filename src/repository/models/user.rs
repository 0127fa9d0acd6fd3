use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::schema::user;

#[derive(Clone, Debug, Identifiable, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = user)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// National digits only; the country code is added when a message is sent.
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateUserParams {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = user)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a CreateUserParams> for NewUser<'a> {
    fn from(params: &'a CreateUserParams) -> Self {
        NewUser {
            username: &params.username,
            first_name: &params.first_name,
            last_name: &params.last_name,
            email: &params.email,
            phone: &params.phone,
            password_hash: &params.password_hash,
        }
    }
}

/// Phone numbers are stored as ten national digits with no leading country code.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_digits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_fixtures::user::create_user_params;

    #[rstest]
    #[case("5551234567", true)]
    #[case("555123456", false)]
    #[case("+15551234567", false)]
    #[case("555-123-456", false)]
    fn test_validate_phone(#[case] phone: &str, #[case] valid: bool) {
        assert_eq!(validate_phone(phone).is_ok(), valid);
    }

    #[rstest]
    fn test_create_user_params(create_user_params: CreateUserParams) {
        assert!(create_user_params.validate().is_ok());

        let params = CreateUserParams {
            email: "not-an-email".into(),
            ..create_user_params
        };
        let errors = params.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("email"));
    }
}
