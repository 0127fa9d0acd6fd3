pub mod config;
pub mod database;
pub mod error;
pub mod reminder;
pub mod repository;
pub mod schema;
pub mod sms;
pub mod telemetry;
pub mod test_fixtures;
pub mod util;
