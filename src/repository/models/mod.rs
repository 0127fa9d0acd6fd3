pub mod care;
pub mod plant;
pub mod plant_user;
pub mod reminder_delivery;
pub mod user;
