pub mod auth;
pub mod driver;
pub mod reference;
pub mod reports;
pub mod stage;
