pub mod envelope;
pub mod user;
