pub mod portfolio;
pub mod user;
