pub mod auth;
pub mod floor;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod settings;
pub mod tables;
pub mod users;
