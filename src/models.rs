pub mod auth;
pub mod floor;
pub mod menu;
pub mod order;
pub mod settings;
pub mod report;
