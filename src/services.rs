pub mod auth;
pub mod floor_service;
pub mod order_lines;
pub mod order_service;
pub mod report_service;
pub mod reservation_scheduler;
pub mod table_service;
pub mod table_state;
pub mod transfer_service;
pub mod user_service;
