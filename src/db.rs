pub mod user_repo;
pub use user_repo::UserRepository;
pub mod floor_repo;
pub use floor_repo::FloorRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod menu_repo;
pub use menu_repo::MenuRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
