pub mod clock;
pub mod context;
pub mod db_utils;
pub mod error;
