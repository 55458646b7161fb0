//! Database repositories for data access layer
//!
//! All table names are resolved through `schema::table_name` so the
//! configured prefix applies everywhere.

pub mod schema;
pub mod setting;
pub mod transaction;
pub mod user;

pub use setting::SettingRepository;
pub use user::UserRepository;
