//! Curio Database Library
//!
//! PostgreSQL access for the installer: connection setup, schema inspection
//! and installation, and the repositories used by installation tasks.

pub mod db;
pub mod pool;

pub use db::schema::{PgSchemaInspector, SchemaInspector};
pub use db::transaction::TransactionGuard;
pub use db::{SettingRepository, UserRepository};
pub use pool::{connect, connect_lazy};
