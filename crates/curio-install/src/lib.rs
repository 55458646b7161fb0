//! Curio installation
//!
//! An `InstallationManager` runs registered `InstallTask`s in order against a
//! fresh database, stopping at the first task that records an error. Every
//! outcome, including refusal to run on an already-installed database, is
//! reported through the returned `InstallResult`.

pub mod context;
pub mod error;
pub mod manager;
pub mod registry;
pub mod result;
pub mod task;
pub mod tasks;

pub use context::InstallContext;
pub use error::InstallError;
pub use manager::InstallationManager;
pub use registry::TaskRegistry;
pub use result::{InstallMessage, InstallResult, MessageSeverity};
pub use task::{InstallTask, TaskVars};
