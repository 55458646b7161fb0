//! Built-in installation tasks

mod add_default_settings;
mod check_database;
mod check_environment;
mod create_first_user;
mod install_schema;

pub use add_default_settings::AddDefaultSettingsTask;
pub use check_database::CheckDatabaseConfigurationTask;
pub use check_environment::CheckEnvironmentTask;
pub use create_first_user::CreateFirstUserTask;
pub use install_schema::InstallSchemaTask;

use std::sync::Arc;

use curio_core::{AppError, LogLevel};

use crate::context::InstallContext;
use crate::registry::TaskRegistry;
use crate::result::InstallResult;

/// Built-in task identifiers, in run order
pub const DEFAULT_TASKS: &[&str] = &[
    CheckEnvironmentTask::ID,
    CheckDatabaseConfigurationTask::ID,
    InstallSchemaTask::ID,
    CreateFirstUserTask::ID,
    AddDefaultSettingsTask::ID,
];

/// Registry holding every built-in task
pub fn default_registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    registry
        .register::<CheckEnvironmentTask>(CheckEnvironmentTask::ID)
        .register::<CheckDatabaseConfigurationTask>(CheckDatabaseConfigurationTask::ID)
        .register::<InstallSchemaTask>(InstallSchemaTask::ID)
        .register::<CreateFirstUserTask>(CreateFirstUserTask::ID)
        .register::<AddDefaultSettingsTask>(AddDefaultSettingsTask::ID);
    registry
}

/// Context injected by the manager, or an error recorded on `result`
fn require_context<'a>(
    context: &'a Option<Arc<InstallContext>>,
    task: &str,
    result: &mut InstallResult,
) -> Option<&'a InstallContext> {
    let context = context.as_deref();
    if context.is_none() {
        result.add_error(format!("The {} task requires an installation context.", task));
    }
    context
}

/// Record a task failure, logging it at the error's own level
fn report(result: &mut InstallResult, task: &str, error: AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(task, code, error = %error, "Installation task rejected its input")
        }
        LogLevel::Error => {
            tracing::error!(task, code, error = %error.detailed_message(), "Installation task failed")
        }
    }
    result.add_error(error.to_string());
}
