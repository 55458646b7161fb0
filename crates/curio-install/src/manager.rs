//! Installation manager
//!
//! Runs registered tasks in registration order against a database that has
//! not been installed yet. A run stops at the first task that records an
//! error; completed tasks are not rolled back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use curio_core::constants::INSTALL_CHECK_TABLE;
use curio_core::{AppError, LogLevel};
use curio_db::{PgSchemaInspector, SchemaInspector};

use crate::context::InstallContext;
use crate::error::InstallError;
use crate::registry::TaskRegistry;
use crate::result::InstallResult;
use crate::task::TaskVars;
use crate::tasks;

pub const ALREADY_INSTALLED_MESSAGE: &str = "Curio is already installed.";

pub struct InstallationManager {
    registry: TaskRegistry,
    context: Arc<InstallContext>,
    inspector: Arc<dyn SchemaInspector>,
    tasks: Vec<String>,
    vars: HashMap<String, TaskVars>,
}

impl InstallationManager {
    pub fn new(
        registry: TaskRegistry,
        context: Arc<InstallContext>,
        inspector: Arc<dyn SchemaInspector>,
    ) -> Self {
        Self {
            registry,
            context,
            inspector,
            tasks: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Manager with the built-in registry and task list, inspecting the
    /// context's own database
    pub fn with_default_tasks(context: Arc<InstallContext>) -> Result<Self, InstallError> {
        let inspector = Arc::new(PgSchemaInspector::new(context.pool.clone()));
        let mut manager = Self::new(tasks::default_registry(), context, inspector);
        manager.register_tasks(tasks::DEFAULT_TASKS.iter().copied())?;
        Ok(manager)
    }

    /// Append a task to the run
    ///
    /// Fails without touching the task list when the identifier is unknown
    /// or already registered.
    pub fn register_task(&mut self, id: &str) -> Result<(), InstallError> {
        self.check_registrable(id, &[])?;
        self.tasks.push(id.to_string());
        Ok(())
    }

    /// Append several tasks; none are added if any identifier is rejected
    pub fn register_tasks<I, S>(&mut self, ids: I) -> Result<(), InstallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pending: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            self.check_registrable(id, &pending)?;
            pending.push(id.to_string());
        }
        self.tasks.extend(pending);
        Ok(())
    }

    fn check_registrable(&self, id: &str, pending: &[String]) -> Result<(), InstallError> {
        if !self.registry.contains(id) {
            return Err(InstallError::UnknownTask(id.to_string()));
        }
        if self.tasks.iter().chain(pending).any(|t| t == id) {
            return Err(InstallError::DuplicateTask(id.to_string()));
        }
        Ok(())
    }

    /// Registered task identifiers, in run order
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Set the variables handed to a task before it runs
    pub fn register_vars(&mut self, id: impl Into<String>, vars: TaskVars) {
        self.vars.insert(id.into(), vars);
    }

    pub fn vars(&self, id: &str) -> Option<&TaskVars> {
        self.vars.get(id)
    }

    /// Whether the database already carries an installation
    pub async fn is_installed(&self) -> Result<bool, AppError> {
        let marker = self.context.config.table_name(INSTALL_CHECK_TABLE);
        let tables = self.inspector.list_table_names().await?;
        Ok(tables.iter().any(|t| *t == marker))
    }

    /// Run every registered task in order
    #[tracing::instrument(skip(self), fields(task_count = self.tasks.len()))]
    pub async fn install(&self) -> InstallResult {
        let mut result = InstallResult::new();

        match self.is_installed().await {
            Ok(false) => {}
            Ok(true) => {
                tracing::warn!("Refusing to install over an existing installation");
                result.add_error(ALREADY_INSTALLED_MESSAGE);
                return result;
            }
            Err(e) => {
                log_inspection_error(&e);
                result.add_error(format!("Could not inspect the database: {}", e));
                return result;
            }
        }

        for id in &self.tasks {
            let start = Instant::now();
            let Some(mut task) = self.registry.create(id) else {
                result.add_error(InstallError::UnknownTask(id.clone()).to_string());
                return result;
            };

            task.set_context(self.context.clone());
            if let Some(vars) = self.vars.get(id) {
                task.set_vars(vars.clone());
            }
            task.perform(&mut result).await;

            let elapsed = start.elapsed();
            result.add_notice(format!("time: {:.2}", elapsed.as_secs_f64()));

            if result.is_error() {
                tracing::warn!(
                    task = %id,
                    duration_ms = elapsed.as_millis() as u64,
                    "Installation task failed, stopping"
                );
                return result;
            }
            tracing::info!(
                task = %id,
                duration_ms = elapsed.as_millis() as u64,
                "Installation task completed"
            );
        }

        tracing::info!("Installation completed");
        result
    }
}

fn log_inspection_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, "Failed to inspect the database schema")
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), code, "Failed to inspect the database schema")
        }
    }
}
