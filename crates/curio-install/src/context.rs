//! Shared execution context handed to installation tasks

use std::sync::Arc;

use curio_core::Config;
use sqlx::PgPool;

/// State shared by every task of one installation run.
///
/// Tasks that need it receive it through `InstallTask::set_context`
/// before they are performed.
#[derive(Clone)]
pub struct InstallContext {
    pub config: Arc<Config>,
    pub pool: PgPool,
}

impl InstallContext {
    pub fn new(config: Arc<Config>, pool: PgPool) -> Self {
        Self { config, pool }
    }

    pub fn table_prefix(&self) -> &str {
        &self.config.table_prefix
    }
}
