use std::sync::Arc;

use async_trait::async_trait;
use sqlx::Postgres;

use crate::context::InstallContext;
use crate::result::InstallResult;
use crate::task::InstallTask;

/// Oldest supported server, as `server_version_num`
pub const MIN_SERVER_VERSION_NUM: i32 = 120000;

/// Checks that the database answers and runs a supported server version
#[derive(Default)]
pub struct CheckDatabaseConfigurationTask {
    context: Option<Arc<InstallContext>>,
}

impl CheckDatabaseConfigurationTask {
    pub const ID: &'static str = "check_database_configuration";
}

#[async_trait]
impl InstallTask for CheckDatabaseConfigurationTask {
    async fn perform(&mut self, result: &mut InstallResult) {
        let Some(context) = super::require_context(&self.context, Self::ID, result) else {
            return;
        };

        if let Err(e) = sqlx::query("SELECT 1").execute(&context.pool).await {
            result.add_error(format!("Cannot connect to the database: {}", e));
            return;
        }

        let version = sqlx::query_scalar::<Postgres, i32>(
            "SELECT current_setting('server_version_num')::int",
        )
        .fetch_one(&context.pool)
        .await;

        match version {
            Ok(version) if version < MIN_SERVER_VERSION_NUM => {
                result.add_error(format!(
                    "PostgreSQL {} or later is required, found {}.",
                    MIN_SERVER_VERSION_NUM / 10000,
                    version_label(version)
                ));
            }
            Ok(version) => {
                tracing::debug!(server_version = version, "Database server version");
                result.add_success("Database configuration checks passed.");
            }
            Err(e) => {
                result.add_error(format!("Cannot read the database server version: {}", e));
            }
        }
    }

    fn set_context(&mut self, context: Arc<InstallContext>) {
        self.context = Some(context);
    }
}

/// Human-readable form of `server_version_num`
fn version_label(version: i32) -> String {
    if version >= 100000 {
        format!("{}.{}", version / 10000, version % 10000)
    } else {
        format!("{}.{}.{}", version / 10000, version / 100 % 100, version % 100)
    }
}
