use std::sync::Arc;

use async_trait::async_trait;
use curio_db::db::schema;

use crate::context::InstallContext;
use crate::result::InstallResult;
use crate::task::InstallTask;

/// Creates the prefixed tables in one transaction
#[derive(Default)]
pub struct InstallSchemaTask {
    context: Option<Arc<InstallContext>>,
}

impl InstallSchemaTask {
    pub const ID: &'static str = "install_schema";
}

#[async_trait]
impl InstallTask for InstallSchemaTask {
    async fn perform(&mut self, result: &mut InstallResult) {
        let Some(context) = super::require_context(&self.context, Self::ID, result) else {
            return;
        };

        match schema::install(&context.pool, context.table_prefix()).await {
            Ok(()) => result.add_success("Installed the database schema."),
            Err(e) => result.add_error(format!("Failed to install the database schema: {:#}", e)),
        }
    }

    fn set_context(&mut self, context: Arc<InstallContext>) {
        self.context = Some(context);
    }
}
