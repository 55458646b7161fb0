use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use curio_core::StorageBackend;

use crate::context::InstallContext;
use crate::result::InstallResult;
use crate::task::InstallTask;

/// Checks that the directories the application writes to are usable
#[derive(Default)]
pub struct CheckEnvironmentTask {
    context: Option<Arc<InstallContext>>,
}

impl CheckEnvironmentTask {
    pub const ID: &'static str = "check_environment";
}

#[async_trait]
impl InstallTask for CheckEnvironmentTask {
    async fn perform(&mut self, result: &mut InstallResult) {
        let Some(context) = super::require_context(&self.context, Self::ID, result) else {
            return;
        };
        let config = &context.config;

        if let Err(message) = check_writable_dir(&config.temp_dir, "temporary directory") {
            result.add_error(message);
            return;
        }

        if config.storage_backend == StorageBackend::Local {
            let Some(storage_path) = config.local_storage_path().map(Path::new) else {
                result.add_error("LOCAL_STORAGE_PATH must be set for local storage.");
                return;
            };
            if let Err(e) = tokio::fs::create_dir_all(storage_path).await {
                result.add_error(format!(
                    "Cannot create the storage directory {}: {}",
                    storage_path.display(),
                    e
                ));
                return;
            }
            if let Err(message) = check_writable_dir(storage_path, "storage directory") {
                result.add_error(message);
                return;
            }
        }

        result.add_success("Environment checks passed.");
    }

    fn set_context(&mut self, context: Arc<InstallContext>) {
        self.context = Some(context);
    }
}

/// Existence and writability check; the probe file is removed on return
fn check_writable_dir(dir: &Path, label: &str) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("The {} {} does not exist.", label, dir.display()));
    }
    tempfile::tempfile_in(dir)
        .map(|_| ())
        .map_err(|e| format!("The {} {} is not writable: {}", label, dir.display(), e))
}
