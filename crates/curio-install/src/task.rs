//! Installation task contract

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::InstallContext;
use crate::result::InstallResult;

/// Variables handed to a task before it runs
pub type TaskVars = HashMap<String, String>;

/// A single ordered setup step
///
/// A task reports progress and failure only through `result`; recording an
/// error message halts the installation after this task.
#[async_trait]
pub trait InstallTask: Send {
    async fn perform(&mut self, result: &mut InstallResult);

    /// Receive the shared installation context. Ignored by default.
    fn set_context(&mut self, _context: Arc<InstallContext>) {}

    /// Receive the variables registered for this task. Ignored by default.
    fn set_vars(&mut self, _vars: TaskVars) {}
}
