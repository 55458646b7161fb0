//! Known installation tasks
//!
//! Maps task identifiers to factories. Only types implementing
//! `InstallTask` can be registered, so the capability contract is checked
//! by the compiler; identifiers are checked against this registry when a
//! manager registers them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::task::InstallTask;

type TaskFactory = Arc<dyn Fn() -> Box<dyn InstallTask> + Send + Sync>;

#[derive(Clone, Default)]
pub struct TaskRegistry {
    factories: HashMap<String, TaskFactory>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task type built with `Default`
    pub fn register<T>(&mut self, id: impl Into<String>) -> &mut Self
    where
        T: InstallTask + Default + 'static,
    {
        self.register_factory(id, || Box::new(T::default()))
    }

    /// Register a task built by a custom factory
    pub fn register_factory<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn InstallTask> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Instantiate a fresh task
    pub fn create(&self, id: &str) -> Option<Box<dyn InstallTask>> {
        self.factories.get(id).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("TaskRegistry").field("tasks", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::InstallResult;
    use async_trait::async_trait;

    #[derive(Default)]
    struct Noop;

    #[async_trait]
    impl InstallTask for Noop {
        async fn perform(&mut self, result: &mut InstallResult) {
            result.add_success("noop");
        }
    }

    #[test]
    fn registered_ids_are_known() {
        let mut registry = TaskRegistry::new();
        registry.register::<Noop>("noop");

        assert!(registry.contains("noop"));
        assert!(!registry.contains("other"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_returns_none_for_unknown_id() {
        let registry = TaskRegistry::new();
        assert!(registry.create("missing").is_none());
    }

    #[tokio::test]
    async fn factory_builds_fresh_tasks() {
        let mut registry = TaskRegistry::new();
        registry.register::<Noop>("noop");

        let mut result = InstallResult::new();
        let mut task = registry.create("noop").unwrap();
        task.perform(&mut result).await;

        assert_eq!(result.messages().len(), 1);
    }
}
