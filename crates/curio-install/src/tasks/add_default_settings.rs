use std::sync::Arc;

use async_trait::async_trait;
use curio_core::AppError;
use curio_db::SettingRepository;
use serde_json::{json, Value};

use crate::context::InstallContext;
use crate::result::InstallResult;
use crate::task::{InstallTask, TaskVars};

pub const DEFAULT_PAGINATION_PER_PAGE: u32 = 25;
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Stores the initial site-wide settings
#[derive(Default)]
pub struct AddDefaultSettingsTask {
    context: Option<Arc<InstallContext>>,
    vars: TaskVars,
}

impl AddDefaultSettingsTask {
    pub const ID: &'static str = "add_default_settings";
}

/// Settings written at installation, in write order
fn default_settings(vars: &TaskVars) -> Result<Vec<(&'static str, Value)>, AppError> {
    let required = |key: &str| -> Result<String, AppError> {
        vars.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput(format!("The {} setting is required.", key)))
    };

    let administrator_email = required("administrator_email")?;
    let installation_title = required("installation_title")?;
    let time_zone = vars
        .get("time_zone")
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_TIME_ZONE);

    Ok(vec![
        ("administrator_email", json!(administrator_email)),
        ("installation_title", json!(installation_title)),
        ("time_zone", json!(time_zone)),
        ("pagination_per_page", json!(DEFAULT_PAGINATION_PER_PAGE)),
        ("version", json!(env!("CARGO_PKG_VERSION"))),
    ])
}

#[async_trait]
impl InstallTask for AddDefaultSettingsTask {
    async fn perform(&mut self, result: &mut InstallResult) {
        let Some(context) = super::require_context(&self.context, Self::ID, result) else {
            return;
        };

        let settings = match default_settings(&self.vars) {
            Ok(settings) => settings,
            Err(e) => {
                super::report(result, Self::ID, e);
                return;
            }
        };

        let repository = SettingRepository::new(context.pool.clone(), context.table_prefix());
        for (id, value) in &settings {
            if let Err(e) = repository.set(id, value).await {
                tracing::warn!(setting = %id, "Failed to store setting");
                super::report(result, Self::ID, e);
                return;
            }
        }

        tracing::info!(count = settings.len(), "Default settings stored");
        result.add_success("Added the default settings.");
    }

    fn set_context(&mut self, context: Arc<InstallContext>) {
        self.context = Some(context);
    }

    fn set_vars(&mut self, vars: TaskVars) {
        self.vars = vars;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TaskVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builds_all_settings() {
        let settings = default_settings(&vars(&[
            ("administrator_email", "admin@example.com"),
            ("installation_title", "Archive"),
            ("time_zone", "Europe/Brussels"),
        ]))
        .unwrap();

        let ids: Vec<_> = settings.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            [
                "administrator_email",
                "installation_title",
                "time_zone",
                "pagination_per_page",
                "version"
            ]
        );
        assert_eq!(settings[2].1, json!("Europe/Brussels"));
        assert_eq!(settings[3].1, json!(25));
        assert_eq!(settings[4].1, json!(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn time_zone_defaults_to_utc() {
        let settings = default_settings(&vars(&[
            ("administrator_email", "admin@example.com"),
            ("installation_title", "Archive"),
        ]))
        .unwrap();
        assert_eq!(settings[2].1, json!("UTC"));
    }

    #[test]
    fn requires_title_and_email() {
        let message = default_settings(&vars(&[("administrator_email", "a@b.c")]))
            .unwrap_err()
            .to_string();
        assert!(message.contains("installation_title"));

        let message = default_settings(&vars(&[("installation_title", "Archive")]))
            .unwrap_err()
            .to_string();
        assert!(message.contains("administrator_email"));
    }
}
