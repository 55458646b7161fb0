use curio_install::tasks::{AddDefaultSettingsTask, CreateFirstUserTask};
use curio_install::{InstallMessage, InstallResult, MessageSeverity, TaskVars};

/// Administrator and site details collected by `curio install`
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
    pub title: String,
    pub time_zone: String,
}

impl InstallOptions {
    /// Variables for the built-in tasks that take any, keyed by task id
    pub fn task_vars(&self) -> Vec<(&'static str, TaskVars)> {
        let user = TaskVars::from([
            ("name".to_string(), self.admin_name.clone()),
            ("email".to_string(), self.admin_email.clone()),
            ("password".to_string(), self.admin_password.clone()),
        ]);
        let settings = TaskVars::from([
            ("administrator_email".to_string(), self.admin_email.clone()),
            ("installation_title".to_string(), self.title.clone()),
            ("time_zone".to_string(), self.time_zone.clone()),
        ]);

        vec![
            (CreateFirstUserTask::ID, user),
            (AddDefaultSettingsTask::ID, settings),
        ]
    }
}

/// One line per message, prefixed with its severity
pub fn format_message(message: &InstallMessage) -> String {
    let label = match message.severity {
        MessageSeverity::Success => "[ok]",
        MessageSeverity::Notice => "[..]",
        MessageSeverity::Error => "[!!]",
    };
    format!("{} {}", label, message.message)
}

pub fn render_result(result: &InstallResult) -> String {
    result
        .messages()
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("curio=info")),
        )
        .init();
}
