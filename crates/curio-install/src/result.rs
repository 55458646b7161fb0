//! Installation result
//!
//! One `InstallResult` is created per installation attempt and threaded
//! through every task. Recording an error-severity message marks the whole
//! result as failed, which stops the run after the current task.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSeverity {
    Success,
    Notice,
    Error,
}

impl MessageSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSeverity::Success => "success",
            MessageSeverity::Notice => "notice",
            MessageSeverity::Error => "error",
        }
    }
}

impl std::fmt::Display for MessageSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallResult {
    messages: Vec<InstallMessage>,
    is_error: bool,
}

impl InstallResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message; an `Error` message sets the error flag
    pub fn add_message(&mut self, message: impl Into<String>, severity: MessageSeverity) {
        if severity == MessageSeverity::Error {
            self.is_error = true;
        }
        self.messages.push(InstallMessage {
            message: message.into(),
            severity,
        });
    }

    pub fn add_success(&mut self, message: impl Into<String>) {
        self.add_message(message, MessageSeverity::Success);
    }

    pub fn add_notice(&mut self, message: impl Into<String>) {
        self.add_message(message, MessageSeverity::Notice);
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.add_message(message, MessageSeverity::Error);
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// All messages in the order they were recorded
    pub fn messages(&self) -> &[InstallMessage] {
        &self.messages
    }

    pub fn messages_of(&self, severity: MessageSeverity) -> impl Iterator<Item = &InstallMessage> {
        self.messages.iter().filter(move |m| m.severity == severity)
    }
}
