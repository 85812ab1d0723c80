//! Record API update responses.

use serde::{Deserialize, Serialize};

/// Options for submitting an updated record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Ask the API to skip its low-level validation checks.
    pub bypass_low_validation: bool,
}

/// Response to a record update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Informational messages.
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Warnings raised while storing the record.
    #[serde(default)]
    pub warnings: Vec<ApiMessage>,
    /// Server-side triggers that fired.
    #[serde(default)]
    pub triggers: Vec<ApiMessage>,
    /// Errors raised while storing the record.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

/// A single message in an update response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Machine-readable code, if the API sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Message text.
    pub message: String,
}

impl ApiMessage {
    /// Create a message without a code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl UpdateResponse {
    /// Returns true if the API reported no errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if the API reported warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Joined message texts.
    pub fn message_text(&self) -> String {
        join(&self.messages)
    }

    /// Joined warning texts.
    pub fn warning_text(&self) -> String {
        join(&self.warnings)
    }

    /// Joined trigger texts.
    pub fn trigger_text(&self) -> String {
        join(&self.triggers)
    }

    /// Joined error texts.
    pub fn error_text(&self) -> String {
        join(&self.errors)
    }
}

fn join(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(|m| m.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
