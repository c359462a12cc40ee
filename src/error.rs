use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Concurrent baseline write for surface '{surface}'")]
    ConcurrentBaselineWrite { surface: String },

    #[error("Rule evaluation error: {0}")]
    Rule(String),
}

impl AuditError {
    pub fn config(message: impl Into<String>) -> Self {
        AuditError::Config(message.into())
    }

    pub fn capture(message: impl Into<String>) -> Self {
        AuditError::Capture(message.into())
    }

    pub fn rule(message: impl Into<String>) -> Self {
        AuditError::Rule(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            AuditError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            AuditError::Image(e) => ErrorPayload::new(
                ErrorCategory::Image,
                e.to_string(),
                "Verify image path/format and readability.",
            ),
            AuditError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check snapshot/metadata JSON; run with --verbose for details.",
            ),
            AuditError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("capture directory") || lower.contains("captures directory") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Point --captures at a directory containing <slug>.png and <slug>.json pairs.",
                    )
                } else if lower.contains("design spec") || lower.contains("yaml") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the --design-spec file exists and parses as YAML design checks.",
                    )
                } else if lower.contains("slug") || lower.contains("surface") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Surface slugs are route--viewport or route--viewport--state; route and viewport names must not contain '--'.",
                    )
                } else if lower.contains("toml") || lower.contains("config file") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check the config file path and TOML syntax (see vda.toml defaults).",
                    )
                } else if lower.contains("baseline") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check --baseline-dir; run `vda baselines` to inspect the store.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the run configuration.",
                    )
                }
            }
            AuditError::Capture(msg) => ErrorPayload::new(
                ErrorCategory::Capture,
                msg.to_string(),
                "Ensure the capture provider wrote both <slug>.png and <slug>.json for the surface.",
            ),
            AuditError::ConcurrentBaselineWrite { surface } => ErrorPayload::new(
                ErrorCategory::Baseline,
                format!("Concurrent baseline write for surface '{surface}'"),
                "Serialize accepts per surface and retry sequentially.",
            ),
            AuditError::Rule(msg) => ErrorPayload::new(
                ErrorCategory::Rule,
                msg.to_string(),
                "Check design-check parameters in the config or design spec.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Image,
    Capture,
    Baseline,
    Rule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
