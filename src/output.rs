use crate::baseline::{BaselineEntry, BaselineMetadata};
use crate::error::ErrorPayload;
use crate::surface::Surface;
use crate::types::AuditReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const VDA_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum VdaOutput {
    Audit(AuditOutput),
    Accept(AcceptOutput),
    Baselines(BaselinesOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOutput {
    pub version: String,
    #[serde(flatten)]
    pub report: AuditReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOutput {
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted: Vec<BaselineMetadata>,
    /// Surfaces in the matrix that had no capture to accept.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselinesOutput {
    pub version: String,
    pub baseline_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub baselines: Vec<BaselineEntry>,
    /// Stored baselines with no surface in the current matrix.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphans: Vec<Surface>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(flatten)]
    pub error: ErrorPayload,
}

impl ErrorOutput {
    pub fn from_payload(error: ErrorPayload) -> Self {
        Self {
            version: VDA_OUTPUT_VERSION.to_string(),
            error,
        }
    }
}
