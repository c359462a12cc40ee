//! Result types for the audit report.
//!
//! These are the machine-readable records the engine produces: the pixel
//! diff outcome per surface, design-rule violations with evidence, and the
//! aggregated per-run report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::surface::Surface;

/// Verdict of comparing one surface against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffVerdict {
    Pass,
    Fail,
    /// No baseline exists for the surface. Not a pass and not a fail;
    /// tooling should offer acceptance.
    NoBaseline,
}

impl DiffVerdict {
    /// Whether this verdict fails the surface. `NoBaseline` does not.
    pub fn is_failing(&self) -> bool {
        matches!(self, DiffVerdict::Fail)
    }
}

/// A clustered region of differing pixels, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Differing pixels inside the bounds.
    pub diff_pixels: u32,
}

/// Result of the pixel comparison for one surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub verdict: DiffVerdict,
    /// Differing-pixel fraction in [0, 1]. 1.0 on dimension mismatch,
    /// 0.0 when no baseline exists.
    pub ratio: f64,
    /// The configured maximum the ratio was judged against.
    pub max_diff_pixel_ratio: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<DiffRegion>,
    /// Current and baseline image dimensions did not match.
    pub dimension_mismatch: bool,
    /// Stabilization was not attested for the capture; the result stands but
    /// carries less confidence.
    pub low_confidence: bool,
    /// Rendered heatmap artifact, when the caller requested one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<PathBuf>,
}

/// Severity of a design-rule violation. `Warning` reports; `Error` fails the
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The rule category a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    ColorAudit,
    Spacing,
    UxPatterns,
    ForbiddenPatterns,
    /// A rule whose evaluation itself failed (malformed parameters); carries
    /// the failure as a violation instead of aborting the run.
    RuleConfiguration,
}

impl RuleCategory {
    /// The evaluable categories, in reporting order.
    pub const fn checks() -> [RuleCategory; 4] {
        [
            RuleCategory::ColorAudit,
            RuleCategory::Spacing,
            RuleCategory::UxPatterns,
            RuleCategory::ForbiddenPatterns,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::ColorAudit => "color-audit",
            RuleCategory::Spacing => "spacing",
            RuleCategory::UxPatterns => "ux-patterns",
            RuleCategory::ForbiddenPatterns => "forbidden-patterns",
            RuleCategory::RuleConfiguration => "rule-configuration",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine-readable evidence attached to a violation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Selector describing the offending node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// The CSS property involved, when the violation concerns a style value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// The matched text or value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

/// A single detected deviation from a design rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule: RuleCategory,
    /// Slug of the surface the violation applies to.
    pub surface: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

/// Everything known about one surface after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceRecord {
    pub surface: Surface,
    pub slug: String,
    pub diff: DiffResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Diff verdict non-failing AND no error-severity violations.
    pub passed: bool,
}

/// Surface counts by outcome.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub no_baseline: usize,
    pub low_confidence: usize,
    pub violations: usize,
}

/// The top-level audit output: one record per captured surface, plus the
/// orphaned baselines and the overall verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub surfaces: Vec<SurfaceRecord>,
    /// Baselines with no corresponding surface in the current configuration.
    /// Reported, never deleted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphan_baselines: Vec<Surface>,
    pub summary: RunSummary,
    /// AND over all surfaces' pass/fail.
    pub passed: bool,
}
