//! Report assembly.
//!
//! Per-surface records are built as audits finish and folded into one
//! [`AuditReport`] at the end of the run. A surface passes when its diff
//! verdict is non-failing and none of its violations reach error severity;
//! the run passes when every surface does.

use crate::surface::Surface;
use crate::types::{
    AuditReport, DiffResult, DiffVerdict, RunSummary, Severity, SurfaceRecord, Violation,
};

/// Folds a surface's diff and violations into its record.
pub fn build_record(
    surface: Surface,
    diff: DiffResult,
    violations: Vec<Violation>,
) -> SurfaceRecord {
    let passed = !diff.verdict.is_failing()
        && violations
            .iter()
            .all(|violation| violation.severity < Severity::Error);
    SurfaceRecord {
        slug: surface.slug(),
        surface,
        diff,
        violations,
        passed,
    }
}

/// Assembles the run report. Records are ordered by slug so output is
/// stable regardless of task completion order.
pub fn aggregate(mut records: Vec<SurfaceRecord>, orphan_baselines: Vec<Surface>) -> AuditReport {
    records.sort_by(|a, b| a.slug.cmp(&b.slug));

    let mut summary = RunSummary {
        total: records.len(),
        ..RunSummary::default()
    };
    for record in &records {
        if record.passed {
            summary.passed += 1;
        } else {
            summary.failed += 1;
        }
        if record.diff.verdict == DiffVerdict::NoBaseline {
            summary.no_baseline += 1;
        }
        if record.diff.low_confidence {
            summary.low_confidence += 1;
        }
        summary.violations += record.violations.len();
    }

    let passed = records.iter().all(|record| record.passed);
    AuditReport {
        surfaces: records,
        orphan_baselines,
        summary,
        passed,
    }
}
