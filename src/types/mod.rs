//! Shared data types for snapshots, diffs, and audit reports.

pub mod report;
pub mod structural;

pub use report::{
    AuditReport, DiffRegion, DiffResult, DiffVerdict, Evidence, RuleCategory, RunSummary, Severity,
    SurfaceRecord, Violation,
};
pub use structural::{BoundingBox, StructuralNode, StructuralSnapshot, StyleFacts};
