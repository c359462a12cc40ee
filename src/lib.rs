//! Visual Design Audit (VDA) Library
//!
//! Audits captured UI surfaces two ways: pixel comparison against approved
//! baselines (with perceptual per-pixel tolerance and diff-region clustering)
//! and design-rule evaluation over structural snapshots (color palette,
//! spacing rhythm, mandated UX patterns, forbidden patterns).
//!
//! # Module Overview
//!
//! - [`capture`] - Capture intake from an external automation driver
//! - [`normalize`] - Dynamic-region masking and animation neutralization
//! - [`diff`] - Baseline comparison, diff-region clustering, heatmaps
//! - [`rules`] - Design-rule checks over structural snapshots
//! - [`baseline`] - Approved-baseline store with acceptance provenance
//! - [`audit`] - Run orchestration across the surface matrix
//! - [`config`] - Configuration file support
//! - [`types`] - Report and snapshot data types
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vda_lib::{run_audit, AuditConfig, AuditOptions, BaselineStore, DirectoryProvider};
//!
//! # async fn example() -> vda_lib::Result<()> {
//! let config = AuditConfig::default();
//! let provider = Arc::new(DirectoryProvider::new(&config.capture_dir));
//! let store = Arc::new(BaselineStore::open(&config.baseline_dir)?);
//!
//! let report = run_audit(&config, provider, store, AuditOptions::default()).await?;
//! println!("{} of {} surfaces passed", report.summary.passed, report.summary.total);
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod baseline;
pub mod capture;
pub mod config;
pub mod diff;
pub mod error;
pub mod normalize;
pub mod output;
pub mod progress;
pub mod report;
pub mod rules;
pub mod surface;
pub mod types;

// Orchestration re-exports
pub use audit::{plan_surfaces, run_accept, run_audit, select_surfaces, AcceptOutcome, AuditOptions};
pub use baseline::{BaselineEntry, BaselineMetadata, BaselineStore};
pub use capture::{Capture, CaptureProvider, DirectoryProvider};
pub use config::{
    load_design_spec, AuditConfig, DesignChecks, RouteSpec, ScreenshotOptions, ViewportSpec,
};
pub use error::{AuditError, ErrorCategory, ErrorPayload, Result};
// Comparison re-exports
pub use diff::{
    cluster_diff_regions, compare, pixel_distance, render_heatmap, DiffOptions,
    RegionClusterOptions,
};
pub use normalize::{normalize, selector_matches};
pub use progress::ProgressCallback;
pub use report::{aggregate, build_record};
pub use rules::{enabled_checks, evaluate_rules, RuleCheck};
// Data-shape re-exports
pub use output::{
    AcceptOutput, AuditOutput, BaselinesOutput, ErrorOutput, VdaOutput, VDA_OUTPUT_VERSION,
};
pub use surface::{ComponentState, Surface};
pub use types::{
    AuditReport, BoundingBox, DiffRegion, DiffResult, DiffVerdict, Evidence, RuleCategory,
    RunSummary, Severity, StructuralNode, StructuralSnapshot, StyleFacts, SurfaceRecord, Violation,
};
