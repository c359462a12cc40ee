//! Run orchestration.
//!
//! Plans the surface matrix from the configuration, audits each surface on a
//! blocking worker task, and folds the results into one [`AuditReport`].
//! Surfaces with no capture this run are skipped; the report covers exactly
//! the captures the provider supplied.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::baseline::{BaselineMetadata, BaselineStore};
use crate::capture::CaptureProvider;
use crate::config::{AuditConfig, ScreenshotOptions};
use crate::diff::{compare, render_heatmap, DiffOptions};
use crate::error::{AuditError, Result};
use crate::normalize::normalize;
use crate::progress::ProgressCallback;
use crate::report::{aggregate, build_record};
use crate::rules::{enabled_checks, evaluate_rules, RuleCheck};
use crate::surface::Surface;
use crate::types::{AuditReport, SurfaceRecord};

/// Per-run knobs that are not part of the persisted configuration.
#[derive(Default)]
pub struct AuditOptions {
    /// Directory for failure heatmaps. None disables artifact rendering.
    pub artifacts_dir: Option<PathBuf>,
    pub progress: Option<ProgressCallback>,
}

/// Result of accepting current captures as baselines.
#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub accepted: Vec<BaselineMetadata>,
    /// Slugs of planned surfaces that had no capture to accept.
    pub skipped: Vec<String>,
}

/// The full surface matrix: every route at every viewport in every declared
/// state, in route then viewport then state order.
pub fn plan_surfaces(config: &AuditConfig) -> Vec<Surface> {
    let mut surfaces = Vec::new();
    for route in &config.routes {
        for viewport in config.viewports.keys() {
            for state in &route.states {
                surfaces.push(Surface::new(
                    route.name.clone(),
                    route.path.clone(),
                    viewport.clone(),
                    *state,
                ));
            }
        }
    }
    surfaces
}

/// Resolve explicit surface slugs against the planned matrix. An empty
/// request selects the whole matrix.
pub fn select_surfaces(config: &AuditConfig, slugs: &[String]) -> Result<Vec<Surface>> {
    let planned = plan_surfaces(config);
    if slugs.is_empty() {
        return Ok(planned);
    }
    let mut selected = Vec::with_capacity(slugs.len());
    for slug in slugs {
        match planned.iter().find(|surface| surface.slug() == *slug) {
            Some(surface) => selected.push(surface.clone()),
            None => {
                return Err(AuditError::config(format!(
                    "surface '{slug}' is not in the configured route/viewport matrix"
                )))
            }
        }
    }
    Ok(selected)
}

/// Audits every planned surface that has a capture and assembles the report.
pub async fn run_audit(
    config: &AuditConfig,
    provider: Arc<dyn CaptureProvider>,
    store: Arc<BaselineStore>,
    options: AuditOptions,
) -> Result<AuditReport> {
    let surfaces = plan_surfaces(config);
    let checks: Arc<Vec<Box<dyn RuleCheck>>> = Arc::new(enabled_checks(&config.design_checks));
    let hide_selectors = Arc::new(config.hide_selectors.clone());

    if let Some(dir) = options.artifacts_dir.as_deref() {
        fs::create_dir_all(dir)?;
    }

    let mut handles = Vec::with_capacity(surfaces.len());
    for surface in &surfaces {
        let surface = surface.clone();
        let provider = Arc::clone(&provider);
        let store = Arc::clone(&store);
        let checks = Arc::clone(&checks);
        let hide_selectors = Arc::clone(&hide_selectors);
        let screenshot = config.screenshot.clone();
        let artifacts_dir = options.artifacts_dir.clone();
        let progress = options.progress.clone();
        handles.push((
            surface.slug(),
            tokio::task::spawn_blocking(move || {
                audit_surface(
                    surface,
                    provider.as_ref(),
                    &store,
                    &checks,
                    &hide_selectors,
                    &screenshot,
                    artifacts_dir.as_deref(),
                    &progress,
                )
            }),
        ));
    }

    let mut records = Vec::new();
    for (slug, handle) in handles {
        let outcome = handle.await.map_err(|err| {
            AuditError::capture(format!(
                "Audit task for surface '{slug}' did not complete: {err}"
            ))
        })??;
        if let Some(record) = outcome {
            records.push(record);
        }
    }

    let orphans = store.orphans(&surfaces)?;
    Ok(aggregate(records, orphans))
}

/// Accepts the current capture of each selected surface as its baseline.
/// Captures are normalized first so baselines compare cleanly on later runs.
pub async fn run_accept(
    config: &AuditConfig,
    surfaces: Vec<Surface>,
    provider: Arc<dyn CaptureProvider>,
    store: Arc<BaselineStore>,
    progress: Option<ProgressCallback>,
) -> Result<AcceptOutcome> {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    for surface in surfaces {
        let slug = surface.slug();
        let provider = Arc::clone(&provider);
        let store = Arc::clone(&store);
        let hide_selectors = config.hide_selectors.clone();
        let screenshot = config.screenshot.clone();
        let progress = progress.clone();

        let outcome = tokio::task::spawn_blocking(move || -> Result<Option<BaselineMetadata>> {
            let Some(capture) = provider.fetch(&surface)? else {
                return Ok(None);
            };
            let capture = normalize(capture, &hide_selectors, &screenshot);
            log_progress(
                &progress,
                &format!("Accepting baseline for {}", capture.surface.slug()),
            );
            Ok(Some(store.accept(&capture)?))
        })
        .await
        .map_err(|err| {
            AuditError::capture(format!(
                "Accept task for surface '{slug}' did not complete: {err}"
            ))
        })??;

        match outcome {
            Some(metadata) => accepted.push(metadata),
            None => skipped.push(slug),
        }
    }

    Ok(AcceptOutcome { accepted, skipped })
}

#[allow(clippy::too_many_arguments)]
fn audit_surface(
    surface: Surface,
    provider: &dyn CaptureProvider,
    store: &BaselineStore,
    checks: &[Box<dyn RuleCheck>],
    hide_selectors: &[String],
    screenshot: &ScreenshotOptions,
    artifacts_dir: Option<&Path>,
    progress: &Option<ProgressCallback>,
) -> Result<Option<SurfaceRecord>> {
    let slug = surface.slug();
    let Some(capture) = provider.fetch(&surface)? else {
        log_progress(progress, &format!("No capture for {slug}; skipping"));
        return Ok(None);
    };
    log_progress(progress, &format!("Auditing {slug}"));

    let capture = normalize(capture, hide_selectors, screenshot);
    let baseline = store.lookup(&surface)?;
    let mut diff = compare(
        &capture,
        baseline.as_ref(),
        &DiffOptions::from_screenshot(screenshot),
    );

    if diff.verdict.is_failing() {
        if let (Some(dir), Some(baseline)) = (artifacts_dir, baseline.as_ref()) {
            let path = dir.join(format!("{slug}-diff.png"));
            render_heatmap(&capture.image, baseline, &path)?;
            diff.diff_image = Some(path);
        }
    }

    let violations = evaluate_rules(checks, &capture.snapshot, &surface);
    Ok(Some(build_record(surface, diff, violations)))
}

fn log_progress(progress: &Option<ProgressCallback>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}
