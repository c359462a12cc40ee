use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use vda_lib::output::VDA_OUTPUT_VERSION;
use vda_lib::{
    run_audit, AuditError, AuditOptions, AuditOutput, BaselineStore, DirectoryProvider,
    ProgressCallback, VdaOutput,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_audit, render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, resolve_audit_config, AuditFlagSources,
};

/// Run the audit command.
#[allow(clippy::too_many_arguments)]
pub async fn run_audit_command(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    captures: Option<PathBuf>,
    baseline_dir: Option<PathBuf>,
    design_spec: Option<PathBuf>,
    routes: Vec<String>,
    viewports: Vec<String>,
    max_diff_ratio: f64,
    diff_threshold: f64,
    artifacts_dir: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = AuditFlagSources::from_args(raw_args);
    let config = match resolve_audit_config(
        config,
        captures,
        baseline_dir,
        design_spec.as_deref(),
        &routes,
        &viewports,
        max_diff_ratio,
        diff_threshold,
        &flag_sources,
    ) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };

    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, config_path.as_deref())
        );
    }

    if !config.capture_dir.is_dir() {
        return render_error(
            AuditError::config(format!(
                "Capture directory not found: {}. Run the capture provider first.",
                config.capture_dir.display()
            )),
            format,
            output,
        );
    }

    let provider = Arc::new(DirectoryProvider::new(&config.capture_dir));
    let store = match BaselineStore::open(&config.baseline_dir) {
        Ok(store) => Arc::new(store),
        Err(err) => return render_error(err, format, output.clone()),
    };
    let progress: Option<ProgressCallback> = if verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    };

    let report = match run_audit(
        &config,
        provider,
        store,
        AuditOptions {
            artifacts_dir: artifacts_dir.clone(),
            progress,
        },
    )
    .await
    {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output.clone()),
    };

    if verbose {
        if let Some(dir) = &artifacts_dir {
            eprintln!("Diff heatmaps for failing surfaces: {}", dir.display());
        }
    }

    let passed = report.passed;
    let body = VdaOutput::Audit(AuditOutput {
        version: VDA_OUTPUT_VERSION.to_string(),
        report,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::config(err.to_string()), format, output);
    }

    exit_code_for_audit(passed)
}
