use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use vda_lib::output::VDA_OUTPUT_VERSION;
use vda_lib::{
    run_accept, select_surfaces, AcceptOutput, AuditError, BaselineStore, DirectoryProvider,
    ProgressCallback, VdaOutput,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the accept command.
#[allow(clippy::too_many_arguments)]
pub async fn run_accept_command(
    config_path: Option<PathBuf>,
    verbose: bool,
    captures: Option<PathBuf>,
    baseline_dir: Option<PathBuf>,
    surfaces: Vec<String>,
    all: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    // Baseline acceptance is always explicit: name the surfaces or say --all.
    if !all && surfaces.is_empty() {
        return render_error(
            AuditError::config("accept requires --surface <SLUG> or --all"),
            format,
            output,
        );
    }
    if all && !surfaces.is_empty() {
        return render_error(
            AuditError::config("--all and --surface are mutually exclusive"),
            format,
            output,
        );
    }

    let mut config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if let Some(dir) = captures {
        config.capture_dir = dir;
    }
    if let Some(dir) = baseline_dir {
        config.baseline_dir = dir;
    }

    let selection = match select_surfaces(&config, &surfaces) {
        Ok(selection) => selection,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if verbose {
        eprintln!(
            "Accepting {} surface(s) from {} into {}",
            selection.len(),
            config.capture_dir.display(),
            config.baseline_dir.display()
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

    let outcome = match run_accept(&config, selection, provider, store, progress).await {
        Ok(outcome) => outcome,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let body = VdaOutput::Accept(AcceptOutput {
        version: VDA_OUTPUT_VERSION.to_string(),
        accepted: outcome.accepted,
        skipped: outcome.skipped,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::config(err.to_string()), format, output);
    }

    ExitCode::SUCCESS
}
