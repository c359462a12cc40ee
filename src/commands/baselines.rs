use std::path::PathBuf;
use std::process::ExitCode;

use vda_lib::output::VDA_OUTPUT_VERSION;
use vda_lib::{plan_surfaces, AuditError, BaselineStore, BaselinesOutput, VdaOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the baselines command.
pub async fn run_baselines_command(
    config_path: Option<PathBuf>,
    verbose: bool,
    baseline_dir: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let mut config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    if let Some(dir) = baseline_dir {
        config.baseline_dir = dir;
    }
    if verbose {
        eprintln!("Listing baselines under {}", config.baseline_dir.display());
    }

    let store = match BaselineStore::open(&config.baseline_dir) {
        Ok(store) => store,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let baselines = match store.list() {
        Ok(entries) => entries,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let orphans = match store.orphans(&plan_surfaces(&config)) {
        Ok(orphans) => orphans,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let body = VdaOutput::Baselines(BaselinesOutput {
        version: VDA_OUTPUT_VERSION.to_string(),
        baseline_dir: config.baseline_dir.clone(),
        baselines,
        orphans,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(AuditError::config(err.to_string()), format, output);
    }

    ExitCode::SUCCESS
}
