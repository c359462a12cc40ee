use std::path::{Path, PathBuf};

use vda_lib::{load_design_spec, AuditConfig, AuditError, Result};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct AuditFlagSources {
    pub max_diff_ratio: bool,
    pub diff_threshold: bool,
}

impl AuditFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            max_diff_ratio: flag_present(args, "--max-diff-ratio"),
            diff_threshold: flag_present(args, "--diff-threshold"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/vda/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<AuditConfig> {
    let config = AuditConfig::load(path)?;
    config.validate().map_err(|err| match err {
        AuditError::Config(msg) => {
            let prefixed = path
                .map(|p| format!("Invalid config file {}: {msg}", p.display()))
                .unwrap_or_else(|| format!("Invalid config: {msg}"));
            AuditError::config(prefixed)
        }
        other => other,
    })?;
    Ok(config)
}

/// Merge CLI arguments into the loaded config, preferring CLI values when the
/// flags are present, then re-validate the effective result.
#[allow(clippy::too_many_arguments)]
pub fn resolve_audit_config(
    mut config: AuditConfig,
    captures: Option<PathBuf>,
    baseline_dir: Option<PathBuf>,
    design_spec: Option<&Path>,
    routes: &[String],
    viewports: &[String],
    cli_max_diff_ratio: f64,
    cli_diff_threshold: f64,
    flags: &AuditFlagSources,
) -> Result<AuditConfig> {
    if let Some(dir) = captures {
        config.capture_dir = dir;
    }
    if let Some(dir) = baseline_dir {
        config.baseline_dir = dir;
    }
    if flags.max_diff_ratio {
        config.screenshot.max_diff_pixel_ratio = cli_max_diff_ratio;
    }
    if flags.diff_threshold {
        config.screenshot.threshold = cli_diff_threshold;
    }
    if let Some(path) = design_spec {
        config.design_checks = load_design_spec(path)?;
    }

    if !routes.is_empty() {
        for name in routes {
            if !config.routes.iter().any(|route| route.name == *name) {
                return Err(AuditError::config(format!(
                    "route '{name}' is not in the config"
                )));
            }
        }
        config.routes.retain(|route| routes.contains(&route.name));
    }
    if !viewports.is_empty() {
        for name in viewports {
            if !config.viewports.contains_key(name) {
                return Err(AuditError::config(format!(
                    "viewport '{name}' is not in the config"
                )));
            }
        }
        config.viewports.retain(|name, _| viewports.contains(name));
    }

    // CLI overrides can push tolerances out of range.
    config.validate().map_err(|err| match err {
        AuditError::Config(msg) => AuditError::config(format!("Invalid effective config: {msg}")),
        other => other,
    })?;
    Ok(config)
}

/// Format effective config as a single-line string for verbose logging.
pub fn format_effective_config(config: &AuditConfig, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let checks: Vec<&str> = [
        ("color-audit", config.design_checks.color_audit.enabled),
        ("spacing", config.design_checks.spacing.enabled),
        ("ux-patterns", config.design_checks.ux_patterns.enabled),
        (
            "forbidden-patterns",
            config.design_checks.forbidden_patterns.enabled,
        ),
    ]
    .iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(name, _)| *name)
    .collect();

    format!(
        "Effective config [{source}]: {} route(s) x {} viewport(s), max_diff_pixel_ratio={:.3}, threshold={:.2}, captures={}, baselines={}, checks: {}",
        config.routes.len(),
        config.viewports.len(),
        config.screenshot.max_diff_pixel_ratio,
        config.screenshot.threshold,
        config.capture_dir.display(),
        config.baseline_dir.display(),
        if checks.is_empty() {
            "none".to_string()
        } else {
            checks.join(", ")
        }
    )
}
