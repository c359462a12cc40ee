use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vda_lib::{AuditError, DiffVerdict, ErrorOutput, Severity, Surface, VdaOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &VdaOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: AuditError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = VdaOutput::Error(ErrorOutput::from_payload(err.to_payload()));

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; failed surfaces use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(
    body: &VdaOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &VdaOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &VdaOutput, colorize: bool) -> String {
    match body {
        VdaOutput::Audit(out) => {
            let report = &out.report;
            let mut buf = String::new();
            let status = if report.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if report.passed { "32" } else { "31" }, colorize);
            writeln!(
                buf,
                "{} Design audit: {}/{} surfaces passed",
                status_colored, report.summary.passed, report.summary.total
            )
            .ok();
            if report.summary.no_baseline > 0 {
                writeln!(
                    buf,
                    "{} surface(s) have no baseline; run `vda accept` to set one",
                    report.summary.no_baseline
                )
                .ok();
            }

            if !report.surfaces.is_empty() {
                writeln!(buf, "Surfaces:").ok();
                for record in &report.surfaces {
                    let verdict = match record.diff.verdict {
                        DiffVerdict::Pass => color("pass", "32", colorize),
                        DiffVerdict::Fail => color("FAIL", "31", colorize),
                        DiffVerdict::NoBaseline => color("no baseline", "33", colorize),
                    };
                    let mut detail = String::new();
                    if record.diff.verdict != DiffVerdict::NoBaseline {
                        write!(
                            detail,
                            "  ratio {:.4} (max {:.4})",
                            record.diff.ratio, record.diff.max_diff_pixel_ratio
                        )
                        .ok();
                    }
                    if record.diff.dimension_mismatch {
                        detail.push_str(", dimension mismatch");
                    }
                    if !record.diff.regions.is_empty() {
                        write!(detail, ", {} region(s)", record.diff.regions.len()).ok();
                    }
                    if record.diff.low_confidence {
                        detail.push_str(", low confidence");
                    }
                    writeln!(buf, "- {:32} {}{}", record.slug, verdict, detail).ok();
                    if let Some(path) = &record.diff.diff_image {
                        writeln!(buf, "  heatmap: {}", path.display()).ok();
                    }
                }
            }

            let violation_count: usize =
                report.surfaces.iter().map(|r| r.violations.len()).sum();
            if violation_count > 0 {
                writeln!(buf, "Violations ({violation_count}):").ok();
                for record in &report.surfaces {
                    for violation in &record.violations {
                        let severity = match violation.severity {
                            Severity::Error => color("error", "31", colorize),
                            Severity::Warning => color("warning", "33", colorize),
                        };
                        writeln!(
                            buf,
                            "- [{}] {} {}: {}",
                            severity, violation.surface, violation.rule, violation.message
                        )
                        .ok();
                    }
                }
            }

            if !report.orphan_baselines.is_empty() {
                let slugs: Vec<String> =
                    report.orphan_baselines.iter().map(Surface::slug).collect();
                writeln!(
                    buf,
                    "Orphan baselines ({}): {}",
                    slugs.len(),
                    slugs.join(", ")
                )
                .ok();
            }
            buf
        }
        VdaOutput::Accept(out) => {
            let mut buf = String::new();
            let header = color("[ACCEPT]", "36", colorize);
            writeln!(buf, "{} {} baseline(s) accepted", header, out.accepted.len()).ok();
            for metadata in &out.accepted {
                writeln!(
                    buf,
                    "- {:32} {}x{}",
                    metadata.surface.slug(),
                    metadata.width,
                    metadata.height
                )
                .ok();
            }
            if !out.skipped.is_empty() {
                writeln!(buf, "Skipped (no capture): {}", out.skipped.join(", ")).ok();
            }
            buf
        }
        VdaOutput::Baselines(out) => {
            let mut buf = String::new();
            let header = color("[BASELINES]", "34", colorize);
            writeln!(
                buf,
                "{} {} stored under {}",
                header,
                out.baselines.len(),
                out.baseline_dir.display()
            )
            .ok();
            for entry in &out.baselines {
                match &entry.metadata {
                    Some(metadata) => {
                        let hash = metadata
                            .snapshot_hash
                            .get(..12)
                            .unwrap_or(&metadata.snapshot_hash);
                        writeln!(
                            buf,
                            "- {:32} {}x{}  snapshot {}",
                            entry.slug, metadata.width, metadata.height, hash
                        )
                        .ok();
                    }
                    None => {
                        writeln!(buf, "- {:32} (no metadata)", entry.slug).ok();
                    }
                }
            }
            if !out.orphans.is_empty() {
                let slugs: Vec<String> = out.orphans.iter().map(Surface::slug).collect();
                writeln!(buf, "Orphans (no longer in the matrix): {}", slugs.join(", ")).ok();
            }
            buf
        }
        VdaOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            writeln!(buf, "{} {}", header, out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Determine exit code for the audit command.
pub fn exit_code_for_audit(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
