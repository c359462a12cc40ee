use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};
use serde_json::Value;
use tempfile::TempDir;
use vda_lib::{
    BoundingBox, DiffVerdict, ErrorCategory, RuleCategory, Severity, StructuralNode,
    StructuralSnapshot, StyleFacts, VdaOutput,
};

const SINGLE_ROUTE_CONFIG: &str = r#"
[[routes]]
name = "home"
path = "/"

[viewports.desktop]
width = 320
height = 240
"#;

const TWO_ROUTE_CONFIG: &str = r#"
[[routes]]
name = "home"
path = "/"

[[routes]]
name = "login"
path = "/login"

[viewports.desktop]
width = 320
height = 240
"#;

const MASKED_REGION_CONFIG: &str = r#"
hide_selectors = [".promo-banner"]

[[routes]]
name = "home"
path = "/"

[viewports.desktop]
width = 320
height = 240
"#;

fn bin_path() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_vda")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("target")
                .join("debug")
                .join(if cfg!(windows) { "vda.exe" } else { "vda" })
        })
}

/// Capture, baseline, and artifact directories plus a config file, all under
/// one temp dir that lives as long as the test.
struct Workspace {
    _dir: TempDir,
    config: PathBuf,
    captures: PathBuf,
    baselines: PathBuf,
    artifacts: PathBuf,
}

fn workspace(config_toml: &str) -> Workspace {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("vda.toml");
    let captures = dir.path().join("captures");
    let baselines = dir.path().join("baselines");
    let artifacts = dir.path().join("artifacts");
    fs::write(&config, config_toml).expect("write config");
    fs::create_dir_all(&captures).expect("create captures dir");
    fs::create_dir_all(&baselines).expect("create baselines dir");
    Workspace {
        _dir: dir,
        config,
        captures,
        baselines,
        artifacts,
    }
}

impl Workspace {
    fn base_args(&self, command: &str) -> Vec<String> {
        vec![
            command.to_string(),
            "--config".to_string(),
            self.config.to_string_lossy().into_owned(),
            "--captures".to_string(),
            self.captures.to_string_lossy().into_owned(),
            "--baseline-dir".to_string(),
            self.baselines.to_string_lossy().into_owned(),
        ]
    }
}

fn run_vda(args: &[String]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .expect("run vda command")
}

fn parse_output(stdout: &[u8]) -> VdaOutput {
    serde_json::from_slice(stdout).expect("output should be valid JSON")
}

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("output should parse as JSON")
}

fn node(id: u32, tag: &str, parent: Option<u32>) -> StructuralNode {
    StructuralNode {
        id,
        tag: tag.to_string(),
        parent,
        children: Vec::new(),
        classes: Vec::new(),
        attributes: BTreeMap::new(),
        text: None,
        bounding_box: None,
        style: None,
    }
}

fn body_snapshot() -> StructuralSnapshot {
    StructuralSnapshot {
        nodes: vec![node(0, "body", None)],
        stabilized: true,
    }
}

/// Snapshot with a gradient-background button, which the default forbidden
/// pattern list flags at error severity. The gradient stops stay inside the
/// default color allow list so only one rule fires.
fn gradient_button_snapshot() -> StructuralSnapshot {
    let mut body = node(0, "body", None);
    body.children = vec![1];
    let mut button = node(1, "button", Some(0));
    button.text = Some("Save".to_string());
    button.style = Some(StyleFacts {
        background_image: Some(
            "linear-gradient(to right, currentColor, transparent)".to_string(),
        ),
        ..StyleFacts::default()
    });
    StructuralSnapshot {
        nodes: vec![body, button],
        stabilized: true,
    }
}

fn write_capture(dir: &Path, slug: &str, color: [u8; 4], snapshot: &StructuralSnapshot) {
    let img = RgbaImage::from_pixel(4, 4, Rgba(color));
    img.save(dir.join(format!("{slug}.png")))
        .expect("write capture image");
    let json = serde_json::to_string(snapshot).expect("serialize snapshot");
    fs::write(dir.join(format!("{slug}.json")), json).expect("write snapshot");
}

#[test]
fn audit_without_baseline_passes_and_reports_it() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let output = run_vda(&ws.base_args("audit"));

    assert_eq!(output.status.code(), Some(0));
    assert!(
        output.stderr.is_empty(),
        "stderr should be empty on success"
    );
    match parse_output(&output.stdout) {
        VdaOutput::Audit(out) => {
            assert!(out.report.passed, "missing baseline alone must not fail");
            assert_eq!(out.report.summary.total, 1);
            assert_eq!(out.report.summary.no_baseline, 1);
            assert_eq!(out.report.surfaces[0].diff.verdict, DiffVerdict::NoBaseline);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn accept_all_then_audit_passes() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    let accept = run_vda(&accept_args);
    assert_eq!(accept.status.code(), Some(0));
    match parse_output(&accept.stdout) {
        VdaOutput::Accept(out) => {
            assert_eq!(out.accepted.len(), 1);
            assert_eq!(out.accepted[0].surface.route, "home");
            assert_eq!(out.accepted[0].width, 4);
            assert!(out.skipped.is_empty());
            assert!(!out.accepted[0].snapshot_hash.is_empty());
        }
        other => panic!("expected accept output, got {other:?}"),
    }

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(0));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert!(out.report.passed);
            assert_eq!(out.report.summary.passed, 1);
            assert_eq!(out.report.surfaces[0].diff.verdict, DiffVerdict::Pass);
            assert_eq!(out.report.surfaces[0].diff.ratio, 0.0);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn audit_fails_after_visual_regression() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    // Same surface, completely different pixels.
    write_capture(&ws.captures, "home--desktop", [20, 20, 220, 255], &body_snapshot());

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(1));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert!(!out.report.passed);
            assert_eq!(out.report.summary.failed, 1);
            let record = &out.report.surfaces[0];
            assert_eq!(record.diff.verdict, DiffVerdict::Fail);
            assert!(record.diff.ratio > record.diff.max_diff_pixel_ratio);
            assert!(
                !record.diff.regions.is_empty(),
                "full-image change should cluster into at least one region"
            );
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn audit_writes_heatmap_under_artifacts_dir() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    write_capture(&ws.captures, "home--desktop", [20, 20, 220, 255], &body_snapshot());

    let mut audit_args = ws.base_args("audit");
    audit_args.push("--artifacts-dir".to_string());
    audit_args.push(ws.artifacts.to_string_lossy().into_owned());
    let audit = run_vda(&audit_args);

    assert_eq!(audit.status.code(), Some(1));
    let heatmap = ws.artifacts.join("home--desktop-diff.png");
    assert!(heatmap.is_file(), "expected heatmap at {}", heatmap.display());
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert_eq!(out.report.surfaces[0].diff.diff_image.as_deref(), Some(heatmap.as_path()));
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn tolerance_override_lets_small_drift_pass() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    // One pixel out of sixteen: ratio 0.0625.
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([200, 40, 40, 255]));
    img.put_pixel(0, 0, Rgba([20, 20, 220, 255]));
    img.save(ws.captures.join("home--desktop.png"))
        .expect("write drifted capture");

    let strict = run_vda(&ws.base_args("audit"));
    assert_eq!(strict.status.code(), Some(1), "0.0625 exceeds the default 0.01");

    let mut loose_args = ws.base_args("audit");
    loose_args.push("--max-diff-ratio".to_string());
    loose_args.push("0.5".to_string());
    let loose = run_vda(&loose_args);
    assert_eq!(loose.status.code(), Some(0));
    match parse_output(&loose.stdout) {
        VdaOutput::Audit(out) => {
            let diff = &out.report.surfaces[0].diff;
            assert_eq!(diff.verdict, DiffVerdict::Pass);
            assert_eq!(diff.max_diff_pixel_ratio, 0.5);
            assert!(diff.ratio > 0.0);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn masked_regions_churn_without_failing_the_audit() {
    let ws = workspace(MASKED_REGION_CONFIG);

    let mut body = node(0, "body", None);
    body.children = vec![1];
    let mut banner = node(1, "div", Some(0));
    banner.classes.push("promo-banner".to_string());
    banner.text = Some("Today only".to_string());
    banner.bounding_box = Some(BoundingBox {
        x: 0.0,
        y: 0.0,
        width: 2.0,
        height: 4.0,
    });
    let snapshot = StructuralSnapshot {
        nodes: vec![body, banner],
        stabilized: true,
    };

    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &snapshot);
    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    // Repaint only the region covered by the hidden banner.
    let mut img = RgbaImage::from_pixel(4, 4, Rgba([200, 40, 40, 255]));
    for y in 0..4 {
        for x in 0..2 {
            img.put_pixel(x, y, Rgba([20, 20, 220, 255]));
        }
    }
    img.save(ws.captures.join("home--desktop.png"))
        .expect("write churned capture");

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(0));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            let diff = &out.report.surfaces[0].diff;
            assert_eq!(diff.verdict, DiffVerdict::Pass);
            assert_eq!(diff.ratio, 0.0);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn audit_fails_on_dimension_mismatch() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    let wider = RgbaImage::from_pixel(6, 4, Rgba([200, 40, 40, 255]));
    wider
        .save(ws.captures.join("home--desktop.png"))
        .expect("write resized capture");

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(1));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            let diff = &out.report.surfaces[0].diff;
            assert_eq!(diff.verdict, DiffVerdict::Fail);
            assert!(diff.dimension_mismatch);
            assert_eq!(diff.ratio, 1.0);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn error_severity_violation_fails_surface_without_baseline() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(
        &ws.captures,
        "home--desktop",
        [200, 40, 40, 255],
        &gradient_button_snapshot(),
    );

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(1));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert!(!out.report.passed);
            let record = &out.report.surfaces[0];
            assert_eq!(record.diff.verdict, DiffVerdict::NoBaseline);
            assert!(!record.passed, "error violation must fail the surface");
            let violation = record
                .violations
                .iter()
                .find(|v| v.rule == RuleCategory::ForbiddenPatterns)
                .expect("gradient button should be flagged");
            assert_eq!(violation.severity, Severity::Error);
            assert!(violation.message.contains("gradient"));
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn route_filter_narrows_the_matrix() {
    let ws = workspace(TWO_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());
    write_capture(&ws.captures, "login--desktop", [40, 200, 40, 255], &body_snapshot());

    let mut args = ws.base_args("audit");
    args.push("--route".to_string());
    args.push("home".to_string());
    let audit = run_vda(&args);

    assert_eq!(audit.status.code(), Some(0));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert_eq!(out.report.summary.total, 1);
            assert_eq!(out.report.surfaces[0].slug, "home--desktop");
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn audit_with_unknown_route_filter_is_fatal() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);

    let mut args = ws.base_args("audit");
    args.push("--route".to_string());
    args.push("checkout".to_string());
    let audit = run_vda(&args);

    assert_eq!(audit.status.code(), Some(2));
    let err = parse_json(&audit.stdout);
    assert_eq!(err.get("mode").and_then(|v| v.as_str()), Some("error"));
    let message = err
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    assert!(
        message.contains("checkout"),
        "error should name the unknown route, got {message}"
    );
}

#[test]
fn audit_missing_capture_dir_is_fatal() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    let missing = ws.captures.with_file_name("nowhere");

    let audit = run_vda(&[
        "audit".to_string(),
        "--config".to_string(),
        ws.config.to_string_lossy().into_owned(),
        "--captures".to_string(),
        missing.to_string_lossy().into_owned(),
        "--baseline-dir".to_string(),
        ws.baselines.to_string_lossy().into_owned(),
    ]);

    assert_eq!(audit.status.code(), Some(2));
    match parse_output(&audit.stdout) {
        VdaOutput::Error(out) => {
            assert_eq!(out.error.category, ErrorCategory::Config);
            let remediation = out.error.remediation.unwrap_or_default();
            assert!(
                remediation.contains("--captures"),
                "expected --captures hint, got {remediation}"
            );
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn unpaired_capture_is_fatal() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    let img = RgbaImage::from_pixel(4, 4, Rgba([200, 40, 40, 255]));
    img.save(ws.captures.join("home--desktop.png"))
        .expect("write image without snapshot");

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(2));
    match parse_output(&audit.stdout) {
        VdaOutput::Error(out) => {
            assert_eq!(out.error.category, ErrorCategory::Capture);
            assert!(out.error.message.contains("structural snapshot"));
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn accept_requires_surface_selection() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let accept = run_vda(&ws.base_args("accept"));
    assert_eq!(accept.status.code(), Some(2));
    let err = parse_json(&accept.stdout);
    assert_eq!(err.get("mode").and_then(|v| v.as_str()), Some("error"));
    let message = err
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    assert!(
        message.contains("--all"),
        "error should point at the selection flags, got {message}"
    );
}

#[test]
fn accept_rejects_unknown_surface_slug() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut args = ws.base_args("accept");
    args.push("--surface".to_string());
    args.push("checkout--desktop".to_string());
    let accept = run_vda(&args);

    assert_eq!(accept.status.code(), Some(2));
    match parse_output(&accept.stdout) {
        VdaOutput::Error(out) => {
            let remediation = out.error.remediation.unwrap_or_default();
            assert!(
                remediation.contains("route--viewport"),
                "expected slug format hint, got {remediation}"
            );
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn accept_selected_surface_skips_the_rest() {
    let ws = workspace(TWO_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());
    write_capture(&ws.captures, "login--desktop", [40, 200, 40, 255], &body_snapshot());

    let mut args = ws.base_args("accept");
    args.push("--surface".to_string());
    args.push("home--desktop".to_string());
    let accept = run_vda(&args);

    assert_eq!(accept.status.code(), Some(0));
    match parse_output(&accept.stdout) {
        VdaOutput::Accept(out) => {
            assert_eq!(out.accepted.len(), 1);
            assert_eq!(out.accepted[0].surface.route, "home");
        }
        other => panic!("expected accept output, got {other:?}"),
    }
    assert!(ws.baselines.join("home--desktop.png").is_file());
    assert!(!ws.baselines.join("login--desktop.png").exists());
}

#[test]
fn accept_reports_surfaces_with_no_capture_as_skipped() {
    let ws = workspace(TWO_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut args = ws.base_args("accept");
    args.push("--all".to_string());
    let accept = run_vda(&args);

    assert_eq!(accept.status.code(), Some(0), "skips are not failures");
    match parse_output(&accept.stdout) {
        VdaOutput::Accept(out) => {
            assert_eq!(out.accepted.len(), 1);
            assert_eq!(out.skipped, vec!["login--desktop".to_string()]);
        }
        other => panic!("expected accept output, got {other:?}"),
    }
}

#[test]
fn baselines_lists_entries_and_orphans() {
    let ws = workspace(TWO_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());
    write_capture(&ws.captures, "login--desktop", [40, 200, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    // The login route leaves the config; its baseline becomes an orphan.
    fs::write(&ws.config, SINGLE_ROUTE_CONFIG).expect("rewrite config");

    let list = run_vda(&[
        "baselines".to_string(),
        "--config".to_string(),
        ws.config.to_string_lossy().into_owned(),
        "--baseline-dir".to_string(),
        ws.baselines.to_string_lossy().into_owned(),
    ]);

    assert_eq!(list.status.code(), Some(0));
    match parse_output(&list.stdout) {
        VdaOutput::Baselines(out) => {
            assert_eq!(out.baselines.len(), 2);
            let slugs: Vec<&str> = out.baselines.iter().map(|b| b.slug.as_str()).collect();
            assert!(slugs.contains(&"home--desktop"));
            assert!(slugs.contains(&"login--desktop"));
            assert_eq!(out.orphans.len(), 1);
            assert_eq!(out.orphans[0].route, "login");
        }
        other => panic!("expected baselines output, got {other:?}"),
    }
}

#[test]
fn orphan_baselines_do_not_fail_the_audit() {
    let ws = workspace(TWO_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());
    write_capture(&ws.captures, "login--desktop", [40, 200, 40, 255], &body_snapshot());

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    fs::write(&ws.config, SINGLE_ROUTE_CONFIG).expect("rewrite config");
    fs::remove_file(ws.captures.join("login--desktop.png")).expect("drop login capture");
    fs::remove_file(ws.captures.join("login--desktop.json")).expect("drop login snapshot");

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(0));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert!(out.report.passed);
            assert_eq!(out.report.orphan_baselines.len(), 1);
            assert_eq!(out.report.orphan_baselines[0].route, "login");
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}

#[test]
fn invalid_config_file_is_fatal() {
    let ws = workspace("not even toml [[[");

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(2));
    let err = parse_json(&audit.stdout);
    assert_eq!(err.get("mode").and_then(|v| v.as_str()), Some("error"));
    assert_eq!(err.get("category").and_then(|v| v.as_str()), Some("config"));
}

#[test]
fn pretty_output_stays_json_when_piped() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());

    let mut args = ws.base_args("audit");
    args.push("--format".to_string());
    args.push("pretty".to_string());
    let audit = run_vda(&args);

    assert_eq!(audit.status.code(), Some(0));
    let pretty = parse_json(&audit.stdout);
    assert_eq!(pretty.get("mode").and_then(|v| v.as_str()), Some("audit"));
    assert_eq!(pretty.get("passed").and_then(|v| v.as_bool()), Some(true));
}

#[test]
fn output_flag_writes_report_to_file_and_keeps_stdout_empty() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &body_snapshot());
    let out_path = ws.config.with_file_name("report.json");

    let mut args = ws.base_args("audit");
    args.push("--output".to_string());
    args.push(out_path.to_string_lossy().into_owned());
    let audit = run_vda(&args);

    assert_eq!(audit.status.code(), Some(0));
    assert!(
        audit.stdout.is_empty(),
        "when writing to file, stdout should stay empty"
    );
    let content = fs::read_to_string(&out_path).expect("read report file");
    let json: Value = serde_json::from_str(&content).expect("report file should be JSON");
    assert_eq!(json.get("mode").and_then(|v| v.as_str()), Some("audit"));
}

#[test]
fn unstable_capture_is_marked_low_confidence() {
    let ws = workspace(SINGLE_ROUTE_CONFIG);
    let mut snapshot = body_snapshot();
    snapshot.stabilized = false;
    write_capture(&ws.captures, "home--desktop", [200, 40, 40, 255], &snapshot);

    let mut accept_args = ws.base_args("accept");
    accept_args.push("--all".to_string());
    assert_eq!(run_vda(&accept_args).status.code(), Some(0));

    let audit = run_vda(&ws.base_args("audit"));
    assert_eq!(audit.status.code(), Some(0));
    match parse_output(&audit.stdout) {
        VdaOutput::Audit(out) => {
            assert!(out.report.surfaces[0].diff.low_confidence);
            assert_eq!(out.report.summary.low_confidence, 1);
        }
        other => panic!("expected audit output, got {other:?}"),
    }
}
