use crate::config::DesignChecks;
use crate::error::Result;
use crate::surface::Surface;
use crate::types::{RuleCategory, Severity, StructuralSnapshot, Violation};

use super::{ColorAudit, ForbiddenPatternsCheck, SpacingAudit, UxPatternsCheck};

/// One design rule category. Implementations are pure: they read the
/// snapshot and their own parameters, nothing else.
pub trait RuleCheck: Send + Sync {
    fn category(&self) -> RuleCategory;
    fn evaluate(&self, snapshot: &StructuralSnapshot, surface: &Surface) -> Result<Vec<Violation>>;
}

/// Assemble the checks the configuration enables. A disabled category is
/// skipped entirely, not evaluated and discarded.
pub fn enabled_checks(checks: &DesignChecks) -> Vec<Box<dyn RuleCheck>> {
    let mut out: Vec<Box<dyn RuleCheck>> = Vec::new();
    if checks.color_audit.enabled {
        out.push(Box::new(ColorAudit::new(checks.color_audit.clone())));
    }
    if checks.spacing.enabled {
        out.push(Box::new(SpacingAudit::new(checks.spacing.clone())));
    }
    if checks.ux_patterns.enabled {
        out.push(Box::new(UxPatternsCheck::new(checks.ux_patterns.clone())));
    }
    if checks.forbidden_patterns.enabled {
        out.push(Box::new(ForbiddenPatternsCheck::new(
            checks.forbidden_patterns.clone(),
        )));
    }
    out
}

/// Run every check against one snapshot. Evaluation order does not affect
/// the result set; a check that fails is isolated as a rule-configuration
/// violation while the remaining checks still run.
pub fn evaluate_rules(
    checks: &[Box<dyn RuleCheck>],
    snapshot: &StructuralSnapshot,
    surface: &Surface,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for check in checks {
        match check.evaluate(snapshot, surface) {
            Ok(mut found) => violations.append(&mut found),
            Err(err) => violations.push(Violation {
                rule: RuleCategory::RuleConfiguration,
                surface: surface.slug(),
                severity: Severity::Warning,
                message: format!("{} check did not run: {err}", check.category()),
                evidence: None,
            }),
        }
    }
    violations
}
