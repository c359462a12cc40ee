//! Spacing-rhythm audit.
//!
//! Padding and gap values must sit on the active density's spacing unit
//! within a small tolerance. Only pixel-valued components are audited;
//! relative units (em, %, auto) are outside the snapshot's resolution.

use crate::config::SpacingChecks;
use crate::error::{AuditError, Result};
use crate::surface::Surface;
use crate::types::{Evidence, RuleCategory, Severity, StructuralSnapshot, Violation};

use super::RuleCheck;

pub struct SpacingAudit {
    params: SpacingChecks,
}

impl SpacingAudit {
    pub fn new(params: SpacingChecks) -> Self {
        Self { params }
    }
}

impl RuleCheck for SpacingAudit {
    fn category(&self) -> RuleCategory {
        RuleCategory::Spacing
    }

    fn evaluate(&self, snapshot: &StructuralSnapshot, surface: &Surface) -> Result<Vec<Violation>> {
        let unit = f64::from(self.params.scale.unit_for(self.params.density));
        let tolerance = f64::from(self.params.tolerance_px);
        if unit <= 0.0 {
            return Err(AuditError::rule(format!(
                "spacing unit for {} density must be positive, got {unit}",
                self.params.density
            )));
        }
        // At tolerance >= unit/2 every value is within tolerance of some
        // multiple and the check can never fire.
        if tolerance * 2.0 >= unit {
            return Err(AuditError::rule(format!(
                "tolerance {tolerance}px is too large for a {unit}px spacing unit; every value would pass"
            )));
        }

        let mut violations = Vec::new();
        for node in &snapshot.nodes {
            let Some(style) = node.style.as_ref() else {
                continue;
            };
            for (property, value) in style.spacing_properties() {
                let Some(value) = value else { continue };
                let offending = off_rhythm_components(value, unit, tolerance);
                if offending.is_empty() {
                    continue;
                }
                violations.push(Violation {
                    rule: RuleCategory::Spacing,
                    surface: surface.slug(),
                    severity: Severity::Warning,
                    message: format!(
                        "{property} of {value} breaks the {unit}px spacing rhythm"
                    ),
                    evidence: Some(Evidence {
                        selector: Some(node.selector()),
                        property: Some(property.to_string()),
                        matched: Some(value.to_string()),
                        expected: Some(format!("multiple of {unit}px")),
                        actual: Some(offending.join(", ")),
                    }),
                });
            }
        }
        Ok(violations)
    }
}

/// Pixel components of a shorthand value that are not within tolerance of a
/// multiple of the unit. Zero is always on rhythm.
fn off_rhythm_components(value: &str, unit: f64, tolerance: f64) -> Vec<String> {
    let mut offending = Vec::new();
    for component in value.split_whitespace() {
        let Some(px) = parse_px(component) else {
            continue;
        };
        let nearest = (px / unit).round() * unit;
        if (px - nearest).abs() > tolerance {
            offending.push(format!("{px}px"));
        }
    }
    offending
}

fn parse_px(component: &str) -> Option<f64> {
    if component == "0" {
        return Some(0.0);
    }
    component.strip_suffix("px")?.parse().ok()
}
