//! Forbidden-pattern audit.
//!
//! Structural anti-patterns that are never acceptable regardless of styling,
//! so every hit is an error. Only the patterns named in the configuration
//! are matched.

use crate::config::{ForbiddenChecks, ForbiddenPattern};
use crate::error::Result;
use crate::surface::Surface;
use crate::types::{Evidence, RuleCategory, Severity, StructuralNode, StructuralSnapshot, Violation};

use super::RuleCheck;

pub struct ForbiddenPatternsCheck {
    params: ForbiddenChecks,
}

impl ForbiddenPatternsCheck {
    pub fn new(params: ForbiddenChecks) -> Self {
        Self { params }
    }

    fn matches(&self, pattern: ForbiddenPattern) -> bool {
        self.params.patterns.contains(&pattern)
    }
}

impl RuleCheck for ForbiddenPatternsCheck {
    fn category(&self) -> RuleCategory {
        RuleCategory::ForbiddenPatterns
    }

    fn evaluate(&self, snapshot: &StructuralSnapshot, surface: &Surface) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for node in &snapshot.nodes {
            if self.matches(ForbiddenPattern::NestedDialog) && is_dialog(node) {
                let nested_in = snapshot
                    .ancestors(node.id)
                    .into_iter()
                    .find(|ancestor| is_dialog(ancestor));
                if let Some(ancestor) = nested_in {
                    violations.push(forbidden(
                        surface,
                        ForbiddenPattern::NestedDialog,
                        "dialog nested inside another dialog",
                        Evidence {
                            selector: Some(node.selector()),
                            matched: Some(ancestor.selector()),
                            ..Evidence::default()
                        },
                    ));
                }
            }

            if !is_button(node) {
                continue;
            }

            if self.matches(ForbiddenPattern::IconOnlyPrimaryButton)
                && is_primary(node)
                && lacks_accessible_name(snapshot, node)
            {
                violations.push(forbidden(
                    surface,
                    ForbiddenPattern::IconOnlyPrimaryButton,
                    "primary button has no text or accessible name",
                    Evidence {
                        selector: Some(node.selector()),
                        expected: Some("text content, aria-label, or title".to_string()),
                        actual: Some("none".to_string()),
                        ..Evidence::default()
                    },
                ));
            }

            if self.matches(ForbiddenPattern::GradientButton) {
                let gradient = node
                    .style
                    .as_ref()
                    .and_then(|style| style.background_image.as_deref())
                    .filter(|value| value.to_ascii_lowercase().contains("gradient"));
                if let Some(value) = gradient {
                    violations.push(forbidden(
                        surface,
                        ForbiddenPattern::GradientButton,
                        "button background uses a gradient",
                        Evidence {
                            selector: Some(node.selector()),
                            property: Some("background-image".to_string()),
                            matched: Some(value.to_string()),
                            ..Evidence::default()
                        },
                    ));
                }
            }
        }
        Ok(violations)
    }
}

fn forbidden(
    surface: &Surface,
    pattern: ForbiddenPattern,
    detail: &str,
    evidence: Evidence,
) -> Violation {
    Violation {
        rule: RuleCategory::ForbiddenPatterns,
        surface: surface.slug(),
        severity: Severity::Error,
        message: format!("{pattern}: {detail}"),
        evidence: Some(evidence),
    }
}

fn is_dialog(node: &StructuralNode) -> bool {
    node.tag.eq_ignore_ascii_case("dialog")
        || matches!(node.attr("role"), Some("dialog") | Some("alertdialog"))
        || node.has_class("modal")
}

fn is_button(node: &StructuralNode) -> bool {
    node.tag.eq_ignore_ascii_case("button") || node.attr("role") == Some("button")
}

fn is_primary(node: &StructuralNode) -> bool {
    node.classes.iter().any(|class| class.contains("primary"))
}

/// A button is icon-only when neither its subtree text nor its labelling
/// attributes give it a name.
fn lacks_accessible_name(snapshot: &StructuralSnapshot, node: &StructuralNode) -> bool {
    let labelled = |attr: &str| {
        node.attr(attr)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    };
    !labelled("aria-label")
        && !labelled("title")
        && snapshot.subtree_text(node.id).trim().is_empty()
}
