//! Mandated UX-pattern audit.
//!
//! Checks that surfaces exercising an interaction (navigation, feedback,
//! loading) implement it in the mandated style. A surface with no trace of
//! the interaction is exempt; the pattern mandate says how to do a thing,
//! not that every surface must do it.

use crate::config::{FeedbackMechanism, LoadingStyle, NavigationStyle, UxPatternChecks};
use crate::error::Result;
use crate::surface::Surface;
use crate::types::{Evidence, RuleCategory, Severity, StructuralSnapshot, Violation};

use super::RuleCheck;

pub struct UxPatternsCheck {
    params: UxPatternChecks,
}

impl UxPatternsCheck {
    pub fn new(params: UxPatternChecks) -> Self {
        Self { params }
    }
}

impl RuleCheck for UxPatternsCheck {
    fn category(&self) -> RuleCategory {
        RuleCategory::UxPatterns
    }

    fn evaluate(&self, snapshot: &StructuralSnapshot, surface: &Surface) -> Result<Vec<Violation>> {
        let markers = Markers::collect(snapshot);
        let mut violations = Vec::new();

        if markers.navigation_present && !markers.satisfies_navigation(self.params.navigation) {
            violations.push(pattern_violation(
                surface,
                "navigation",
                self.params.navigation.as_str(),
                markers.observed_navigation(),
            ));
        }
        if markers.feedback_present && !markers.satisfies_feedback(self.params.feedback) {
            violations.push(pattern_violation(
                surface,
                "feedback",
                self.params.feedback.as_str(),
                markers.observed_feedback(),
            ));
        }
        if markers.loading_present && !markers.satisfies_loading(self.params.loading) {
            violations.push(pattern_violation(
                surface,
                "loading",
                self.params.loading.as_str(),
                markers.observed_loading(),
            ));
        }
        Ok(violations)
    }
}

fn pattern_violation(
    surface: &Surface,
    interaction: &str,
    expected: &str,
    observed: Vec<&'static str>,
) -> Violation {
    let actual = if observed.is_empty() {
        "none".to_string()
    } else {
        observed.join(", ")
    };
    Violation {
        rule: RuleCategory::UxPatterns,
        surface: surface.slug(),
        severity: Severity::Warning,
        message: format!(
            "{interaction} markers do not match the mandated {expected} pattern"
        ),
        evidence: Some(Evidence {
            property: Some(interaction.to_string()),
            expected: Some(expected.to_string()),
            actual: Some(actual),
            ..Evidence::default()
        }),
    }
}

/// Marker bits gathered in one pass over the snapshot.
///
/// The `*_present` flags say the interaction exists on the surface at all;
/// the per-style flags say which implementations of it were seen.
#[derive(Debug, Default)]
struct Markers {
    navigation_present: bool,
    sidebar: bool,
    topnav: bool,
    feedback_present: bool,
    toast: bool,
    inline: bool,
    modal: bool,
    loading_present: bool,
    skeleton: bool,
    spinner: bool,
    shimmer: bool,
}

impl Markers {
    fn collect(snapshot: &StructuralSnapshot) -> Self {
        let mut m = Self::default();
        for node in &snapshot.nodes {
            let tag = node.tag.to_ascii_lowercase();
            let role = node.attr("role").unwrap_or("");

            if node.has_class("sidebar") || tag == "aside" {
                m.sidebar = true;
            }
            if node.has_class("topnav") || node.has_class("navbar") {
                m.topnav = true;
            }
            if tag == "nav" {
                m.navigation_present = true;
            }

            if node.has_class("toast") || node.has_class("snackbar") {
                m.toast = true;
            }
            if node.has_class("inline-feedback") || node.has_class("field-error") {
                m.inline = true;
            }
            if role == "alertdialog" {
                m.modal = true;
            }
            if role == "alert" || role == "status" {
                m.feedback_present = true;
            }

            if node.has_class("skeleton") || node.attr("data-testid") == Some("skeleton") {
                m.skeleton = true;
            }
            if node.has_class("spinner") || node.has_class("loader") {
                m.spinner = true;
            }
            if node.has_class("shimmer") {
                m.shimmer = true;
            }
            if node.attr("aria-busy") == Some("true") {
                m.loading_present = true;
            }
        }
        m.navigation_present |= m.sidebar || m.topnav;
        m.feedback_present |= m.toast || m.inline || m.modal;
        m.loading_present |= m.skeleton || m.spinner || m.shimmer;
        m
    }

    fn satisfies_navigation(&self, style: NavigationStyle) -> bool {
        match style {
            NavigationStyle::Sidebar => self.sidebar,
            NavigationStyle::Topnav => self.topnav,
            NavigationStyle::Hybrid => self.sidebar && self.topnav,
        }
    }

    fn satisfies_feedback(&self, mechanism: FeedbackMechanism) -> bool {
        match mechanism {
            FeedbackMechanism::Toast => self.toast,
            FeedbackMechanism::Inline => self.inline,
            FeedbackMechanism::Modal => self.modal,
        }
    }

    fn satisfies_loading(&self, style: LoadingStyle) -> bool {
        match style {
            LoadingStyle::Skeleton => self.skeleton,
            LoadingStyle::Spinner => self.spinner,
            LoadingStyle::Shimmer => self.shimmer,
        }
    }

    fn observed_navigation(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.sidebar {
            out.push("sidebar");
        }
        if self.topnav {
            out.push("topnav");
        }
        out
    }

    fn observed_feedback(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.toast {
            out.push("toast");
        }
        if self.inline {
            out.push("inline");
        }
        if self.modal {
            out.push("modal");
        }
        out
    }

    fn observed_loading(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.skeleton {
            out.push("skeleton");
        }
        if self.spinner {
            out.push("spinner");
        }
        if self.shimmer {
            out.push("shimmer");
        }
        out
    }
}
