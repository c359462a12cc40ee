//! Hardcoded-color audit.
//!
//! Scans computed-style values for hex/rgb/rgba/hsl/hsla literals that are
//! neither on the allow-list nor traceable to a declared design token. Raw
//! literals bypass the design system's single source of truth for palette.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ColorAuditChecks;
use crate::error::{AuditError, Result};
use crate::surface::Surface;
use crate::types::{Evidence, RuleCategory, Severity, StructuralSnapshot, Violation};

use super::RuleCheck;

static HEX_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").ok());

static FUNCTION_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:rgba?|hsla?)\([^)]*\)").ok());

pub struct ColorAudit {
    params: ColorAuditChecks,
}

impl ColorAudit {
    pub fn new(params: ColorAuditChecks) -> Self {
        Self { params }
    }

    /// Allow-list entries plus token values, normalized. Entries that are
    /// not recognizable color values would never match a scanned literal,
    /// so they are rejected rather than silently ignored.
    fn allowed_values(&self, hex: &Regex, func: &Regex) -> Result<HashSet<String>> {
        let mut allowed = HashSet::new();
        for value in self
            .params
            .allowed_colors
            .iter()
            .chain(self.params.tokens.values())
        {
            let trimmed = value.trim();
            if !is_recognizable_color(hex, func, trimmed) {
                return Err(AuditError::rule(format!(
                    "allow-list entry '{value}' is not a recognizable color value"
                )));
            }
            allowed.insert(normalize_color(trimmed));
        }
        Ok(allowed)
    }
}

impl RuleCheck for ColorAudit {
    fn category(&self) -> RuleCategory {
        RuleCategory::ColorAudit
    }

    fn evaluate(&self, snapshot: &StructuralSnapshot, surface: &Surface) -> Result<Vec<Violation>> {
        let hex = HEX_LITERAL
            .as_ref()
            .ok_or_else(|| AuditError::rule("hex color pattern failed to compile"))?;
        let func = FUNCTION_LITERAL
            .as_ref()
            .ok_or_else(|| AuditError::rule("color function pattern failed to compile"))?;
        let allowed = self.allowed_values(hex, func)?;

        let mut violations = Vec::new();
        for node in &snapshot.nodes {
            let Some(style) = node.style.as_ref() else {
                continue;
            };
            for (property, value) in style.color_properties() {
                let Some(value) = value else { continue };
                for literal in find_literals(hex, func, value) {
                    if allowed.contains(&normalize_color(&literal)) {
                        continue;
                    }
                    violations.push(Violation {
                        rule: RuleCategory::ColorAudit,
                        surface: surface.slug(),
                        severity: Severity::Warning,
                        message: format!(
                            "Hardcoded color {literal} in {property} bypasses the declared palette"
                        ),
                        evidence: Some(Evidence {
                            selector: Some(node.selector()),
                            property: Some(property.to_string()),
                            matched: Some(literal.clone()),
                            ..Evidence::default()
                        }),
                    });
                }
            }
        }
        Ok(violations)
    }
}

fn find_literals(hex: &Regex, func: &Regex, value: &str) -> Vec<String> {
    let mut found: Vec<String> = hex
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect();
    found.extend(func.find_iter(value).map(|m| m.as_str().to_string()));
    found
}

fn is_recognizable_color(hex: &Regex, func: &Regex, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    // CSS keywords (transparent, inherit, currentColor, named colors).
    if value.chars().all(|c| c.is_ascii_alphabetic()) {
        return true;
    }
    full_match(hex, value) || full_match(func, value)
}

fn full_match(re: &Regex, value: &str) -> bool {
    re.find(value)
        .map(|m| m.start() == 0 && m.end() == value.len())
        .unwrap_or(false)
}

/// Lowercase, strip whitespace, and expand 3-digit hex shorthand so that
/// equivalent spellings compare equal.
pub fn normalize_color(value: &str) -> String {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if let Some(hex) = compact.strip_prefix('#') {
        if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            return expanded;
        }
    }
    compact
}
