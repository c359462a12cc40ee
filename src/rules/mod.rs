//! Design rule evaluation.
//!
//! Each rule category inspects the structural snapshot independently:
//! - color audit (hardcoded literals vs the declared palette)
//! - spacing validation (padding/gap against the density scale)
//! - UX pattern conformance (navigation, feedback, loading markers)
//! - forbidden structural patterns
//!
//! Evaluation is heuristic: rules match patterns and selectors over captured
//! markup facts, so false positives are possible (a legitimate literal inside
//! a data visualization, say).

mod color;
mod forbidden;
mod patterns;
mod runner;
mod spacing;


pub use color::ColorAudit;
pub use forbidden::ForbiddenPatternsCheck;
pub use patterns::UxPatternsCheck;
pub use runner::{enabled_checks, evaluate_rules, RuleCheck};
pub use spacing::SpacingAudit;
