//! Run configuration.
//!
//! An [`AuditConfig`] is constructed once per run (from TOML, or built-in
//! defaults) and threaded into every component call; nothing in the engine
//! reads ambient global state. The design-rule parameters can alternatively
//! be supplied as a standalone YAML design specification document, which
//! replaces the config's inline `design_checks` section for the run.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::surface::ComponentState;

/// Immutable per-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Routes to audit, in report order.
    pub routes: Vec<RouteSpec>,
    /// Viewport name to dimensions.
    pub viewports: BTreeMap<String, ViewportSpec>,
    pub screenshot: ScreenshotOptions,
    /// Selectors whose regions the normalizer masks before comparison.
    pub hide_selectors: Vec<String>,
    /// Where baseline images and metadata live.
    pub baseline_dir: PathBuf,
    /// Where the file-backed capture provider reads captures from.
    pub capture_dir: PathBuf,
    pub design_checks: DesignChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Component states captured for this route.
    #[serde(default = "default_states")]
    pub states: Vec<ComponentState>,
}

fn default_states() -> Vec<ComponentState> {
    vec![ComponentState::Default]
}

impl RouteSpec {
    pub fn new(name: &str, path: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            description: Some(description.to_string()),
            states: default_states(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ViewportSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            label: None,
        }
    }

    pub fn labeled(width: u32, height: u32, label: &str) -> Self {
        Self {
            width,
            height,
            label: Some(label.to_string()),
        }
    }
}

/// Tolerances for the pixel comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotOptions {
    /// Maximum allowed fraction of differing pixels, in [0, 1].
    pub max_diff_pixel_ratio: f64,
    /// Per-pixel perceptual distance above which a pixel counts as
    /// different, in [0, 1].
    pub threshold: f64,
    /// Whether the capture provider is expected to disable animations.
    pub animations_disabled: bool,
}

impl Default for ScreenshotOptions {
    fn default() -> Self {
        Self {
            max_diff_pixel_ratio: 0.01,
            threshold: 0.2,
            animations_disabled: true,
        }
    }
}

/// Design-rule parameters, per category. Also the shape of the standalone
/// YAML design specification document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignChecks {
    pub color_audit: ColorAuditChecks,
    pub spacing: SpacingChecks,
    pub ux_patterns: UxPatternChecks,
    pub forbidden_patterns: ForbiddenChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorAuditChecks {
    pub enabled: bool,
    /// Literal values exempt from the hardcoded-color audit. Keywords and
    /// color literals both allowed; hex comparison is case-insensitive.
    pub allowed_colors: Vec<String>,
    /// Design tokens: token name to its color value. A literal equal to a
    /// token value is traceable to the design system and passes.
    pub tokens: BTreeMap<String, String>,
}

impl Default for ColorAuditChecks {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_colors: vec![
                "transparent".to_string(),
                "inherit".to_string(),
                "currentColor".to_string(),
            ],
            tokens: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacingChecks {
    pub enabled: bool,
    /// Declared density level for the product surface.
    pub density: DensityLevel,
    /// Base spacing unit per density level, in px.
    pub scale: DensityScale,
    /// Allowed deviation from the scale, in px.
    pub tolerance_px: f32,
}

impl Default for SpacingChecks {
    fn default() -> Self {
        Self {
            enabled: true,
            density: DensityLevel::Comfortable,
            scale: DensityScale::default(),
            tolerance_px: 1.0,
        }
    }
}

/// Base spacing unit per density level. Padding and gaps must sit on
/// multiples of the active level's unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DensityScale {
    pub compact: f32,
    pub comfortable: f32,
    pub spacious: f32,
}

impl Default for DensityScale {
    fn default() -> Self {
        Self {
            compact: 4.0,
            comfortable: 8.0,
            spacious: 12.0,
        }
    }
}

impl DensityScale {
    pub fn unit_for(&self, level: DensityLevel) -> f32 {
        match level {
            DensityLevel::Compact => self.compact,
            DensityLevel::Comfortable => self.comfortable,
            DensityLevel::Spacious => self.spacious,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    Compact,
    Comfortable,
    Spacious,
}

impl DensityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DensityLevel::Compact => "compact",
            DensityLevel::Comfortable => "comfortable",
            DensityLevel::Spacious => "spacious",
        }
    }
}

impl fmt::Display for DensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UxPatternChecks {
    pub enabled: bool,
    pub navigation: NavigationStyle,
    pub feedback: FeedbackMechanism,
    pub loading: LoadingStyle,
}

impl Default for UxPatternChecks {
    fn default() -> Self {
        Self {
            enabled: true,
            navigation: NavigationStyle::Sidebar,
            feedback: FeedbackMechanism::Toast,
            loading: LoadingStyle::Skeleton,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    Sidebar,
    Topnav,
    /// Both sidebar and top navigation markers must be present.
    Hybrid,
}

impl NavigationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationStyle::Sidebar => "sidebar",
            NavigationStyle::Topnav => "topnav",
            NavigationStyle::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for NavigationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMechanism {
    Toast,
    Inline,
    Modal,
}

impl FeedbackMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackMechanism::Toast => "toast",
            FeedbackMechanism::Inline => "inline",
            FeedbackMechanism::Modal => "modal",
        }
    }
}

impl fmt::Display for FeedbackMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStyle {
    Skeleton,
    Spinner,
    Shimmer,
}

impl LoadingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingStyle::Skeleton => "skeleton",
            LoadingStyle::Spinner => "spinner",
            LoadingStyle::Shimmer => "shimmer",
        }
    }
}

impl fmt::Display for LoadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForbiddenChecks {
    pub enabled: bool,
    pub patterns: Vec<ForbiddenPattern>,
}

impl Default for ForbiddenChecks {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: vec![
                ForbiddenPattern::NestedDialog,
                ForbiddenPattern::IconOnlyPrimaryButton,
                ForbiddenPattern::GradientButton,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForbiddenPattern {
    NestedDialog,
    IconOnlyPrimaryButton,
    GradientButton,
}

impl ForbiddenPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForbiddenPattern::NestedDialog => "nested-dialog",
            ForbiddenPattern::IconOnlyPrimaryButton => "icon-only-primary-button",
            ForbiddenPattern::GradientButton => "gradient-button",
        }
    }
}

impl fmt::Display for ForbiddenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        let mut viewports = BTreeMap::new();
        viewports.insert("mobile".to_string(), ViewportSpec::labeled(375, 667, "iPhone SE"));
        viewports.insert(
            "mobileLarge".to_string(),
            ViewportSpec::labeled(414, 896, "iPhone 11 Pro Max"),
        );
        viewports.insert("tablet".to_string(), ViewportSpec::labeled(768, 1024, "iPad"));
        viewports.insert(
            "tabletLandscape".to_string(),
            ViewportSpec::labeled(1024, 768, "iPad Landscape"),
        );
        viewports.insert("desktop".to_string(), ViewportSpec::labeled(1280, 720, "Desktop HD"));
        viewports.insert(
            "desktopLarge".to_string(),
            ViewportSpec::labeled(1920, 1080, "Desktop Full HD"),
        );

        Self {
            routes: vec![
                RouteSpec::new("home", "/", "Landing page"),
                RouteSpec::new("login", "/login", "Authentication page"),
                RouteSpec::new("dashboard", "/dashboard", "Main dashboard"),
            ],
            viewports,
            screenshot: ScreenshotOptions::default(),
            hide_selectors: vec![
                "[data-testid=\"timestamp\"]".to_string(),
                "[data-testid=\"random-content\"]".to_string(),
                ".dynamic-content".to_string(),
            ],
            baseline_dir: PathBuf::from("baselines"),
            capture_dir: PathBuf::from("captures"),
            design_checks: DesignChecks::default(),
        }
    }
}

impl AuditConfig {
    /// Load config from a TOML file, the central config, or defaults.
    /// Priority: explicit path > ~/.config/vda/config.toml > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_toml_file(p),
            None => match Self::central_config_path() {
                Some(p) if p.exists() => Self::from_toml_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config").join("vda").join("config.toml"))
    }

    fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| AuditError::config(format!("{}: {e}", path.display())))
    }

    /// Check ranges, name slugs, and rule parameters.
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(AuditError::config("no routes configured"));
        }
        if self.viewports.is_empty() {
            return Err(AuditError::config("no viewports configured"));
        }

        let mut seen = std::collections::HashSet::new();
        for route in &self.routes {
            validate_name("route", &route.name)?;
            if !seen.insert(route.name.as_str()) {
                return Err(AuditError::config(format!(
                    "duplicate route name '{}'",
                    route.name
                )));
            }
            if route.states.is_empty() {
                return Err(AuditError::config(format!(
                    "route '{}' lists no states",
                    route.name
                )));
            }
        }
        for (name, vp) in &self.viewports {
            validate_name("viewport", name)?;
            if vp.width == 0 || vp.height == 0 {
                return Err(AuditError::config(format!(
                    "viewport '{}' has zero dimension ({}x{})",
                    name, vp.width, vp.height
                )));
            }
        }

        let shot = &self.screenshot;
        if !(0.0..=1.0).contains(&shot.max_diff_pixel_ratio) {
            return Err(AuditError::config(format!(
                "max_diff_pixel_ratio must be in [0, 1], got {}",
                shot.max_diff_pixel_ratio
            )));
        }
        if !(0.0..=1.0).contains(&shot.threshold) {
            return Err(AuditError::config(format!(
                "threshold must be in [0, 1], got {}",
                shot.threshold
            )));
        }

        let spacing = &self.design_checks.spacing;
        for (level, unit) in [
            ("compact", spacing.scale.compact),
            ("comfortable", spacing.scale.comfortable),
            ("spacious", spacing.scale.spacious),
        ] {
            if unit <= 0.0 {
                return Err(AuditError::config(format!(
                    "spacing scale unit for '{level}' must be positive, got {unit}"
                )));
            }
        }
        if spacing.tolerance_px < 0.0 {
            return Err(AuditError::config(format!(
                "spacing tolerance_px must be non-negative, got {}",
                spacing.tolerance_px
            )));
        }

        Ok(())
    }
}

/// Route and viewport names appear in surface slugs; the slug separator is
/// reserved so the slug parses back unambiguously.
fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AuditError::config(format!("empty {kind} name")));
    }
    if name.contains("--") {
        return Err(AuditError::config(format!(
            "{kind} name '{name}' must not contain '--'"
        )));
    }
    Ok(())
}

/// Load a standalone YAML design specification document. Replaces the
/// config's inline `design_checks` for the run.
pub fn load_design_spec(path: &Path) -> Result<DesignChecks> {
    let raw = fs::read_to_string(path)?;
    serde_yaml::from_str(&raw)
        .map_err(|e| AuditError::config(format!("design spec {}: {e}", path.display())))
}
