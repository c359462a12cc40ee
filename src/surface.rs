use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Component state a surface was captured in.
///
/// `Default` stands for the absent state label; it is omitted from slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Default,
    Loading,
    Empty,
    Error,
}

impl ComponentState {
    pub const fn all() -> [ComponentState; 4] {
        [
            ComponentState::Default,
            ComponentState::Loading,
            ComponentState::Empty,
            ComponentState::Error,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentState::Default => "default",
            ComponentState::Loading => "loading",
            ComponentState::Empty => "empty",
            ComponentState::Error => "error",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentState {
    type Err = SurfaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(ComponentState::Default),
            "loading" => Ok(ComponentState::Loading),
            "empty" => Ok(ComponentState::Empty),
            "error" => Ok(ComponentState::Error),
            other => Err(SurfaceParseError::UnknownState(other.to_string())),
        }
    }
}

/// Identifies one captured surface: a route at a viewport in a component state.
///
/// The route's URL path is carried for reporting only; equality and hashing
/// cover the (route, viewport, state) identity that keys baselines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub route: String,
    pub path: String,
    pub viewport: String,
    #[serde(default)]
    pub state: ComponentState,
}

impl Surface {
    pub fn new(
        route: impl Into<String>,
        path: impl Into<String>,
        viewport: impl Into<String>,
        state: ComponentState,
    ) -> Self {
        Self {
            route: route.into(),
            path: path.into(),
            viewport: viewport.into(),
            state,
        }
    }

    /// Stable identifier used for baseline and capture file names.
    ///
    /// `route--viewport` for the default state, `route--viewport--state`
    /// otherwise. Route and viewport names must not contain `--` (enforced by
    /// config validation) so the slug parses back unambiguously.
    pub fn slug(&self) -> String {
        match self.state {
            ComponentState::Default => format!("{}--{}", self.route, self.viewport),
            state => format!("{}--{}--{}", self.route, self.viewport, state),
        }
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.route == other.route
            && self.viewport == other.viewport
            && self.state == other.state
    }
}

impl Eq for Surface {}

impl Hash for Surface {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.route.hash(state);
        self.viewport.hash(state);
        self.state.hash(state);
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceParseError {
    #[error("Invalid surface slug '{0}': expected route--viewport or route--viewport--state")]
    InvalidFormat(String),
    #[error("Unknown component state: {0}")]
    UnknownState(String),
}

impl FromStr for Surface {
    type Err = SurfaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("--").collect();
        let (route, viewport, state) = match parts.as_slice() {
            [route, viewport] => (*route, *viewport, ComponentState::Default),
            [route, viewport, state] => (*route, *viewport, state.parse()?),
            _ => return Err(SurfaceParseError::InvalidFormat(s.to_string())),
        };
        if route.is_empty() || viewport.is_empty() {
            return Err(SurfaceParseError::InvalidFormat(s.to_string()));
        }
        Ok(Surface::new(route, String::new(), viewport, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slug_omits_default_state() {
        let surface = Surface::new("home", "/", "mobile", ComponentState::Default);
        assert_eq!(surface.slug(), "home--mobile");
    }

    #[test]
    fn slug_appends_non_default_state() {
        let surface = Surface::new("dashboard", "/dashboard", "desktop", ComponentState::Loading);
        assert_eq!(surface.slug(), "dashboard--desktop--loading");
    }

    #[test]
    fn parse_round_trips_slug() {
        let surface = Surface::new("login", "/login", "tablet", ComponentState::Error);
        let parsed: Surface = surface.slug().parse().unwrap();
        assert_eq!(parsed, surface);
        assert_eq!(parsed.state, ComponentState::Error);
    }

    #[test]
    fn parse_rejects_malformed_slugs() {
        assert!("home".parse::<Surface>().is_err());
        assert!("home--mobile--loading--extra".parse::<Surface>().is_err());
        assert!("--mobile".parse::<Surface>().is_err());
    }

    #[test]
    fn parse_rejects_unknown_state() {
        let err = "home--mobile--busy".parse::<Surface>().unwrap_err();
        assert_eq!(err, SurfaceParseError::UnknownState("busy".to_string()));
    }

    #[test]
    fn identity_ignores_path() {
        let a = Surface::new("home", "/", "mobile", ComponentState::Default);
        let b = Surface::new("home", "/index", "mobile", ComponentState::Default);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn state_labels_produce_distinct_identities() {
        let a = Surface::new("home", "/", "mobile", ComponentState::Default);
        let b = Surface::new("home", "/", "mobile", ComponentState::Loading);
        assert_ne!(a, b);
    }

    #[test]
    fn component_state_parses_case_insensitively() {
        assert_eq!(
            "Loading".parse::<ComponentState>().unwrap(),
            ComponentState::Loading
        );
        assert!("busy".parse::<ComponentState>().is_err());
    }
}
