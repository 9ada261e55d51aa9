//! Route configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default maximum cross-track distance at which a vehicle may still join a route
pub const DEFAULT_MAX_JOIN_DISTANCE: f64 = 20.0;

/// Tunables used by route queries
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RouteConfig {
    /// Largest cross-track distance from the route at which a vehicle can join it.
    /// Default: 20.0
    pub max_join_distance: f64,
    /// Distance uptrack of the current position searched when localizing a point.
    /// Default: 50.0
    pub subsection_behind: f64,
    /// Distance downtrack of the current position searched when localizing a point.
    /// Default: 100.0
    pub subsection_ahead: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            max_join_distance: DEFAULT_MAX_JOIN_DISTANCE,
            subsection_behind: 50.0,
            subsection_ahead: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouteConfig::default();
        assert!((config.max_join_distance - 20.0).abs() < f64::EPSILON);
        assert!(config.subsection_behind > 0.0);
        assert!(config.subsection_ahead > config.subsection_behind);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RouteConfig = serde_json::from_str(r#"{ "max_join_distance": 5.0 }"#).unwrap();
        assert!((config.max_join_distance - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.subsection_ahead, RouteConfig::default().subsection_ahead);
    }
}
