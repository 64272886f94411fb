use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::ConfigError;
use crate::matcher::TripMatcher;
use crate::trip::TripSource;

/// The set of service-map groups computed for every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMapsConfig {
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// One named service map per route, e.g. "weekday" or "realtime".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub source: TripSource,
    /// Condition tree; see [`crate::matcher`]. Absent means every trip.
    #[serde(default)]
    pub conditions: Option<serde_json::Value>,
    /// Minimum share of matched trips a stop pattern needs to be kept.
    #[serde(default)]
    pub threshold: f64,
    #[serde(default = "default_true")]
    pub use_for_stops_in_route: bool,
    #[serde(default)]
    pub use_for_routes_at_stop: bool,
}

impl GroupConfig {
    /// A schedule group with no conditions and the default flags.
    #[must_use]
    pub fn new(name: impl Into<String>, source: TripSource) -> Self {
        Self {
            name: name.into(),
            source,
            conditions: None,
            threshold: 0.0,
            use_for_stops_in_route: default_true(),
            use_for_routes_at_stop: false,
        }
    }
}

impl Default for ServiceMapsConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupConfig {
                    threshold: 0.05,
                    ..GroupConfig::new("all_times", TripSource::Schedule)
                },
                GroupConfig {
                    conditions: Some(json!({
                        "weekday": true,
                        "starts_later_than": 7,
                        "starts_earlier_than": 19,
                    })),
                    threshold: 0.1,
                    use_for_routes_at_stop: true,
                    ..GroupConfig::new("weekday_day", TripSource::Schedule)
                },
                GroupConfig::new("realtime", TripSource::Realtime),
            ],
        }
    }
}

impl ServiceMapsConfig {
    /// Check thresholds, group names and condition trees.
    ///
    /// # Errors
    ///
    /// The first problem found, as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
            if !(0.0..=1.0).contains(&group.threshold) {
                return Err(ConfigError::InvalidThreshold {
                    group: group.name.clone(),
                    threshold: group.threshold,
                });
            }
            TripMatcher::compile(group.conditions.as_ref())?;
        }
        Ok(())
    }

    /// Groups whose maps are shown as a route's stop list.
    pub fn stops_in_route_groups(&self) -> impl Iterator<Item = &GroupConfig> + '_ {
        self.groups.iter().filter(|group| group.use_for_stops_in_route)
    }

    /// Groups whose maps feed the per-stop route list.
    pub fn routes_at_stop_groups(&self) -> impl Iterator<Item = &GroupConfig> + '_ {
        self.groups.iter().filter(|group| group.use_for_routes_at_stop)
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|group| group.name == name)
    }
}

/// Load and validate a service-map config file.
///
/// A missing file yields [`ServiceMapsConfig::default`].
///
/// # Errors
///
/// [`ConfigError::Io`] if the file exists but cannot be read,
/// [`ConfigError::Parse`] if it is not valid, and any error from
/// [`ServiceMapsConfig::validate`].
pub fn load_config(path: &Path) -> Result<ServiceMapsConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ServiceMapsConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServiceMapsConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!(path = %path.display(), groups = config.groups.len(), "loaded config");
    Ok(config)
}

const fn default_true() -> bool {
    true
}
