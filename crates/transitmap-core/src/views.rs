//! The stop → routes inverse view.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::builder::ServiceMap;
use crate::config::ServiceMapsConfig;
use crate::stations::StopHierarchy;

/// Routes serving a stop according to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRoutes {
    pub group: String,
    /// Sorted, deduplicated route ids.
    pub route_ids: Vec<String>,
}

/// Which routes each stop label appears in, per group.
///
/// Only groups flagged `use_for_routes_at_stop` are indexed.
#[derive(Debug, Clone, Default)]
pub struct StopRoutesIndex {
    groups: Vec<String>,
    routes: HashMap<(String, String), BTreeSet<String>>,
}

impl StopRoutesIndex {
    #[must_use]
    pub fn from_service_maps<'m, I>(maps: I, config: &ServiceMapsConfig) -> Self
    where
        I: IntoIterator<Item = &'m ServiceMap>,
    {
        let groups: Vec<String> = config
            .routes_at_stop_groups()
            .map(|group| group.name.clone())
            .collect();
        let mut routes: HashMap<(String, String), BTreeSet<String>> = HashMap::new();

        for map in maps {
            if !groups.contains(&map.group) {
                continue;
            }
            for stop in map.stop_ids() {
                routes
                    .entry((map.group.clone(), stop.to_string()))
                    .or_default()
                    .insert(map.route_id.clone());
            }
        }

        Self { groups, routes }
    }

    /// Per indexed group in config order, the routes serving `stop` or any
    /// stop below it in the hierarchy.
    #[must_use]
    pub fn routes_at_stop(&self, stop: &str, hierarchy: &dyn StopHierarchy) -> Vec<GroupRoutes> {
        let descendants = hierarchy.descendants(stop);
        self.groups
            .iter()
            .map(|group| {
                let mut route_ids = BTreeSet::new();
                for stop in &descendants {
                    if let Some(found) = self.routes.get(&(group.clone(), stop.clone())) {
                        route_ids.extend(found.iter().cloned());
                    }
                }
                GroupRoutes {
                    group: group.clone(),
                    route_ids: route_ids.into_iter().collect(),
                }
            })
            .collect()
    }
}
