//! Service-map building: trips in, ordered stop lists out.
//!
//! # Pipeline
//!
//! For every route and every configured group whose source matches the
//! route's trips:
//!
//! 1. **Match** trips against the group's compiled condition tree.
//! 2. **Filter** by frequency, keeping one trip per common stop pattern.
//! 3. **Orient** inbound trips so the whole route faces one way.
//! 4. **Collapse** platforms into stations and dedupe into [`Path`]s.
//! 5. **Hash** the path set; skip the group if the stored hash matches.
//! 6. **Order**: stitch, cast to a path if possible, else sort.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use transitmap_graph::{Path, SortError, cast_to_path, stitch, topological_sort};

use crate::config::{GroupConfig, ServiceMapsConfig};
use crate::error::{ConfigError, ErrorCode};
use crate::matcher::{TripMatcher, filter_trips_by_frequency};
use crate::stations::{StopHierarchy, collapse_to_stations};
use crate::trip::{Trip, TripSource};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// All trips of one route from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTrips {
    pub route_id: String,
    pub source: TripSource,
    #[serde(default)]
    pub trips: Vec<Trip>,
}

/// Identifies one stored service map, rendered as `<route>/<group>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteGroupKey {
    pub route_id: String,
    pub group: String,
}

impl RouteGroupKey {
    #[must_use]
    pub fn new(route_id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            route_id: route_id.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for RouteGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.route_id, self.group)
    }
}

/// A string that is not `<route>/<group>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected <route>/<group>, got {0:?}")]
pub struct InvalidRouteGroupKey(pub String);

impl FromStr for RouteGroupKey {
    type Err = InvalidRouteGroupKey;

    /// Splits at the last `/`, so route ids may contain slashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('/') {
            Some((route, group)) if !route.is_empty() && !group.is_empty() => {
                Ok(Self::new(route, group))
            }
            _ => Err(InvalidRouteGroupKey(s.to_string())),
        }
    }
}

/// One stop of a service map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMapStop {
    pub stop_id: String,
    pub position: usize,
}

/// The ordered stop list of one route for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMap {
    pub route_id: String,
    pub group: String,
    pub stops: Vec<ServiceMapStop>,
}

impl ServiceMap {
    fn from_ordered(route_id: &str, group: &str, ordered: Vec<String>) -> Self {
        Self {
            route_id: route_id.to_string(),
            group: group.to_string(),
            stops: ordered
                .into_iter()
                .enumerate()
                .map(|(position, stop_id)| ServiceMapStop { stop_id, position })
                .collect(),
        }
    }

    pub fn stop_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.stops.iter().map(|stop| stop.stop_id.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// A recomputed service map that replaces the stored one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMapUpdate {
    pub key: RouteGroupKey,
    /// Order-insensitive hash of the paths the map was built from.
    pub hash: String,
    pub map: ServiceMap,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct CompiledGroup {
    config: GroupConfig,
    matcher: TripMatcher,
}

/// Builds service maps for the groups of one [`ServiceMapsConfig`].
///
/// Construction compiles every condition tree; building itself is pure and
/// keeps no state between calls.
pub struct ServiceMapBuilder<'h> {
    groups: Vec<CompiledGroup>,
    hierarchy: &'h dyn StopHierarchy,
}

impl<'h> ServiceMapBuilder<'h> {
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`ServiceMapsConfig::validate`].
    pub fn new(
        config: &ServiceMapsConfig,
        hierarchy: &'h dyn StopHierarchy,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let groups = config
            .groups
            .iter()
            .map(|group| {
                Ok(CompiledGroup {
                    config: group.clone(),
                    matcher: TripMatcher::compile(group.conditions.as_ref())?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { groups, hierarchy })
    }

    /// Deduplicated station-level paths a group would stitch for `trips`.
    ///
    /// `None` if no group has that name.
    #[must_use]
    pub fn paths_for_group(&self, group: &str, trips: &[Trip]) -> Option<Vec<Path<String>>> {
        self.groups
            .iter()
            .find(|compiled| compiled.config.name == group)
            .map(|compiled| self.collect_paths(compiled, trips))
    }

    /// Recompute every route/group whose path hash differs from `previous`.
    ///
    /// Updates come back in route order, then config group order. Groups
    /// whose source differs from the route's are not considered.
    #[must_use]
    #[instrument(skip_all, fields(routes = routes.len()))]
    pub fn rebuild(
        &self,
        routes: &[RouteTrips],
        previous: &HashMap<RouteGroupKey, String>,
    ) -> Vec<ServiceMapUpdate> {
        let mut updates = Vec::new();
        let mut unchanged = 0_usize;

        for route in routes {
            for group in self.groups.iter().filter(|g| g.config.source == route.source) {
                let key = RouteGroupKey::new(&route.route_id, &group.config.name);
                let paths = self.collect_paths(group, &route.trips);
                let hash = paths_hash(&paths);
                if previous.get(&key) == Some(&hash) {
                    debug!(%key, "paths unchanged, skipping");
                    unchanged += 1;
                    continue;
                }
                let map = build_map(&route.route_id, &group.config.name, &paths);
                updates.push(ServiceMapUpdate { key, hash, map });
            }
        }

        info!(updated = updates.len(), unchanged, "service maps rebuilt");
        updates
    }

    fn collect_paths(&self, group: &CompiledGroup, trips: &[Trip]) -> Vec<Path<String>> {
        let matched = group.matcher.matching(trips);
        let representatives = filter_trips_by_frequency(&matched, group.config.threshold);

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut paths = Vec::new();
        for trip in representatives {
            let labels = collapse_to_stations(trip.oriented_stops(), self.hierarchy);
            if labels.is_empty() || !seen.insert(labels.clone()) {
                continue;
            }
            match Path::new(labels) {
                Ok(path) => paths.push(path),
                Err(err) => {
                    warn!(trip_id = %trip.id, %err, "skipping trip that revisits a station");
                }
            }
        }

        debug!(
            group = %group.config.name,
            trips = trips.len(),
            matched = matched.len(),
            paths = paths.len(),
            "collected paths"
        );
        paths
    }
}

#[instrument(skip(paths), fields(paths = paths.len()))]
fn build_map(route_id: &str, group: &str, paths: &[Path<String>]) -> ServiceMap {
    let ordered = order_paths(paths).unwrap_or_else(|err| {
        warn!(code = %ErrorCode::from(err), %err, "stop graph has a cycle, storing an empty map");
        Vec::new()
    });
    ServiceMap::from_ordered(route_id, group, ordered)
}

/// Turn a set of paths into one stop order.
///
/// No paths give an empty order and a single path is returned as is.
/// Otherwise the paths are stitched; a stitched graph that is still a
/// straight line is read off directly, anything else is sorted.
///
/// # Errors
///
/// [`SortError::CannotSort`] if the stitched graph has a cycle.
pub fn order_paths(paths: &[Path<String>]) -> Result<Vec<String>, SortError> {
    match paths {
        [] => Ok(Vec::new()),
        [only] => Ok(only.vertices().cloned().collect()),
        _ => {
            let graph = stitch(paths);
            if let Some(line) = cast_to_path(&graph) {
                return Ok(line.vertices().cloned().collect());
            }
            Ok(topological_sort(&graph)?.ordered_labels().cloned().collect())
        }
    }
}

/// BLAKE3 hash of a path set, independent of path order and duplicates.
#[must_use]
pub fn paths_hash(paths: &[Path<String>]) -> String {
    let canonical: BTreeSet<Vec<&str>> = paths
        .iter()
        .map(|path| path.vertices().map(String::as_str).collect())
        .collect();

    let mut hasher = blake3::Hasher::new();
    for path in canonical {
        for label in path {
            hasher.update(label.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
    }
    format!("blake3:{}", hasher.finalize())
}
