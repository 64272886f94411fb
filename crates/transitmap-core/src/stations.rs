//! Stop hierarchy and station-level collapsing.
//!
//! Feeds model a station as a parent stop with one child per platform.
//! Before stitching, every platform is replaced by its top-most ancestor so
//! trips using different platforms of one station meet at the same node.

use std::collections::{HashMap, HashSet, VecDeque};

/// Parent/child relationships between stops.
pub trait StopHierarchy {
    /// The top-most ancestor of `stop`; a stop without a parent is its own
    /// station.
    fn station_of(&self, stop: &str) -> String;

    /// `stop` itself followed by every stop whose ancestor chain contains it.
    fn descendants(&self, stop: &str) -> Vec<String>;
}

/// In-memory [`StopHierarchy`] built from `child → parent` pairs.
#[derive(Debug, Clone, Default)]
pub struct StopTree {
    parents: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
}

impl StopTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(child, parent)` pairs. A later pair for the same child
    /// replaces the earlier one.
    #[must_use]
    pub fn from_pairs<I, C, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut tree = Self::new();
        for (child, parent) in pairs {
            tree.set_parent(child.into(), parent.into());
        }
        tree
    }

    pub fn set_parent(&mut self, child: String, parent: String) {
        let previous = self.parents.insert(child.clone(), parent.clone());
        if let Some(siblings) = previous.and_then(|previous| self.children.get_mut(&previous)) {
            siblings.retain(|sibling| *sibling != child);
        }
        self.children.entry(parent).or_default().push(child);
    }

    #[must_use]
    pub fn parent_of(&self, stop: &str) -> Option<&str> {
        self.parents.get(stop).map(String::as_str)
    }
}

impl StopHierarchy for StopTree {
    fn station_of(&self, stop: &str) -> String {
        let mut seen: HashSet<&str> = HashSet::from([stop]);
        let mut current = stop;
        while let Some(parent) = self.parent_of(current) {
            if !seen.insert(parent) {
                break;
            }
            current = parent;
        }
        current.to_string()
    }

    fn descendants(&self, stop: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([stop]);
        let mut queue: VecDeque<&str> = VecDeque::from([stop]);
        let mut found = Vec::new();
        while let Some(current) = queue.pop_front() {
            found.push(current.to_string());
            for child in self.children.get(current).into_iter().flatten().map(String::as_str) {
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        found
    }
}

/// Replace each stop by its station, dropping consecutive repeats.
///
/// `[p1, p2, x]` where `p1` and `p2` are platforms of `S` becomes `[S, x]`.
#[must_use]
pub fn collapse_to_stations<'s, I>(stops: I, hierarchy: &dyn StopHierarchy) -> Vec<String>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut collapsed: Vec<String> = Vec::new();
    for stop in stops {
        let station = hierarchy.station_of(stop);
        if collapsed.last() != Some(&station) {
            collapsed.push(station);
        }
    }
    collapsed
}
