//! Trip conditions and frequency filtering.
//!
//! A condition tree arrives as loosely typed config:
//!
//! ```toml
//! [groups.conditions]
//! weekday = true
//! one_of = [{ starts_later_than = 7 }, { route_id = "X" }]
//! ```
//!
//! It is compiled once into a [`Condition`] and then evaluated per trip.
//! A table with several keys is a conjunction of those keys.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConfigError;
use crate::trip::{Trip, WEEKDAYS, WEEKEND};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A compiled trip predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    AllOf(Vec<Condition>),
    OneOf(Vec<Condition>),
    NoneOf(Vec<Condition>),
    /// Runs on some weekday (`true`) or on none (`false`).
    Weekday(bool),
    /// Runs on some weekend day (`true`) or on none (`false`).
    Weekend(bool),
    /// Start time known and before this many seconds.
    StartsEarlierThan(f64),
    StartsLaterThan(f64),
    EndsEarlierThan(f64),
    EndsLaterThan(f64),
    RouteId(String),
}

impl Condition {
    /// Compile a condition table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownCondition`] for an unrecognized key and
    /// [`ConfigError::InvalidConditionValue`] for a value of the wrong type.
    pub fn compile(tree: &Value) -> Result<Self, ConfigError> {
        match tree {
            Value::Object(table) => compile_table(table),
            other => Err(ConfigError::invalid_value("conditions", "a table", other)),
        }
    }

    /// Evaluate against one trip.
    #[must_use]
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            Self::AllOf(children) => children.iter().all(|c| c.matches(trip)),
            Self::OneOf(children) => children.iter().any(|c| c.matches(trip)),
            Self::NoneOf(children) => !children.iter().any(|c| c.matches(trip)),
            Self::Weekday(wanted) => trip.days.runs_on_any(&WEEKDAYS) == *wanted,
            Self::Weekend(wanted) => trip.days.runs_on_any(&WEEKEND) == *wanted,
            Self::StartsEarlierThan(limit) => {
                trip.start_time.is_some_and(|t| f64::from(t) < *limit)
            }
            Self::StartsLaterThan(limit) => trip.start_time.is_some_and(|t| f64::from(t) > *limit),
            Self::EndsEarlierThan(limit) => trip.end_time.is_some_and(|t| f64::from(t) < *limit),
            Self::EndsLaterThan(limit) => trip.end_time.is_some_and(|t| f64::from(t) > *limit),
            Self::RouteId(route_id) => trip.route_id == *route_id,
        }
    }
}

fn compile_table(table: &Map<String, Value>) -> Result<Condition, ConfigError> {
    let mut leaves = table
        .iter()
        .map(|(key, value)| compile_key(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(if leaves.len() == 1 {
        leaves.remove(0)
    } else {
        Condition::AllOf(leaves)
    })
}

fn compile_key(key: &str, value: &Value) -> Result<Condition, ConfigError> {
    match key {
        "all_of" => compile_children(key, value).map(Condition::AllOf),
        "one_of" => compile_children(key, value).map(Condition::OneOf),
        "none_of" => compile_children(key, value).map(Condition::NoneOf),
        "weekday" => expect_bool(key, value).map(Condition::Weekday),
        "weekend" => expect_bool(key, value).map(Condition::Weekend),
        "starts_earlier_than" => expect_hours(key, value).map(Condition::StartsEarlierThan),
        "starts_later_than" => expect_hours(key, value).map(Condition::StartsLaterThan),
        "ends_earlier_than" => expect_hours(key, value).map(Condition::EndsEarlierThan),
        "ends_later_than" => expect_hours(key, value).map(Condition::EndsLaterThan),
        "route_id" => value
            .as_str()
            .map(|route| Condition::RouteId(route.to_string()))
            .ok_or_else(|| ConfigError::invalid_value(key, "a string", value)),
        unknown => Err(ConfigError::UnknownCondition {
            key: unknown.to_string(),
        }),
    }
}

/// Children of a compound condition: each key of a table, or each table of
/// a list.
fn compile_children(key: &str, value: &Value) -> Result<Vec<Condition>, ConfigError> {
    match value {
        Value::Object(table) => table
            .iter()
            .map(|(child, value)| compile_key(child, value))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(table) => compile_table(table),
                other => Err(ConfigError::invalid_value(key, "a list of tables", other)),
            })
            .collect(),
        other => Err(ConfigError::invalid_value(key, "a table or a list of tables", other)),
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or_else(|| ConfigError::invalid_value(key, "a boolean", value))
}

fn expect_hours(key: &str, value: &Value) -> Result<f64, ConfigError> {
    value
        .as_f64()
        .filter(|hours| hours.is_finite() && *hours >= 0.0)
        .map(|hours| hours * SECONDS_PER_HOUR)
        .ok_or_else(|| ConfigError::invalid_value(key, "a non-negative number of hours", value))
}

/// A compiled condition tree; an absent tree matches every trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripMatcher {
    condition: Option<Condition>,
}

impl TripMatcher {
    /// Compile an optional condition tree.
    ///
    /// # Errors
    ///
    /// See [`Condition::compile`].
    pub fn compile(tree: Option<&Value>) -> Result<Self, ConfigError> {
        Ok(Self {
            condition: tree.map(Condition::compile).transpose()?,
        })
    }

    #[must_use]
    pub fn matches(&self, trip: &Trip) -> bool {
        self.condition.as_ref().is_none_or(|c| c.matches(trip))
    }

    /// The trips this matcher accepts, in input order.
    #[must_use]
    pub fn matching<'t>(&self, trips: &'t [Trip]) -> Vec<&'t Trip> {
        trips.iter().filter(|trip| self.matches(trip)).collect()
    }
}

/// Keep one representative trip per common stop pattern.
///
/// Trips are grouped by their exact stop sequence. A group survives when
/// its size is at least `threshold × trips.len()`. Survivors come back in
/// order of first appearance, one trip per group.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn filter_trips_by_frequency<'t>(trips: &[&'t Trip], threshold: f64) -> Vec<&'t Trip> {
    let mut slots: HashMap<&[String], usize> = HashMap::new();
    let mut groups: Vec<(&'t Trip, usize)> = Vec::new();
    for &trip in trips {
        let slot = *slots.entry(trip.stop_ids.as_slice()).or_insert_with(|| {
            groups.push((trip, 0));
            groups.len() - 1
        });
        groups[slot].1 += 1;
    }

    let minimum = threshold * trips.len() as f64;
    let kept: Vec<&'t Trip> = groups
        .iter()
        .filter(|(_, count)| *count as f64 >= minimum)
        .map(|(trip, _)| *trip)
        .collect();

    debug!(
        trips = trips.len(),
        patterns = groups.len(),
        kept = kept.len(),
        threshold,
        "filtered trips by frequency"
    );
    kept
}
