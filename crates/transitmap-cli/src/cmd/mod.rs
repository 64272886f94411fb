pub mod build;
pub mod routes;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use transitmap_core::{
    ConfigError, RouteGroupKey, RouteTrips, ServiceMapBuilder, ServiceMapUpdate, ServiceMapsConfig,
    StopTree, load_config,
};

use crate::output::{CliError, OutputMode, render_error};

/// A snapshot of one transit system's feed, as read from JSON.
#[derive(Debug, Deserialize)]
pub struct FeedSnapshot {
    /// `child → parent` stop pairs.
    #[serde(default)]
    pub stop_parents: BTreeMap<String, String>,
    #[serde(default)]
    pub routes: Vec<RouteTrips>,
}

impl FeedSnapshot {
    #[must_use]
    pub fn stop_tree(&self) -> StopTree {
        StopTree::from_pairs(
            self.stop_parents
                .iter()
                .map(|(child, parent)| (child.as_str(), parent.as_str())),
        )
    }
}

pub fn load_feed(path: &Path) -> anyhow::Result<FeedSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Stored hashes keyed by `<route>/<group>`.
pub fn load_previous(path: &Path) -> anyhow::Result<HashMap<RouteGroupKey, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: BTreeMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    raw.into_iter()
        .map(|(key, hash)| Ok((key.parse::<RouteGroupKey>()?, hash)))
        .collect()
}

/// Load the config, reporting configuration errors with their code.
pub fn load_checked_config(path: &Path, output: OutputMode) -> anyhow::Result<ServiceMapsConfig> {
    load_config(path).or_else(|err| report_config_error(&err, output))
}

fn report_config_error<T>(err: &ConfigError, output: OutputMode) -> anyhow::Result<T> {
    let code = err.code();
    render_error(
        output,
        &CliError::with_code(err.to_string(), code.code(), code.hint()),
    )?;
    anyhow::bail!("{}: {}", code, code.message())
}

/// Build every service map of the feed, skipping those whose hash matches
/// `previous`.
pub fn build_all(
    config: &ServiceMapsConfig,
    feed: &FeedSnapshot,
    previous: &HashMap<RouteGroupKey, String>,
    output: OutputMode,
) -> anyhow::Result<Vec<ServiceMapUpdate>> {
    let stops = feed.stop_tree();
    let builder = match ServiceMapBuilder::new(config, &stops) {
        Ok(builder) => builder,
        Err(err) => return report_config_error(&err, output),
    };
    Ok(builder.rebuild(&feed.routes, previous))
}
