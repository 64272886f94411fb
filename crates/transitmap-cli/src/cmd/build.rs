//! `tmap build`: recompute service maps for a feed snapshot.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;
use transitmap_core::ServiceMapUpdate;

use super::{build_all, load_checked_config, load_feed, load_previous};
use crate::output::{OutputMode, render, section};

/// Arguments for `tmap build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Service-map config (TOML). Built-in groups are used if it is missing.
    #[arg(long)]
    pub config: PathBuf,

    /// Feed snapshot (JSON).
    #[arg(long)]
    pub feed: PathBuf,

    /// Stored hashes (JSON map of `<route>/<group>` to hash); maps whose
    /// paths are unchanged are skipped.
    #[arg(long)]
    pub previous: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BuildOutput {
    updates: Vec<ServiceMapUpdate>,
}

/// Execute `tmap build`.
pub fn run_build(args: &BuildArgs, output: OutputMode) -> anyhow::Result<()> {
    let config = load_checked_config(&args.config, output)?;
    let feed = load_feed(&args.feed)?;
    let previous = match &args.previous {
        Some(path) => load_previous(path)?,
        None => HashMap::new(),
    };

    let updates = build_all(&config, &feed, &previous, output)?;
    info!(routes = feed.routes.len(), updates = updates.len(), "build finished");

    render(output, &BuildOutput { updates }, render_build_text)
}

fn render_build_text(payload: &BuildOutput, w: &mut dyn Write) -> io::Result<()> {
    if payload.updates.is_empty() {
        return writeln!(w, "All service maps are up to date.");
    }
    for update in &payload.updates {
        section(w, &format!("{}  {}", update.key, update.hash))?;
        if update.map.is_empty() {
            writeln!(w, "  (empty)")?;
        }
        for stop in &update.map.stops {
            writeln!(w, "  {:>3}  {}", stop.position, stop.stop_id)?;
        }
    }
    Ok(())
}
