//! `tmap routes-at-stop`: list the routes serving a stop, per group.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use transitmap_core::{GroupRoutes, StopRoutesIndex};

use super::{build_all, load_checked_config, load_feed};
use crate::output::{OutputMode, render};

/// Arguments for `tmap routes-at-stop`.
#[derive(Args, Debug)]
pub struct RoutesAtStopArgs {
    /// Service-map config (TOML).
    #[arg(long)]
    pub config: PathBuf,

    /// Feed snapshot (JSON).
    #[arg(long)]
    pub feed: PathBuf,

    /// Stop or station id.
    #[arg(long)]
    pub stop: String,
}

#[derive(Debug, Serialize)]
struct RoutesOutput {
    stop: String,
    groups: Vec<GroupRoutes>,
}

/// Execute `tmap routes-at-stop`.
pub fn run_routes_at_stop(args: &RoutesAtStopArgs, output: OutputMode) -> anyhow::Result<()> {
    let config = load_checked_config(&args.config, output)?;
    let feed = load_feed(&args.feed)?;
    let updates = build_all(&config, &feed, &HashMap::new(), output)?;

    let index = StopRoutesIndex::from_service_maps(updates.iter().map(|u| &u.map), &config);
    let payload = RoutesOutput {
        stop: args.stop.clone(),
        groups: index.routes_at_stop(&args.stop, &feed.stop_tree()),
    };
    render(output, &payload, render_routes_text)
}

fn render_routes_text(payload: &RoutesOutput, w: &mut dyn Write) -> io::Result<()> {
    if payload.groups.is_empty() {
        return writeln!(w, "No groups are configured for routes at a stop.");
    }
    for group in &payload.groups {
        let routes = if group.route_ids.is_empty() {
            "-".to_string()
        } else {
            group.route_ids.join(", ")
        };
        writeln!(w, "{:<16} {routes}", group.group)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: RoutesAtStopArgs,
    }

    #[test]
    fn routes_args_parse() {
        let parsed = Wrapper::parse_from([
            "test", "--config", "c.toml", "--feed", "f.json", "--stop", "101",
        ]);
        assert_eq!(parsed.args.stop, "101");
    }

    #[test]
    fn text_pads_group_names() {
        let payload = RoutesOutput {
            stop: "101".into(),
            groups: vec![
                GroupRoutes {
                    group: "weekday_day".into(),
                    route_ids: vec!["1".into(), "2".into()],
                },
                GroupRoutes {
                    group: "weekend".into(),
                    route_ids: Vec::new(),
                },
            ],
        };
        let mut out = Vec::new();
        render_routes_text(&payload, &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "weekday_day      1, 2\nweekend          -\n"
        );
    }
}
