#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tmap: service maps from transit trip feeds",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Build service maps",
        long_about = "Stitch and order the trips of every route into one service map per group.",
        after_help = "EXAMPLES:\n    # Build every map\n    tmap build --config service_maps.toml --feed feed.json\n\n    # Only maps whose trip paths changed\n    tmap build --config service_maps.toml --feed feed.json --previous hashes.json"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        about = "List routes at a stop",
        long_about = "List, per group, the routes whose service maps include a stop or any of its platforms.",
        after_help = "EXAMPLES:\n    # Routes at a station\n    tmap routes-at-stop --config service_maps.toml --feed feed.json --stop 101"
    )]
    RoutesAtStop(cmd::routes::RoutesAtStopArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TRANSITMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "transitmap=debug,info"
        } else {
            "transitmap=info,warn"
        })
    });

    let format = env::var("TRANSITMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = OutputMode::from_json_flag(cli.json);
    debug!(?output, "starting");

    match cli.command {
        Commands::Build(ref args) => cmd::build::run_build(args, output),
        Commands::RoutesAtStop(ref args) => cmd::routes::run_routes_at_stop(args, output),
    }
}
