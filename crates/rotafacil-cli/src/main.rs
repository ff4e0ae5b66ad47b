use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rotafacil_cli::commands::waypoints::{self, WaypointSource};
use rotafacil_cli::commands::{extract, route, GlobalOptions};
use rotafacil_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan delivery rounds that start and end at a base")]
struct Cli {
    /// Override the state file location (defaults to ROTAFACIL_STATE_PATH or
    /// the platform data directory).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Override the OSRM server URL (defaults to ROTAFACIL_OSRM_URL).
    #[arg(long, global = true)]
    osrm_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the base and the registered waypoints.
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Register a waypoint from a map link or manual coordinates.
    Add(AddArgs),
    /// Remove a waypoint by id.
    Remove { id: u64 },
    /// Remove every waypoint.
    Clear,
    /// Show, move or rename the base.
    Base {
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Pull coordinates out of a pasted map link or "lat,lng" text.
    Extract {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Compute the round trip for the registered waypoints.
    Route {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Display name (defaults to "Cliente N").
    #[arg(long)]
    name: Option<String>,
    /// Map link or "lat,lng" text to extract coordinates from.
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["lat", "lng"], required_unless_present_all = ["lat", "lng"])]
    link: Option<String>,
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    lat: Option<String>,
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lng: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl AddArgs {
    fn source(&self) -> Option<WaypointSource> {
        match (&self.link, &self.lat, &self.lng) {
            (Some(link), _, _) => Some(WaypointSource::Link(link.clone())),
            (None, Some(lat), Some(lng)) => Some(WaypointSource::Manual {
                lat: lat.clone(),
                lng: lng.clone(),
            }),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let opts = GlobalOptions {
        state: cli.state,
        osrm_url: cli.osrm_url,
    };

    match cli.command {
        Command::List { format } => waypoints::handle_list(&opts, format),
        Command::Add(args) => {
            let source = args
                .source()
                .ok_or_else(|| anyhow::anyhow!("provide --link or both --lat and --lng"))?;
            waypoints::handle_add(&opts, args.name.as_deref(), source, args.format)
        }
        Command::Remove { id } => waypoints::handle_remove(&opts, id),
        Command::Clear => waypoints::handle_clear(&opts),
        Command::Base {
            lat,
            lng,
            name,
            format,
        } => waypoints::handle_base(
            &opts,
            lat.as_deref(),
            lng.as_deref(),
            name.as_deref(),
            format,
        ),
        Command::Extract { text, format } => extract::handle_extract(&text, format),
        Command::Route { format } => route::handle_route(&opts, format).await,
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
