use clap::{Parser, Subcommand};
use lane_route::{DEFAULT_MAX_JOIN_DISTANCE, RouteConfig};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Lane Route - inspect exported routes and locate points on them
pub struct Settings {
    /// Largest cross-track distance at which a vehicle can still join the route
    #[clap(long, default_value_t = DEFAULT_MAX_JOIN_DISTANCE)]
    pub max_join_distance: f64,

    /// Log debug output (overridden by RUST_LOG)
    #[clap(short, long, default_value = "false")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print identity, length and extent of a route
    Summary {
        /// Route message in JSON
        #[clap(value_name = "FILE")]
        route: PathBuf,
    },

    /// List the segments around a position on the route
    Subsection {
        /// Route message in JSON
        #[clap(value_name = "FILE")]
        route: PathBuf,

        /// Segment the search starts from (0-based)
        #[clap(short, long)]
        segment: usize,

        /// Distance along the starting segment
        #[clap(short, long, default_value = "0.0")]
        down_track: f64,

        /// Distance to cover behind the position
        #[clap(short, long, default_value = "50.0")]
        behind: f64,

        /// Distance to cover ahead of the position
        #[clap(short, long, default_value = "100.0")]
        ahead: f64,
    },

    /// Find the segment a point belongs to and its distances along the route
    Locate {
        /// Route message in JSON
        #[clap(value_name = "FILE")]
        route: PathBuf,

        #[clap(long, allow_hyphen_values = true)]
        x: f64,

        #[clap(long, allow_hyphen_values = true)]
        y: f64,

        #[clap(long, default_value = "0.0", allow_hyphen_values = true)]
        z: f64,

        /// Segment the vehicle was last matched to
        #[clap(short, long, default_value = "0")]
        segment: usize,

        /// Distance along that segment
        #[clap(short, long, default_value = "0.0")]
        down_track: f64,
    },
}

impl Settings {
    /// Parse the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Route configuration derived from the global flags
    pub fn route_config(&self) -> RouteConfig {
        RouteConfig {
            max_join_distance: self.max_join_distance,
            ..RouteConfig::default()
        }
    }
}
