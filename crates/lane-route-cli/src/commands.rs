//! Execution of the command-line subcommands
//!
//! Every command renders its report into a `String` so the output can be checked without
//! touching stdout.

use crate::cli::{Command, Settings};
use lane_route::{Point3, Route, RouteConfig, RouteError, RouteMessage};
use std::path::Path;

/// Errors surfaced by the command-line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid route message: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Segment {index} is out of range (route has {count} segments)")]
    SegmentOutOfRange { index: usize, count: usize },
}

/// Run the selected subcommand and return its report
pub fn run(settings: &Settings) -> Result<String, CliError> {
    let config = settings.route_config();
    match &settings.command {
        Command::Summary { route } => Ok(summary(&load_route(route, config)?)),
        Command::Subsection {
            route,
            segment,
            down_track,
            behind,
            ahead,
        } => subsection(&load_route(route, config)?, *segment, *down_track, *behind, *ahead),
        Command::Locate {
            route,
            x,
            y,
            z,
            segment,
            down_track,
        } => locate(
            &load_route(route, config)?,
            &Point3::new(*x, *y, *z),
            *segment,
            *down_track,
        ),
    }
}

/// Read a route message from a JSON file
pub fn load_route(path: &Path, config: RouteConfig) -> Result<Route, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_route(&json, config)
}

/// Build a route from a JSON route message
pub fn parse_route(json: &str, config: RouteConfig) -> Result<Route, CliError> {
    let message: RouteMessage = serde_json::from_str(json)?;
    let route = Route::from_message(&message)?.with_config(config);
    tracing::info!(
        "Loaded {} with {} segments, length {:.2}",
        route,
        route.segments().len(),
        route.length()
    );
    Ok(route)
}

pub fn summary(route: &Route) -> String {
    let mut lines = vec![
        format!("id:        {}", route.route_id()),
        format!("name:      {}", route.route_name()),
        format!("valid:     {}", route.is_valid()),
        format!("waypoints: {}", route.waypoints().len()),
        format!("segments:  {}", route.segments().len()),
        format!("length:    {:.2}", route.length()),
    ];
    if let Some(bbox) = route.bounding_box() {
        lines.push(format!(
            "extent:    ({:.2}, {:.2}) - ({:.2}, {:.2})",
            bbox.min().x,
            bbox.min().y,
            bbox.max().x,
            bbox.max().y
        ));
    }
    lines.join("\n")
}

pub fn subsection(
    route: &Route,
    segment: usize,
    down_track: f64,
    behind: f64,
    ahead: f64,
) -> Result<String, CliError> {
    if route.segments().is_empty() {
        return Err(RouteError::EmptyRoute.into());
    }

    let segments = route.find_route_subsection(segment, down_track, behind, ahead);
    if segments.is_empty() {
        return Err(CliError::SegmentOutOfRange {
            index: segment,
            count: route.segments().len(),
        });
    }

    let lines: Vec<String> = segments
        .iter()
        .filter_map(|&s| {
            let index = route.segment_position(s)?;
            let lane = s.uptrack_waypoint(route)?.lane_index();
            Some(format!(
                "{index:>5}  waypoints {}..{}  lane {lane}  length {:.2}",
                s.uptrack_index(),
                s.downtrack_index(),
                s.length()
            ))
        })
        .collect();
    Ok(lines.join("\n"))
}

pub fn locate(
    route: &Route,
    point: &Point3<f64>,
    segment: usize,
    down_track: f64,
) -> Result<String, CliError> {
    let location = route
        .locate(point, segment, down_track)
        .ok_or(RouteError::EmptyRoute)?;

    Ok([
        format!("segment:            {}", location.segment_index),
        format!("segment down-track: {:.2}", location.segment_down_track),
        format!("cross-track:        {:.2}", location.cross_track),
        format!("route down-track:   {:.2}", location.route_down_track),
        format!("joinable:           {}", route.can_join(&location)),
    ]
    .join("\n"))
}
