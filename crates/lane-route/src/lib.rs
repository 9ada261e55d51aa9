//! Lane Route - Core Data Structures for Planned Vehicle Routes
//!
//! This library models the path a vehicle is planned to travel as an ordered list of
//! lane-positioned waypoints joined by straight segments, and provides the geometric
//! queries needed to follow a moving vehicle along it.
//!
//! # Architecture
//!
//! - **[`Waypoint`]**: A 3-D location with a lane index and lateral lane bounds
//! - **[`RouteSegment`]**: The span between two consecutive same-lane waypoints, referencing
//!   them by index
//! - **[`Route`]**: Owns waypoints and segments; insertion, subsections, point localization
//! - **[`RouteMessage`]**: Transport representation for exchanging routes
//!
//! Lane changes are not represented by a segment. The first waypoint after a lane change is
//! moved in line with the end of the previous lane instead, so segment geometry never
//! crosses lanes.

mod config;
pub mod geometry;
mod message;
mod route;
mod segment;
mod waypoint;

// Public API exports
pub use config::{DEFAULT_MAX_JOIN_DISTANCE, RouteConfig};
pub use message::{RouteMessage, RouteSegmentMessage, WaypointMessage};
pub use route::{Route, RouteLocation, derive_segments};
pub use segment::RouteSegment;
pub use waypoint::{DEFAULT_CROSS_TRACK_BOUND, Waypoint};

/// Re-exported so callers can build locations without depending on nalgebra directly
pub use nalgebra::{Point3, Vector3};

/// Error types for route operations
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Cannot insert a lane {lane_index} waypoint at index {index}")]
    InvalidInsertion { index: usize, lane_index: u32 },

    #[error("Waypoint {index} is the only waypoint of lane {lane_index}")]
    SingleWaypointLane { index: usize, lane_index: u32 },

    #[error("Route has no segments")]
    EmptyRoute,
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Option<String>, &'static str) -> Route = Route::empty;
        let _: fn() -> RouteConfig = RouteConfig::default;
        let _: fn(Point3<f64>, u32) -> Waypoint = Waypoint::new;
    }

    #[test]
    fn test_error_messages() {
        let error = RouteError::InvalidInsertion {
            index: 3,
            lane_index: 1,
        };
        assert_eq!(error.to_string(), "Cannot insert a lane 1 waypoint at index 3");
        assert_eq!(RouteError::EmptyRoute.to_string(), "Route has no segments");
    }
}
