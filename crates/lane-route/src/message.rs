//! Transport representation of a route
//!
//! A route travels as its identity, validity and an ordered list of segment records. Each
//! record carries both of its waypoints and a 1-based ordinal, so the waypoint list can be
//! rebuilt on the receiving side.

use crate::{Result, Route, RouteError, Waypoint};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Waypoint data as carried in a segment record
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaypointMessage {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub lane_index: u32,
    pub min_cross_track: f64,
    pub max_cross_track: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub speed_limit: Option<f64>,
}

/// One segment of an exported route
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSegmentMessage {
    /// Uptrack waypoint
    pub prev_waypoint: WaypointMessage,
    /// Downtrack waypoint
    pub waypoint: WaypointMessage,
    /// Position of the segment in the route, starting at 1
    pub index: usize,
    pub length: f64,
}

/// An exported route
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteMessage {
    pub route_id: String,
    pub route_name: String,
    pub valid: bool,
    pub segments: Vec<RouteSegmentMessage>,
}

impl From<&Waypoint> for WaypointMessage {
    fn from(waypoint: &Waypoint) -> Self {
        let location = waypoint.location();
        Self {
            x: location.x,
            y: location.y,
            z: location.z,
            lane_index: waypoint.lane_index(),
            min_cross_track: waypoint.min_cross_track(),
            max_cross_track: waypoint.max_cross_track(),
            speed_limit: waypoint.speed_limit(),
        }
    }
}

impl From<&WaypointMessage> for Waypoint {
    fn from(message: &WaypointMessage) -> Self {
        let location = Point3::new(message.x, message.y, message.z);
        let waypoint = Waypoint::new(location, message.lane_index)
            .with_cross_track_bounds(message.min_cross_track, message.max_cross_track);
        match message.speed_limit {
            Some(limit) => waypoint.with_speed_limit(limit),
            None => waypoint,
        }
    }
}

impl Route {
    /// Export the route as a message
    pub fn to_message(&self) -> RouteMessage {
        let waypoints = self.waypoints();
        let segments = self
            .segments()
            .iter()
            .enumerate()
            .map(|(i, segment)| RouteSegmentMessage {
                prev_waypoint: WaypointMessage::from(&waypoints[segment.uptrack_index()]),
                waypoint: WaypointMessage::from(&waypoints[segment.downtrack_index()]),
                index: i + 1,
                length: segment.length(),
            })
            .collect();

        RouteMessage {
            route_id: self.route_id().to_string(),
            route_name: self.route_name().to_string(),
            valid: self.is_valid(),
            segments,
        }
    }

    /// Rebuild a route from a message
    ///
    /// The waypoint list is the first record's uptrack waypoint followed by every record's
    /// downtrack waypoint. A record whose uptrack waypoint differs from the previous record's
    /// downtrack waypoint follows a lane change, and its uptrack waypoint is kept as well.
    /// A message without segments yields an empty route.
    pub fn from_message(message: &RouteMessage) -> Result<Self> {
        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(message.segments.len() + 1);
        let mut last_waypoint: Option<&WaypointMessage> = None;

        for segment in &message.segments {
            if last_waypoint != Some(&segment.prev_waypoint) {
                waypoints.push(Waypoint::from(&segment.prev_waypoint));
            }
            waypoints.push(Waypoint::from(&segment.waypoint));
            last_waypoint = Some(&segment.waypoint);
        }

        let route_id = Some(message.route_id.clone()).filter(|id| !id.is_empty());
        let mut route = Route::new(waypoints, route_id, message.route_name.clone())?;
        route.set_valid(message.valid);
        Ok(route)
    }
}

impl From<Route> for RouteMessage {
    fn from(route: Route) -> Self {
        route.to_message()
    }
}

impl TryFrom<RouteMessage> for Route {
    type Error = RouteError;

    fn try_from(message: RouteMessage) -> Result<Self> {
        Route::from_message(&message)
    }
}
