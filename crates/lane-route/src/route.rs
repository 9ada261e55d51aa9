//! Route storage and geometry queries
//!
//! This module provides the `Route` struct, which owns an ordered list of lane-positioned
//! waypoints together with the segments derived from them, and answers the queries needed
//! to place a moving vehicle on the route.
//!
//! Consecutive waypoints in the same lane are joined by a segment. Consecutive waypoints in
//! different lanes are not: the first waypoint of the new lane is instead pulled back in line
//! with the end of the previous lane, so every segment stays inside a single lane.

use crate::geometry::{self, LineSegment3};
use crate::{Result, RouteConfig, RouteError, RouteSegment, Waypoint};
use geo::{BoundingRect, LineString, Rect};
use nalgebra::Point3;
use std::fmt;

/// An ordered travel path of waypoints and the segments between them
///
/// All mutation goes through [`set_waypoints`](Self::set_waypoints) and
/// [`insert_waypoint`](Self::insert_waypoint). Both validate before touching the route, so
/// a failed call leaves waypoints, segments and cached metadata exactly as they were.
///
/// With the `serde` feature a route serializes as its [`RouteMessage`](crate::RouteMessage),
/// and deserializing rebuilds it through [`Route::from_message`], so segments are always
/// rederived from the waypoints.
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "crate::RouteMessage", into = "crate::RouteMessage")
)]
pub struct Route {
    /// Identifier, unique among routes
    route_id: String,
    /// Display name
    route_name: String,
    /// Waypoints in travel order
    waypoints: Vec<Waypoint>,
    /// Segments in travel order, sorted by uptrack waypoint index
    segments: Vec<RouteSegment>,
    /// Cached sum of segment lengths
    cached_length: f64,
    /// Cached planar bounding box of the waypoints (None if empty)
    bounding_box: Option<Rect<f64>>,
    /// Query tunables
    config: RouteConfig,
    /// Set by the caller once the route has passed external validation
    valid: bool,
    /// Planned arrival at the last waypoint, in seconds since the epoch
    expected_time_of_arrival: Option<f64>,
}

/// Where a point lies relative to a route
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLocation {
    /// Index of the segment the point was matched to
    pub segment_index: usize,
    /// Distance along the matched segment from its uptrack waypoint
    pub segment_down_track: f64,
    /// Signed lateral distance from the matched segment, positive to the right
    pub cross_track: f64,
    /// Distance along the route from its first waypoint
    pub route_down_track: f64,
}

impl RouteLocation {
    /// Whether a vehicle at this location is close enough to the route to join it
    pub fn is_joinable(&self, max_join_distance: f64) -> bool {
        self.cross_track.abs() <= max_join_distance
    }
}

enum Insertion {
    /// Replace the segment at this position with two segments through the new waypoint
    Split(usize),
    Append,
    Prepend,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Route {
    /// Create a route from a list of waypoints
    ///
    /// # Arguments
    /// * `waypoints` - Waypoints in travel order; may be empty
    /// * `route_id` - Unique identifier, defaults to `route_name` when `None`
    /// * `route_name` - Display name
    ///
    /// # Returns
    /// The route, or [`RouteError::SingleWaypointLane`] if some lane of the list holds a
    /// single waypoint
    pub fn new(
        waypoints: Vec<Waypoint>,
        route_id: Option<String>,
        route_name: impl Into<String>,
    ) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("route::new");

        let mut route = Self::empty(route_id, route_name);
        route.set_waypoints(waypoints)?;
        Ok(route)
    }

    /// Create a route without waypoints, to be populated later
    pub fn empty(route_id: Option<String>, route_name: impl Into<String>) -> Self {
        let route_name = route_name.into();
        let route_id = route_id.unwrap_or_else(|| route_name.clone());

        Self {
            route_id,
            route_name,
            ..Self::default()
        }
    }

    /// Replace the route configuration
    #[must_use]
    pub fn with_config(mut self, config: RouteConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace every waypoint and rebuild all segments
    ///
    /// Waypoints should lie near the middle of their lane. Where the lane index changes
    /// between two waypoints no segment is built; the first waypoint of the new lane is
    /// moved onto the line of its own segment, level with the last waypoint of the old lane.
    ///
    /// Every lane run must hold at least two waypoints, which also means the first two
    /// waypoints share a lane and two lane changes never follow each other directly.
    pub fn set_waypoints(&mut self, mut waypoints: Vec<Waypoint>) -> Result<()> {
        let (segments, length) = derive_segments(&mut waypoints)?;

        self.waypoints = waypoints;
        self.segments = segments;
        self.cached_length = length;
        self.bounding_box = self.footprint().bounding_rect();

        tracing::debug!(
            "Route '{}': {} waypoints, {} segments, length {:.2}",
            self.route_id,
            self.waypoints.len(),
            self.segments.len(),
            self.cached_length
        );
        Ok(())
    }

    /// Insert a waypoint so it becomes element `index` of the waypoint list
    ///
    /// The waypoint previously at `index` and all following ones move one position later,
    /// and exactly one segment is added. Use `index == waypoints().len()` to append and `0`
    /// to prepend.
    ///
    /// The new waypoint must be in the same lane as the waypoints it connects to. Inserting
    /// into an empty route or across a lane change is not supported. Any violation returns
    /// [`RouteError::InvalidInsertion`] and leaves the route unchanged.
    pub fn insert_waypoint(&mut self, waypoint: Waypoint, index: usize) -> Result<()> {
        let lane_index = waypoint.lane_index();
        let Some(insertion) = self.plan_insertion(lane_index, index) else {
            tracing::warn!(
                "Route '{}': rejected waypoint in lane {} at index {}",
                self.route_id,
                lane_index,
                index
            );
            return Err(RouteError::InvalidInsertion { index, lane_index });
        };

        self.waypoints.insert(index, waypoint);
        for segment in &mut self.segments {
            segment.shift_from(index);
        }

        match insertion {
            Insertion::Split(position) => {
                self.segments[position] = RouteSegment::between(&self.waypoints, index - 1, index);
                self.segments.insert(
                    position + 1,
                    RouteSegment::between(&self.waypoints, index, index + 1),
                );
            }
            Insertion::Append => {
                self.segments
                    .push(RouteSegment::between(&self.waypoints, index - 1, index));
            }
            Insertion::Prepend => {
                self.segments
                    .insert(0, RouteSegment::between(&self.waypoints, 0, 1));
            }
        }

        self.recompute_metadata();
        tracing::trace!(
            "Route '{}': inserted waypoint at index {}, length now {:.2}",
            self.route_id,
            index,
            self.cached_length
        );
        Ok(())
    }

    /// Decide how a waypoint in `lane_index` can be inserted at `index`, if at all
    fn plan_insertion(&self, lane_index: u32, index: usize) -> Option<Insertion> {
        let len = self.waypoints.len();
        let lane_at = |i: usize| self.waypoints.get(i).map(Waypoint::lane_index);

        if index > 0
            && index < len
            && lane_at(index - 1) == Some(lane_index)
            && lane_at(index) == Some(lane_index)
        {
            // Same-lane neighbours are always joined by a segment
            self.segments
                .iter()
                .position(|s| s.uptrack_index() == index - 1 && s.downtrack_index() == index)
                .map(Insertion::Split)
        } else if index == len && index > 0 && lane_at(index - 1) == Some(lane_index) {
            Some(Insertion::Append)
        } else if index == 0 && lane_at(0) == Some(lane_index) {
            Some(Insertion::Prepend)
        } else {
            None
        }
    }

    /// Recompute the cached length and bounding box after a mutation
    fn recompute_metadata(&mut self) {
        self.cached_length = self.segments.iter().map(RouteSegment::length).sum();
        self.bounding_box = self.footprint().bounding_rect();
    }

    /// Collect the segments around a position, in travel order
    ///
    /// # Arguments
    /// * `starting_index` - Segment the search starts from; always part of the result
    /// * `segment_down_track` - Distance along the starting segment to measure from
    /// * `dist_backward` - Distance uptrack of the position to cover
    /// * `dist_forward` - Distance downtrack of the position to cover
    ///
    /// Segments are added until the covered distance exceeds the requested one, so the last
    /// segment added on each side may reach past it. Returns an empty list if
    /// `starting_index` is not a segment of this route.
    pub fn find_route_subsection(
        &self,
        starting_index: usize,
        segment_down_track: f64,
        dist_backward: f64,
        dist_forward: f64,
    ) -> Vec<&RouteSegment> {
        let Some(starting_segment) = self.segments.get(starting_index) else {
            return Vec::new();
        };

        let mut subsection = Vec::new();
        let mut distance = segment_down_track;
        for segment in self.segments[..starting_index].iter().rev() {
            if distance > dist_backward {
                break;
            }
            distance += segment.length();
            subsection.push(segment);
        }
        subsection.reverse();
        subsection.push(starting_segment);

        let mut distance = starting_segment.length() - segment_down_track;
        for segment in &self.segments[starting_index + 1..] {
            if distance > dist_forward {
                break;
            }
            distance += segment.length();
            subsection.push(segment);
        }

        subsection
    }

    /// Find the segment among `segments` that `point` should be considered in
    ///
    /// A point is in a segment when it lies between the segment's waypoints and within the
    /// lateral bounds of its downtrack waypoint. Taken literally this leaves a wedge on the
    /// outside of every turn that belongs to neither adjacent segment, so each segment's
    /// uptrack edge is extended backward by the lateral bound of the segment before it. The
    /// overlap this creates is resolved in favour of the uptrack segment, since the first
    /// full match wins.
    ///
    /// Returns `None` only when `segments` is empty.
    pub fn route_segment_of_point<'s>(
        &self,
        point: &Point3<f64>,
        segments: &[&'s RouteSegment],
    ) -> Option<&'s RouteSegment> {
        let mut best_segment = *segments.first()?;
        let mut prev_max_cross_track = 0.0;

        for &segment in segments {
            let max_cross_track = self
                .waypoints
                .get(segment.downtrack_index())
                .map_or(0.0, Waypoint::max_cross_track_allowed);

            let cross_track = segment.cross_track_distance(point);
            let down_track = segment.down_track_distance(point);

            if -prev_max_cross_track < down_track && down_track <= segment.length() {
                if cross_track.abs() <= max_cross_track {
                    return Some(segment);
                }
                best_segment = segment;
            }

            prev_max_cross_track = max_cross_track;
        }

        // No segment holds the point within its lateral bounds. Keep the last segment whose
        // extended span contained it, or the first candidate when the point is outside all of
        // them (typically before the start of the route).
        Some(best_segment)
    }

    /// Locate a point on the route, searching around a known segment
    ///
    /// The search covers the configured distances behind and ahead of `segment_down_track`
    /// on segment `segment_hint` (clamped to the last segment). Returns `None` if the route
    /// has no segments.
    pub fn locate(
        &self,
        point: &Point3<f64>,
        segment_hint: usize,
        segment_down_track: f64,
    ) -> Option<RouteLocation> {
        let last_index = self.segments.len().checked_sub(1)?;
        let subsection = self.find_route_subsection(
            segment_hint.min(last_index),
            segment_down_track,
            self.config.subsection_behind,
            self.config.subsection_ahead,
        );

        let segment = self.route_segment_of_point(point, &subsection)?;
        let segment_index = self.segment_position(segment)?;
        let down_track = segment.down_track_distance(point);

        Some(RouteLocation {
            segment_index,
            segment_down_track: down_track,
            cross_track: segment.cross_track_distance(point),
            route_down_track: self.distance_to_segment(segment_index) + down_track,
        })
    }

    /// Whether a vehicle at `location` is within the route's join distance
    pub fn can_join(&self, location: &RouteLocation) -> bool {
        location.is_joinable(self.config.max_join_distance)
    }

    /// Sum of the lengths of segments `start_index..=final_index`
    ///
    /// `final_index` is clamped to the last segment; an empty range yields 0.
    pub fn length_of_segments(&self, start_index: usize, final_index: usize) -> f64 {
        let Some(last_index) = self.segments.len().checked_sub(1) else {
            return 0.0;
        };
        self.segments
            .get(start_index..=final_index.min(last_index))
            .map_or(0.0, |segments| segments.iter().map(RouteSegment::length).sum())
    }

    /// Route distance from the first waypoint to the start of segment `index`
    fn distance_to_segment(&self, index: usize) -> f64 {
        self.segments
            .get(..index)
            .map_or(self.cached_length, |segments| {
                segments.iter().map(RouteSegment::length).sum()
            })
    }

    /// Position of `segment` in this route's segment list
    pub fn segment_position(&self, segment: &RouteSegment) -> Option<usize> {
        self.segments
            .binary_search_by_key(&segment.uptrack_index(), RouteSegment::uptrack_index)
            .ok()
            .filter(|&position| self.segments[position] == *segment)
    }

    /// Planar (x/y) polyline through all waypoints
    pub fn footprint(&self) -> LineString<f64> {
        let locations: Vec<Point3<f64>> = self.waypoints.iter().map(Waypoint::location).collect();
        geometry::planar_line_string(&locations)
    }

    /// Planar bounding box of all waypoints, `None` for an empty route
    #[inline]
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        self.bounding_box
    }

    /// Total length of all segments
    ///
    /// This is O(1) as the value is cached on every mutation.
    #[inline]
    pub fn length(&self) -> f64 {
        self.cached_length
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[inline]
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, index: usize) -> Option<&RouteSegment> {
        self.segments.get(index)
    }

    #[inline]
    pub fn first_segment(&self) -> Option<&RouteSegment> {
        self.segments.first()
    }

    #[inline]
    pub fn last_segment(&self) -> Option<&RouteSegment> {
        self.segments.last()
    }

    #[inline]
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn set_route_id(&mut self, route_id: impl Into<String>) {
        self.route_id = route_id.into();
    }

    #[inline]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// Rename the route. A route without an identifier takes the new name as its identifier.
    pub fn set_route_name(&mut self, route_name: impl Into<String>) {
        self.route_name = route_name.into();
        if self.route_id.is_empty() {
            self.route_id = self.route_name.clone();
        }
    }

    /// Whether the route passed external validation
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Planned arrival at the end of the route, in seconds since the epoch
    #[inline]
    pub fn expected_time_of_arrival(&self) -> Option<f64> {
        self.expected_time_of_arrival
    }

    pub fn set_expected_time_of_arrival(&mut self, eta: Option<f64>) {
        self.expected_time_of_arrival = eta;
    }

    #[inline]
    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Largest cross-track distance at which a vehicle can still join the route
    #[inline]
    pub fn max_join_distance(&self) -> f64 {
        self.config.max_join_distance
    }

    pub fn set_max_join_distance(&mut self, max_join_distance: f64) {
        self.config.max_join_distance = max_join_distance;
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route {{ name: {} id: {} }}", self.route_name, self.route_id)
    }
}

/// Build the segments of a waypoint list and their total length
///
/// Consecutive same-lane waypoints are joined by a segment. At a lane change no segment is
/// built; instead, once the next same-lane pair is reached, the first waypoint of the new
/// lane is relocated to the projection of the last waypoint of the previous lane onto that
/// pair's line, and the segment is built from the relocated location.
///
/// Returns [`RouteError::SingleWaypointLane`] without modifying `waypoints` if any lane run
/// of a list with two or more waypoints holds a single waypoint.
pub fn derive_segments(waypoints: &mut [Waypoint]) -> Result<(Vec<RouteSegment>, f64)> {
    check_lane_runs(waypoints)?;

    let mut segments = Vec::with_capacity(waypoints.len().saturating_sub(1));
    let mut lane_change_pending = false;

    for i in 1..waypoints.len() {
        if waypoints[i - 1].lane_index() != waypoints[i].lane_index() {
            lane_change_pending = true;
            continue;
        }

        if lane_change_pending {
            // Lane runs hold at least two waypoints, so i - 2 ends the previous lane
            let entry = LineSegment3::new(waypoints[i - 1].location(), waypoints[i].location());
            let relocated = entry.project_onto_line(&waypoints[i - 2].location());
            tracing::debug!(
                "Relocating lane {} entry waypoint {} from {:?} to {:?}",
                waypoints[i - 1].lane_index(),
                i - 1,
                waypoints[i - 1].location(),
                relocated
            );
            waypoints[i - 1].set_location(relocated);
            lane_change_pending = false;
        }

        segments.push(RouteSegment::between(waypoints, i - 1, i));
    }

    let length = segments.iter().map(RouteSegment::length).sum();
    Ok((segments, length))
}

/// Reject waypoint lists where a lane is represented by a single waypoint
fn check_lane_runs(waypoints: &[Waypoint]) -> Result<()> {
    if waypoints.len() < 2 {
        return Ok(());
    }

    let mut run_start = 0;
    for i in 1..=waypoints.len() {
        let run_ended = i == waypoints.len()
            || waypoints[i].lane_index() != waypoints[run_start].lane_index();
        if !run_ended {
            continue;
        }
        if i - run_start < 2 {
            let lane_index = waypoints[run_start].lane_index();
            tracing::warn!(
                "Waypoint {} is the only waypoint of lane {}",
                run_start,
                lane_index
            );
            return Err(RouteError::SingleWaypointLane {
                index: run_start,
                lane_index,
            });
        }
        run_start = i;
    }

    Ok(())
}
