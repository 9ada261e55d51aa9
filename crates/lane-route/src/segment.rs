//! Route segments referencing waypoints by index

use crate::geometry::LineSegment3;
use crate::{Route, Waypoint};
use nalgebra::Point3;

/// The span between two consecutive same-lane waypoints of a route
///
/// Waypoints are referenced by their index in the owning route's waypoint list. The
/// segment's line geometry is cached from the waypoint locations at construction time;
/// the route rebuilds a segment whenever one of its waypoints moves.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSegment {
    /// Index of the waypoint the segment starts at
    uptrack_index: usize,
    /// Index of the waypoint the segment ends at
    downtrack_index: usize,
    /// Line between the two waypoint locations
    line: LineSegment3,
}

impl RouteSegment {
    /// Create the segment joining `waypoints[uptrack_index]` and `waypoints[downtrack_index]`
    ///
    /// Both indices must be in bounds.
    pub(crate) fn between(
        waypoints: &[Waypoint],
        uptrack_index: usize,
        downtrack_index: usize,
    ) -> Self {
        let uptrack = &waypoints[uptrack_index];
        let downtrack = &waypoints[downtrack_index];
        debug_assert_eq!(uptrack.lane_index(), downtrack.lane_index());

        Self {
            uptrack_index,
            downtrack_index,
            line: LineSegment3::new(uptrack.location(), downtrack.location()),
        }
    }

    #[inline]
    pub fn uptrack_index(&self) -> usize {
        self.uptrack_index
    }

    #[inline]
    pub fn downtrack_index(&self) -> usize {
        self.downtrack_index
    }

    /// Cached segment length
    #[inline]
    pub fn length(&self) -> f64 {
        self.line.length()
    }

    #[inline]
    pub fn line(&self) -> &LineSegment3 {
        &self.line
    }

    /// Get the waypoint this segment starts at
    pub fn uptrack_waypoint<'a>(&self, route: &'a Route) -> Option<&'a Waypoint> {
        route.waypoints().get(self.uptrack_index)
    }

    /// Get the waypoint this segment ends at
    pub fn downtrack_waypoint<'a>(&self, route: &'a Route) -> Option<&'a Waypoint> {
        route.waypoints().get(self.downtrack_index)
    }

    /// Signed lateral distance of `point` from the segment, positive to the right
    pub fn cross_track_distance(&self, point: &Point3<f64>) -> f64 {
        self.line.cross_track_distance(point)
    }

    /// Distance of `point` along the segment from its uptrack waypoint
    pub fn down_track_distance(&self, point: &Point3<f64>) -> f64 {
        self.line.down_track_distance(point)
    }

    /// Project `point` onto the segment's supporting line
    pub fn project_onto_segment(&self, point: &Point3<f64>) -> Point3<f64> {
        self.line.project_onto_line(point)
    }

    /// Account for a waypoint inserted at `index`: every referenced waypoint at or past
    /// that index moves one position later.
    pub(crate) fn shift_from(&mut self, index: usize) {
        if self.uptrack_index >= index {
            self.uptrack_index += 1;
        }
        if self.downtrack_index >= index {
            self.downtrack_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_route() -> Route {
        let waypoints = (0..4)
            .map(|i| Waypoint::new(Point3::new(i as f64 * 10.0, 0.0, 0.0), 0))
            .collect();
        Route::new(waypoints, None, "segment test").unwrap()
    }

    #[test]
    fn test_between() {
        let route = create_test_route();
        let segment = RouteSegment::between(route.waypoints(), 1, 2);

        assert_eq!(segment.uptrack_index(), 1);
        assert_eq!(segment.downtrack_index(), 2);
        assert!((segment.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_waypoint_lookup() {
        let route = create_test_route();
        let segment = &route.segments()[2];

        let uptrack = segment.uptrack_waypoint(&route).unwrap();
        let downtrack = segment.downtrack_waypoint(&route).unwrap();
        assert_eq!(uptrack.location(), Point3::new(20.0, 0.0, 0.0));
        assert_eq!(downtrack.location(), Point3::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn test_point_distances() {
        let route = create_test_route();
        let segment = &route.segments()[1];
        let point = Point3::new(14.0, -1.5, 0.0);

        assert!((segment.down_track_distance(&point) - 4.0).abs() < 1e-12);
        assert!((segment.cross_track_distance(&point) - 1.5).abs() < 1e-12);
        let projected = segment.project_onto_segment(&point);
        assert!((projected - Point3::new(14.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_shift_from() {
        let route = create_test_route();
        let mut segment = RouteSegment::between(route.waypoints(), 1, 2);

        segment.shift_from(3);
        assert_eq!((segment.uptrack_index(), segment.downtrack_index()), (1, 2));

        segment.shift_from(2);
        assert_eq!((segment.uptrack_index(), segment.downtrack_index()), (1, 3));

        segment.shift_from(0);
        assert_eq!((segment.uptrack_index(), segment.downtrack_index()), (2, 4));
    }
}
