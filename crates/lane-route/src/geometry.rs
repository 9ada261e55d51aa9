//! Line-segment geometry and planar helpers
//!
//! Distances follow the usual vehicle conventions: down-track is measured from the
//! segment start along the direction of travel, cross-track is the perpendicular
//! distance to the segment's supporting line, positive to the right of travel (z up).

use geo::{LineString, Point};
use nalgebra::{Point3, Vector3};

/// Segments shorter than this have no usable direction
pub const DEGENERATE_LENGTH: f64 = 1e-9;

/// A straight 3-D segment between two locations with its length precomputed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment3 {
    start: Point3<f64>,
    end: Point3<f64>,
    length: f64,
}

impl LineSegment3 {
    /// Create a segment from `start` to `end`
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self {
            start,
            end,
            length: nalgebra::distance(&start, &end),
        }
    }

    #[inline]
    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    /// Euclidean length, computed once on construction
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Unit vector from start to end, `None` for a degenerate segment
    pub fn direction(&self) -> Option<Vector3<f64>> {
        if self.length < DEGENERATE_LENGTH {
            None
        } else {
            Some((self.end - self.start) / self.length)
        }
    }

    /// Signed distance along the direction of travel from the segment start.
    ///
    /// Negative before the start, greater than [`length`](Self::length) past the end.
    pub fn down_track_distance(&self, point: &Point3<f64>) -> f64 {
        match self.direction() {
            Some(direction) => (*point - self.start).dot(&direction),
            None => 0.0,
        }
    }

    /// Signed perpendicular distance from the supporting line.
    ///
    /// Positive to the right of the direction of travel, negative to the left. A
    /// degenerate segment reports the plain distance to its start.
    pub fn cross_track_distance(&self, point: &Point3<f64>) -> f64 {
        let to_point = *point - self.start;
        let Some(direction) = self.direction() else {
            return to_point.norm();
        };

        let along = to_point.dot(&direction);
        let magnitude = (to_point - direction * along).norm();

        // Counter-clockwise from the direction of travel is the left side
        if direction.cross(&to_point).z > 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Orthogonal projection of `point` onto the segment's supporting line.
    ///
    /// The result is not clamped to the segment, so points before the start project
    /// onto the backward extension of the segment.
    pub fn project_onto_line(&self, point: &Point3<f64>) -> Point3<f64> {
        match self.direction() {
            Some(direction) => self.start + direction * (*point - self.start).dot(&direction),
            None => self.start,
        }
    }
}

/// Drop the z coordinate of a location
#[inline(always)]
pub fn planar(location: &Point3<f64>) -> Point<f64> {
    Point::new(location.x, location.y)
}

/// Build the planar polyline through a sequence of locations
pub fn planar_line_string<'a>(
    locations: impl IntoIterator<Item = &'a Point3<f64>>,
) -> LineString<f64> {
    locations.into_iter().map(planar).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn east_segment() -> LineSegment3 {
        LineSegment3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_length() {
        let segment = LineSegment3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 12.0));
        assert!((segment.length() - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_down_track_distance() {
        let segment = east_segment();
        assert!((segment.down_track_distance(&Point3::new(4.0, 2.0, 0.0)) - 4.0).abs() < 1e-12);
        assert!((segment.down_track_distance(&Point3::new(-3.0, 1.0, 0.0)) + 3.0).abs() < 1e-12);
        assert!((segment.down_track_distance(&Point3::new(15.0, 0.0, 0.0)) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_track_sign() {
        let segment = east_segment();
        // Travelling east, north is on the left
        let left = segment.cross_track_distance(&Point3::new(5.0, 2.0, 0.0));
        let right = segment.cross_track_distance(&Point3::new(5.0, -2.0, 0.0));
        assert!((left + 2.0).abs() < 1e-12);
        assert!((right - 2.0).abs() < 1e-12);
        assert!(segment.cross_track_distance(&Point3::new(5.0, 0.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cross_track_includes_elevation() {
        let segment = east_segment();
        let distance = segment.cross_track_distance(&Point3::new(5.0, -3.0, 4.0));
        assert!((distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_onto_line_is_unclamped() {
        let segment = east_segment();
        let projected = segment.project_onto_line(&Point3::new(-2.0, 3.0, 0.0));
        assert!((projected - Point3::new(-2.0, 0.0, 0.0)).norm() < 1e-12);

        let projected = segment.project_onto_line(&Point3::new(6.0, -1.0, 0.0));
        assert!((projected - Point3::new(6.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let location = Point3::new(1.0, 1.0, 0.0);
        let segment = LineSegment3::new(location, location);
        assert!(segment.direction().is_none());
        assert_eq!(segment.down_track_distance(&Point3::new(4.0, 5.0, 0.0)), 0.0);
        assert!((segment.cross_track_distance(&Point3::new(4.0, 5.0, 0.0)) - 5.0).abs() < 1e-12);
        assert_eq!(segment.project_onto_line(&Point3::new(4.0, 5.0, 0.0)), location);
    }

    #[test]
    fn test_planar_line_string() {
        let locations = [Point3::new(0.0, 1.0, 5.0), Point3::new(2.0, 3.0, 7.0)];
        let line = planar_line_string(&locations);
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[1], geo::Coord { x: 2.0, y: 3.0 });
        assert_eq!(planar(&locations[0]), Point::new(0.0, 1.0));
    }
}
