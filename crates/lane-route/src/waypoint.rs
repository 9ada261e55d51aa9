//! Lane-positioned route waypoints

use nalgebra::Point3;

/// Lateral bound applied on both sides of a waypoint unless overridden (half a typical lane)
pub const DEFAULT_CROSS_TRACK_BOUND: f64 = 1.8;

/// A point of the route together with the lane it belongs to and that lane's lateral bounds
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Location of the lane centre at this waypoint
    location: Point3<f64>,
    /// Lane the waypoint belongs to
    lane_index: u32,
    /// Signed lateral offset of the lane's first bound
    min_cross_track: f64,
    /// Signed lateral offset of the lane's second bound
    max_cross_track: f64,
    /// Speed limit in length units per second, if known
    speed_limit: Option<f64>,
}

impl Waypoint {
    /// Create a waypoint with the default cross-track bounds
    pub fn new(location: Point3<f64>, lane_index: u32) -> Self {
        Self {
            location,
            lane_index,
            min_cross_track: -DEFAULT_CROSS_TRACK_BOUND,
            max_cross_track: DEFAULT_CROSS_TRACK_BOUND,
            speed_limit: None,
        }
    }

    /// Replace the lateral bounds. Either bound may carry either sign.
    #[must_use]
    pub fn with_cross_track_bounds(mut self, min_cross_track: f64, max_cross_track: f64) -> Self {
        self.min_cross_track = min_cross_track;
        self.max_cross_track = max_cross_track;
        self
    }

    #[must_use]
    pub fn with_speed_limit(mut self, speed_limit: f64) -> Self {
        self.speed_limit = Some(speed_limit);
        self
    }

    #[inline]
    pub fn location(&self) -> Point3<f64> {
        self.location
    }

    #[inline]
    pub fn lane_index(&self) -> u32 {
        self.lane_index
    }

    #[inline]
    pub fn min_cross_track(&self) -> f64 {
        self.min_cross_track
    }

    #[inline]
    pub fn max_cross_track(&self) -> f64 {
        self.max_cross_track
    }

    #[inline]
    pub fn speed_limit(&self) -> Option<f64> {
        self.speed_limit
    }

    /// Largest lateral distance from the centre line still inside the lane bounds
    pub fn max_cross_track_allowed(&self) -> f64 {
        self.min_cross_track.abs().max(self.max_cross_track.abs())
    }

    /// Straight-line distance to another waypoint
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        nalgebra::distance(&self.location, &other.location)
    }

    /// Move the waypoint. Only the owning route relocates waypoints, and it rebuilds the
    /// affected segments afterwards.
    pub(crate) fn set_location(&mut self, location: Point3<f64>) {
        self.location = location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let waypoint = Waypoint::new(Point3::new(1.0, 2.0, 3.0), 2);
        assert_eq!(waypoint.lane_index(), 2);
        assert_eq!(waypoint.location(), Point3::new(1.0, 2.0, 3.0));
        let allowed = waypoint.max_cross_track_allowed();
        assert!((allowed - DEFAULT_CROSS_TRACK_BOUND).abs() < f64::EPSILON);
        assert!(waypoint.speed_limit().is_none());
    }

    #[test]
    fn test_max_cross_track_allowed_uses_magnitude() {
        let waypoint = Waypoint::new(Point3::origin(), 0).with_cross_track_bounds(-3.5, 1.0);
        assert!((waypoint.max_cross_track_allowed() - 3.5).abs() < f64::EPSILON);

        // Both bounds on the same side of the centre line
        let waypoint = Waypoint::new(Point3::origin(), 0).with_cross_track_bounds(0.5, 2.0);
        assert!((waypoint.max_cross_track_allowed() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_to() {
        let a = Waypoint::new(Point3::new(0.0, 0.0, 0.0), 0);
        let b = Waypoint::new(Point3::new(3.0, 4.0, 0.0), 0).with_speed_limit(13.4);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(b.speed_limit(), Some(13.4));
    }

    #[test]
    fn test_set_location() {
        let mut waypoint = Waypoint::new(Point3::origin(), 1);
        waypoint.set_location(Point3::new(5.0, 0.0, 0.0));
        assert_eq!(waypoint.location(), Point3::new(5.0, 0.0, 0.0));
        assert_eq!(waypoint.lane_index(), 1);
    }
}
