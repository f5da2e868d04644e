//! Geometry kernel: 2D vectors and segment intersection
//!
//! Everything here is pure and stateless; the collision resolver is the only
//! consumer outside of snapshots.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// A 2D vector / point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit-length copy; zero vectors are returned unchanged rather than
    /// dividing by zero.
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            *self
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    /// `self + direction * scale`
    pub fn scale_add(&self, direction: Vec2, scale: f64) -> Vec2 {
        Vec2::new(self.x + direction.x * scale, self.y + direction.y * scale)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Convert degrees to radians
pub fn deg_to_rad(angle: f64) -> f64 {
    angle * (std::f64::consts::PI / 180.0)
}

/// Intersection point of two line segments, by Paul Bourke's parametric
/// method (http://paulbourke.net/geometry/pointlineplane/).
///
/// Returns `None` when either segment has zero length, when the segments are
/// parallel (denominator is zero), or when the intersection falls outside
/// either segment. Never divides by zero.
pub fn segment_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> Option<Vec2> {
    if (p1.x == p2.x && p1.y == p2.y) || (p3.x == p4.x && p3.y == p4.y) {
        return None;
    }

    let denominator = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denominator;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denominator;

    // Intersection must lie on both segments, endpoints included
    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(Vec2::new(
        p1.x + ua * (p2.x - p1.x),
        p1.y + ua * (p2.y - p1.y),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_segments_do_not_intersect() {
        let result = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 5.0),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn crossing_segments_intersect_at_midpoint() {
        let result = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        assert_eq!(result, Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn zero_length_segment_does_not_intersect() {
        let result = segment_intersect(
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn non_overlapping_segments_do_not_intersect() {
        // Lines cross but the segments stop short of each other
        let result = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn axis_aligned_crossing_is_exact() {
        // Horizontal travel across a vertical wall at x = 390
        let result = segment_intersect(
            Vec2::new(380.0, 0.0),
            Vec2::new(400.0, 0.0),
            Vec2::new(390.0, 290.0),
            Vec2::new(390.0, -290.0),
        );
        let point = result.expect("crossing must intersect");
        assert_eq!(point.x, 390.0);
        assert_eq!(point.y, 0.0);
    }

    #[test]
    fn deg_to_rad_converts_right_angle() {
        assert!((deg_to_rad(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }
}
