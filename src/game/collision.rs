//! Collision resolver for the play-area boundaries
//!
//! Resolves one boundary crossing per tick against the four walls, in a fixed
//! priority order. Corner hits that would need two reflections in the same
//! tick resolve against the first wall only; the second crossing is picked up
//! on the following tick. Paddle contact (with its speed increase) is an open
//! extension point and is not resolved here.

use crate::config::GameConfig;

use super::geometry::{segment_intersect, Vec2};

/// Play-area extents the ball center is allowed to occupy: the half-extents
/// shrunk by the ball radius.
#[derive(Debug, Clone, Copy)]
pub struct Walls {
    pub half_width: f64,
    pub half_height: f64,
}

impl Walls {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            half_width: config.play_area_width / 2.0 - config.ball_radius,
            half_height: config.play_area_height / 2.0 - config.ball_radius,
        }
    }

    /// Corner points of a wall segment, ordered top-to-bottom or
    /// left-to-right.
    fn segment(&self, side: Side) -> (Vec2, Vec2) {
        let (hw, hh) = (self.half_width, self.half_height);
        match side {
            Side::Right => (Vec2::new(hw, hh), Vec2::new(hw, -hh)),
            Side::Left => (Vec2::new(-hw, hh), Vec2::new(-hw, -hh)),
            Side::Top => (Vec2::new(-hw, hh), Vec2::new(hw, hh)),
            Side::Bottom => (Vec2::new(-hw, -hh), Vec2::new(hw, -hh)),
        }
    }
}

/// Boundary sides in resolution priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Right,
    Left,
    Top,
    Bottom,
}

const SIDE_PRIORITY: [Side; 4] = [Side::Right, Side::Left, Side::Top, Side::Bottom];

impl Side {
    /// Coarse bounding test: does the proposed position sit at or beyond
    /// this wall?
    fn coarse_hit(&self, proposed: Vec2, walls: &Walls) -> bool {
        match self {
            Side::Right => proposed.x >= walls.half_width,
            Side::Left => proposed.x <= -walls.half_width,
            Side::Top => proposed.y >= walls.half_height,
            Side::Bottom => proposed.y <= -walls.half_height,
        }
    }

    /// Negate the velocity component perpendicular to this wall
    fn reflect(&self, direction: Vec2) -> Vec2 {
        match self {
            Side::Right | Side::Left => Vec2::new(-direction.x, direction.y),
            Side::Top | Side::Bottom => Vec2::new(direction.x, -direction.y),
        }
    }
}

/// Outcome of resolving one tick of ball motion
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub position: Vec2,
    pub direction: Vec2,
    /// True when a wall reflection was applied this tick
    pub reflected: bool,
}

/// Resolve the motion from `prev` to `proposed` against the play-area walls.
///
/// The first wall (in priority order right, left, top, bottom) whose coarse
/// test holds is checked precisely with a segment intersection. On a hit the
/// overshoot past the wall is re-applied along the reflected direction, so
/// the travelled distance within the tick is preserved. A coarse hit with no
/// precise intersection leaves the proposed motion untouched; the tick
/// degrades safely instead of failing.
pub fn resolve(prev: Vec2, proposed: Vec2, direction: Vec2, walls: &Walls) -> Resolution {
    for side in SIDE_PRIORITY {
        if !side.coarse_hit(proposed, walls) {
            continue;
        }

        let (corner_a, corner_b) = walls.segment(side);
        return match segment_intersect(prev, proposed, corner_a, corner_b) {
            Some(intersection) => {
                let overshoot = (proposed - intersection).length();
                let reflected = side.reflect(direction);
                Resolution {
                    position: intersection.scale_add(reflected, overshoot),
                    direction: reflected,
                    reflected: true,
                }
            }
            // Numerically inconsistent input; skip correction for this tick
            None => Resolution {
                position: proposed,
                direction,
                reflected: false,
            },
        };
    }

    Resolution {
        position: proposed,
        direction,
        reflected: false,
    }
}
