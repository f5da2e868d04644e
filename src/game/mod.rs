//! Match simulation modules

pub mod collision;
pub mod geometry;
pub mod simulation;
pub mod snapshot;

pub use geometry::Vec2;
pub use simulation::{BallState, GameBounds, GameData, PaddleState, ServeSide};
pub use snapshot::MatchSnapshot;
