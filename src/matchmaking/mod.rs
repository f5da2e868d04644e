//! Matchmaking: waiting queue and pair formation

pub mod queue;
pub mod service;

pub use queue::{MatchQueue, Participant};
pub use service::MatchmakingService;

/// Queue admission failures
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Pairing is for player-role participants only; spectators never
    /// occupy a paddle side.
    #[error("Only player-role participants can join the matchmaking queue")]
    SpectatorNotAllowed,
}
