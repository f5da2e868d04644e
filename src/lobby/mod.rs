//! Lobby lifecycle and per-lobby tick scheduling

pub mod registry;
pub mod scheduler;

pub use registry::{Lobby, LobbyRegistry};
pub use scheduler::TickScheduler;

use uuid::Uuid;

/// Which paddle a lobby participant controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSide {
    Left,
    Right,
}

/// Registry operation failures
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("No such lobby: {0}")]
    NoSuchLobby(Uuid),

    #[error("Participant is not part of this lobby: {0}")]
    UnknownParticipant(Uuid),
}
