//! Engine wiring and the inbound-request dispatch seam

pub mod state;

pub use state::AppState;

use crate::lobby::RegistryError;
use crate::matchmaking::QueueError;
use crate::net::DispatchError;

/// Failures surfaced to the transport layer from a dispatched request
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
