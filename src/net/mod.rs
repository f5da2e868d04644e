//! Boundary to the transport layer: wire DTOs, connection hub, dispatcher

pub mod dispatch;
pub mod hub;
pub mod protocol;

pub use dispatch::Dispatcher;
pub use hub::ConnectionHub;
pub use protocol::{ClientRequest, ConnectionId, ParticipantDescriptor, ServerEvent};

/// Delivery failures at the connection boundary
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The recorded connection-address id no longer resolves to a live
    /// connection; the transport must refresh or drop the participant.
    #[error("Connection route is stale: {0}")]
    StaleConnection(ConnectionId),
}
