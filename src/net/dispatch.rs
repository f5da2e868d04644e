//! Broadcast dispatcher: snapshot and lifecycle delivery to lobby groups

use std::sync::Arc;

use uuid::Uuid;

use crate::game::MatchSnapshot;

use super::hub::ConnectionHub;
use super::protocol::{ConnectionId, ServerEvent};
use super::DispatchError;

/// Delivers simulation snapshots and lobby lifecycle events to the
/// connections subscribed under a lobby id.
#[derive(Clone)]
pub struct Dispatcher {
    hub: Arc<ConnectionHub>,
}

impl Dispatcher {
    pub fn new(hub: Arc<ConnectionHub>) -> Self {
        Self { hub }
    }

    /// Subscribe a connection under a lobby's group
    pub fn subscribe(&self, lobby_id: Uuid, connection_id: ConnectionId) {
        self.hub.join_group(lobby_id, connection_id);
    }

    /// Remove a connection from a lobby's group
    pub fn unsubscribe(&self, lobby_id: Uuid, connection_id: ConnectionId) {
        self.hub.leave_group(lobby_id, connection_id);
    }

    /// Send the current match snapshot to the lobby's group
    pub fn publish(&self, lobby_id: Uuid, snapshot: MatchSnapshot) {
        self.hub
            .emit_group(lobby_id, &ServerEvent::ServerUpdate { snapshot });
    }

    /// Send a lifecycle event to the lobby's group
    pub fn notify(&self, lobby_id: Uuid, event: ServerEvent) {
        self.hub.emit_group(lobby_id, &event);
    }

    /// Send an event to one connection; stale routes surface to the caller
    pub fn send_to(
        &self,
        connection_id: ConnectionId,
        event: ServerEvent,
    ) -> Result<(), DispatchError> {
        self.hub.emit_to(connection_id, event)
    }
}
