//! Connection hub: per-connection senders and lobby-keyed groups
//!
//! This is the in-process realization of the connection abstraction the
//! engine requires from the transport layer: address a single connection by
//! a stable id, add/remove a connection to/from a named group, and emit an
//! event to either one connection or a whole group.

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::protocol::{ConnectionId, ServerEvent};
use super::DispatchError;

/// Registry of live connections and their group memberships
#[derive(Default)]
pub struct ConnectionHub {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
    groups: DashMap<Uuid, HashSet<ConnectionId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; returns the receiving side for the transport
    /// to drain.
    pub fn register(&self, connection_id: ConnectionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(connection_id, tx);
        rx
    }

    /// Drop a connection and all of its group memberships
    pub fn unregister(&self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
        for mut group in self.groups.iter_mut() {
            group.value_mut().remove(&connection_id);
        }
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Add a connection to a named group
    pub fn join_group(&self, group_id: Uuid, connection_id: ConnectionId) {
        self.groups
            .entry(group_id)
            .or_default()
            .insert(connection_id);
    }

    /// Remove a connection from a named group; the group record is dropped
    /// with its last member.
    pub fn leave_group(&self, group_id: Uuid, connection_id: ConnectionId) {
        if let Some(mut group) = self.groups.get_mut(&group_id) {
            group.value_mut().remove(&connection_id);
            let now_empty = group.value().is_empty();
            drop(group);
            if now_empty {
                self.groups.remove_if(&group_id, |_, members| members.is_empty());
            }
        }
    }

    pub fn group_size(&self, group_id: &Uuid) -> usize {
        self.groups.get(group_id).map(|g| g.len()).unwrap_or(0)
    }

    /// Emit an event to a single connection.
    ///
    /// An unknown or closed connection id is a stale route: the client
    /// reconnected or dropped without the participant record being
    /// refreshed. That is reported upward for the transport to resolve.
    pub fn emit_to(
        &self,
        connection_id: ConnectionId,
        event: ServerEvent,
    ) -> Result<(), DispatchError> {
        let Some(sender) = self.connections.get(&connection_id) else {
            return Err(DispatchError::StaleConnection(connection_id));
        };
        if sender.send(event).is_err() {
            drop(sender);
            self.connections.remove(&connection_id);
            return Err(DispatchError::StaleConnection(connection_id));
        }
        Ok(())
    }

    /// Emit an event to every member of a group. Stale members are logged
    /// and skipped; group delivery never fails the caller.
    pub fn emit_group(&self, group_id: Uuid, event: &ServerEvent) {
        let Some(group) = self.groups.get(&group_id) else {
            return;
        };
        let members: Vec<ConnectionId> = group.iter().copied().collect();
        drop(group);
        for connection_id in members {
            if let Err(err) = self.emit_to(connection_id, event.clone()) {
                debug!(group_id = %group_id, error = %err, "Skipping stale group member");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::ServerEvent;

    #[tokio::test]
    async fn emit_to_routes_to_registered_connection() {
        let hub = ConnectionHub::new();
        let conn = Uuid::new_v4();
        let mut rx = hub.register(conn);

        hub.emit_to(
            conn,
            ServerEvent::Error {
                status: 500,
                message: "boom".into(),
            },
        )
        .expect("registered connection must be routable");

        match rx.recv().await {
            Some(ServerEvent::Error { status, .. }) => assert_eq!(status, 500),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_connection_is_a_stale_route() {
        let hub = ConnectionHub::new();
        let result = hub.emit_to(
            Uuid::new_v4(),
            ServerEvent::LobbyCreated {
                lobby_id: Uuid::new_v4(),
            },
        );
        assert!(matches!(result, Err(DispatchError::StaleConnection(_))));
    }

    #[tokio::test]
    async fn group_emit_reaches_all_members() {
        let hub = ConnectionHub::new();
        let lobby = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rx_a = hub.register(a);
        let mut rx_b = hub.register(b);
        hub.join_group(lobby, a);
        hub.join_group(lobby, b);

        hub.emit_group(lobby, &ServerEvent::LobbyCreated { lobby_id: lobby });

        assert!(matches!(
            rx_a.recv().await,
            Some(ServerEvent::LobbyCreated { .. })
        ));
        assert!(matches!(
            rx_b.recv().await,
            Some(ServerEvent::LobbyCreated { .. })
        ));
    }

    #[tokio::test]
    async fn leaving_a_group_stops_delivery() {
        let hub = ConnectionHub::new();
        let lobby = Uuid::new_v4();
        let conn = Uuid::new_v4();
        let mut rx = hub.register(conn);
        hub.join_group(lobby, conn);
        hub.leave_group(lobby, conn);
        assert_eq!(hub.group_size(&lobby), 0);

        hub.emit_group(lobby, &ServerEvent::LobbyCreated { lobby_id: lobby });

        assert!(rx.try_recv().is_err());
    }
}
