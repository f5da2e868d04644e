//! Application state shared with the embedding transport layer

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::lobby::{LobbyRegistry, RegistryError};
use crate::matchmaking::{MatchmakingService, QueueError};
use crate::net::{ClientRequest, ConnectionHub, DispatchError, Dispatcher, ServerEvent};

use super::EngineError;

/// Shared engine state.
///
/// A transport adapter registers connections on the hub, feeds validated
/// [`ClientRequest`] values through [`AppState::dispatch`], and drains the
/// per-connection receivers for outbound [`ServerEvent`]s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: Arc<ConnectionHub>,
    pub dispatcher: Dispatcher,
    pub registry: Arc<LobbyRegistry>,
    pub matchmaking: Arc<MatchmakingService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let hub = Arc::new(ConnectionHub::new());
        let dispatcher = Dispatcher::new(hub.clone());

        let registry = Arc::new(LobbyRegistry::new((*config).clone(), dispatcher.clone()));
        let matchmaking = Arc::new(MatchmakingService::new(&config, registry.clone()));

        Self {
            config,
            hub,
            dispatcher,
            registry,
            matchmaking,
        }
    }

    /// Route one inbound request to its operation.
    ///
    /// "Not ready" outcomes (no pair yet, invite stub) complete without
    /// error; only genuinely unexpected conditions surface as
    /// [`EngineError`] for the transport to report via
    /// [`ServerEvent::Error`].
    pub async fn dispatch(&self, request: ClientRequest) -> Result<(), EngineError> {
        match request {
            ClientRequest::JoinQueue { descriptor } => {
                self.matchmaking.join_queue(descriptor).await?;
                Ok(())
            }
            ClientRequest::LeaveQueue { participant_id } => {
                self.matchmaking.leave_queue(participant_id).await;
                Ok(())
            }
            ClientRequest::SendInvite {
                from_participant,
                to_participant,
            } => {
                self.matchmaking
                    .send_invite(from_participant, to_participant)
                    .await;
                Ok(())
            }
            ClientRequest::PlayerReady {
                lobby_id,
                participant_id,
            } => {
                self.registry.mark_ready(lobby_id, participant_id)?;
                Ok(())
            }
        }
    }

    /// Report a dispatch failure to the offending connection, best-effort
    pub fn report_error(&self, connection_id: Uuid, error: &EngineError) {
        let event = ServerEvent::Error {
            status: error.status(),
            message: error.to_string(),
        };
        if self.dispatcher.send_to(connection_id, event).is_err() {
            warn!(connection_id = %connection_id, "Could not report error on stale connection");
        }
    }
}

impl EngineError {
    /// Status code carried on the outbound `error` event
    pub fn status(&self) -> u16 {
        match self {
            EngineError::Queue(QueueError::SpectatorNotAllowed) => 403,
            EngineError::Registry(RegistryError::NoSuchLobby(_)) => 404,
            EngineError::Registry(RegistryError::UnknownParticipant(_)) => 404,
            EngineError::Dispatch(DispatchError::StaleConnection(_)) => 410,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ParticipantDescriptor;

    #[tokio::test]
    async fn ready_for_unknown_lobby_maps_to_not_found() {
        let state = AppState::new(Config::from_env().expect("default config"));
        let err = state
            .dispatch(ClientRequest::PlayerReady {
                lobby_id: Uuid::new_v4(),
                participant_id: Uuid::new_v4(),
            })
            .await
            .expect_err("unknown lobby must fail");
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn join_queue_request_enqueues() {
        let state = AppState::new(Config::from_env().expect("default config"));
        let connection_id = Uuid::new_v4();
        let _rx = state.hub.register(connection_id);

        state
            .dispatch(ClientRequest::JoinQueue {
                descriptor: ParticipantDescriptor {
                    connection_id,
                    display_name: "solo".to_string(),
                    is_player: true,
                    rating: None,
                },
            })
            .await
            .expect("player-role join is accepted");

        assert_eq!(state.matchmaking.queue_size().await, 1);
    }

    #[tokio::test]
    async fn spectator_join_request_maps_to_forbidden() {
        let state = AppState::new(Config::from_env().expect("default config"));
        let connection_id = Uuid::new_v4();
        let _rx = state.hub.register(connection_id);

        let err = state
            .dispatch(ClientRequest::JoinQueue {
                descriptor: ParticipantDescriptor {
                    connection_id,
                    display_name: "watcher".to_string(),
                    is_player: false,
                    rating: None,
                },
            })
            .await
            .expect_err("spectator role must be rejected");

        assert_eq!(err.status(), 403);
        assert_eq!(state.matchmaking.queue_size().await, 0);
    }

    #[tokio::test]
    async fn report_error_reaches_the_connection() {
        let state = AppState::new(Config::from_env().expect("default config"));
        let connection_id = Uuid::new_v4();
        let mut rx = state.hub.register(connection_id);

        let err = EngineError::Registry(RegistryError::NoSuchLobby(Uuid::new_v4()));
        state.report_error(connection_id, &err);

        match rx.recv().await {
            Some(ServerEvent::Error { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("No such lobby"));
            }
            other => panic!("expected error event, got {:?}", other),
        }
    }
}
