//! Matchmaking service - queue membership and pair formation

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::lobby::LobbyRegistry;
use crate::net::protocol::{ConnectionId, ParticipantDescriptor};

use super::queue::{MatchQueue, Participant};
use super::QueueError;

/// Matchmaking service.
///
/// All queue mutations go through one `tokio::sync::Mutex`, so a single
/// enqueue/dequeue-pair is in flight at a time and two concurrent joins can
/// never both capture the same pair.
pub struct MatchmakingService {
    queue: Mutex<MatchQueue>,
    registry: Arc<LobbyRegistry>,
}

impl MatchmakingService {
    pub fn new(config: &Config, registry: Arc<LobbyRegistry>) -> Self {
        Self {
            queue: Mutex::new(MatchQueue::new(config.pairing_policy)),
            registry,
        }
    }

    /// Add a participant to the queue and attempt pairing.
    ///
    /// Only player-role participants are admitted; a lobby holds exactly two
    /// players and spectators must never be given a paddle side. Returns the
    /// new participant id. When the queue yields a pair, a lobby is created
    /// for it after the queue lock is released.
    pub async fn join_queue(
        &self,
        descriptor: ParticipantDescriptor,
    ) -> Result<Uuid, QueueError> {
        if !descriptor.is_player {
            warn!(
                display_name = %descriptor.display_name,
                "Rejected spectator-role participant from the queue"
            );
            return Err(QueueError::SpectatorNotAllowed);
        }

        let participant = Participant::from_descriptor(descriptor);
        let participant_id = participant.participant_id;

        let pair = {
            let mut queue = self.queue.lock().await;
            queue.enqueue(participant);
            info!(
                participant_id = %participant_id,
                queue_size = queue.len(),
                "Participant joined matchmaking queue"
            );
            queue.dequeue_pair()
        };

        if let Some(pair) = pair {
            self.registry.create_lobby(pair);
        }

        Ok(participant_id)
    }

    /// Remove a participant from the queue; a no-op if absent
    pub async fn leave_queue(&self, participant_id: Uuid) {
        let mut queue = self.queue.lock().await;
        if queue.remove(participant_id).is_some() {
            info!(
                participant_id = %participant_id,
                queue_size = queue.len(),
                "Participant left matchmaking queue"
            );
        }
    }

    /// Direct game invites are not implemented yet; the request is accepted
    /// and logged without any pairing effect.
    pub async fn send_invite(&self, from_participant: Uuid, to_participant: Uuid) {
        info!(
            from = %from_participant,
            to = %to_participant,
            "Game invite received (not implemented)"
        );
    }

    /// Refresh a queued participant's connection-address id after a
    /// reconnect
    pub async fn refresh_connection(
        &self,
        participant_id: Uuid,
        connection_id: ConnectionId,
    ) -> bool {
        self.queue
            .lock()
            .await
            .refresh_connection(participant_id, connection_id)
    }

    pub async fn queue_size(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_in_queue(&self, participant_id: &Uuid) -> bool {
        self.queue.lock().await.contains(participant_id)
    }
}
