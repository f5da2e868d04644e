//! Lobby registry: pairing records, match creation, lifecycle

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::game::GameData;
use crate::matchmaking::Participant;
use crate::net::{Dispatcher, ServerEvent};
use crate::util::time::unix_millis;

use super::scheduler::TickScheduler;
use super::{PlayerSide, RegistryError};

/// A registered pairing of exactly two participants.
///
/// Index 0 plays the left side, index 1 the right side (pair iteration
/// order).
pub struct Lobby {
    pub lobby_id: Uuid,
    pub participants: [Participant; 2],
    pub created_at_ms: u64,
    pub player_left_ready: bool,
    pub player_right_ready: bool,
    /// Participants that have not left yet
    present: HashSet<Uuid>,
    /// Owned simulation state, allocated once both sides are ready
    pub game: Option<Arc<Mutex<GameData>>>,
}

impl Lobby {
    fn side_of(&self, participant_id: Uuid) -> Option<PlayerSide> {
        if self.participants[0].participant_id == participant_id {
            Some(PlayerSide::Left)
        } else if self.participants[1].participant_id == participant_id {
            Some(PlayerSide::Right)
        } else {
            None
        }
    }

    pub fn both_ready(&self) -> bool {
        self.player_left_ready && self.player_right_ready
    }
}

/// Exclusive owner of all lobby records and, transitively, their match
/// simulation state and tick timers.
pub struct LobbyRegistry {
    config: Config,
    lobbies: DashMap<Uuid, Lobby>,
    scheduler: TickScheduler,
    dispatcher: Dispatcher,
}

impl LobbyRegistry {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            lobbies: DashMap::new(),
            scheduler: TickScheduler::new(),
            dispatcher,
        }
    }

    /// Create a lobby for a freshly dequeued pair: register the record,
    /// group-subscribe both connections under the lobby id, and notify the
    /// group.
    pub fn create_lobby(&self, pair: (Participant, Participant)) -> Uuid {
        let lobby_id = Uuid::new_v4();
        let (left, right) = pair;

        info!(
            lobby_id = %lobby_id,
            left = %left.participant_id,
            right = %right.participant_id,
            "Lobby created"
        );

        self.dispatcher.subscribe(lobby_id, left.connection_id);
        self.dispatcher.subscribe(lobby_id, right.connection_id);

        let present = [left.participant_id, right.participant_id]
            .into_iter()
            .collect();

        self.lobbies.insert(
            lobby_id,
            Lobby {
                lobby_id,
                participants: [left, right],
                created_at_ms: unix_millis(),
                player_left_ready: false,
                player_right_ready: false,
                present,
                game: None,
            },
        );

        self.dispatcher
            .notify(lobby_id, ServerEvent::LobbyCreated { lobby_id });

        lobby_id
    }

    /// Build a fresh match simulation on the lobby. The first participant
    /// plays left, the second right. Idempotent once a game exists.
    pub fn create_match(&self, lobby_id: Uuid) -> Result<(), RegistryError> {
        let mut lobby = self
            .lobbies
            .get_mut(&lobby_id)
            .ok_or(RegistryError::NoSuchLobby(lobby_id))?;

        if lobby.game.is_some() {
            return Ok(());
        }

        let mut game = GameData::new(self.config.game, rand::random());
        game.player_left_ready = lobby.player_left_ready;
        game.player_right_ready = lobby.player_right_ready;

        info!(lobby_id = %lobby_id, match_id = %game.match_id, "Match created");
        lobby.game = Some(Arc::new(Mutex::new(game)));
        Ok(())
    }

    /// Set the ready flag for the participant's side; when both sides are
    /// ready the match is created and its tick timer started.
    pub fn mark_ready(&self, lobby_id: Uuid, participant_id: Uuid) -> Result<(), RegistryError> {
        let start = {
            let mut lobby = self
                .lobbies
                .get_mut(&lobby_id)
                .ok_or(RegistryError::NoSuchLobby(lobby_id))?;

            match lobby.side_of(participant_id) {
                Some(PlayerSide::Left) => lobby.player_left_ready = true,
                Some(PlayerSide::Right) => lobby.player_right_ready = true,
                None => return Err(RegistryError::UnknownParticipant(participant_id)),
            }

            info!(lobby_id = %lobby_id, participant_id = %participant_id, "Participant ready");
            lobby.both_ready()
        };

        if start {
            self.start_match(lobby_id)?;
        }
        Ok(())
    }

    fn start_match(&self, lobby_id: Uuid) -> Result<(), RegistryError> {
        self.create_match(lobby_id)?;

        let game = {
            let lobby = self
                .lobbies
                .get(&lobby_id)
                .ok_or(RegistryError::NoSuchLobby(lobby_id))?;
            // Guaranteed by create_match just above
            match &lobby.game {
                Some(game) => game.clone(),
                None => return Err(RegistryError::NoSuchLobby(lobby_id)),
            }
        };

        self.scheduler.start_ticking(
            lobby_id,
            self.config.tick_interval,
            game,
            self.dispatcher.clone(),
        );
        Ok(())
    }

    /// Remove one participant from the lobby. The lobby is destroyed once
    /// every participant has left.
    pub fn leave_lobby(&self, lobby_id: Uuid, participant_id: Uuid) -> Result<(), RegistryError> {
        let destroy = {
            let mut lobby = self
                .lobbies
                .get_mut(&lobby_id)
                .ok_or(RegistryError::NoSuchLobby(lobby_id))?;

            if !lobby.present.remove(&participant_id) {
                return Err(RegistryError::UnknownParticipant(participant_id));
            }

            if let Some(side) = lobby.side_of(participant_id) {
                let connection_id = match side {
                    PlayerSide::Left => lobby.participants[0].connection_id,
                    PlayerSide::Right => lobby.participants[1].connection_id,
                };
                self.dispatcher.unsubscribe(lobby_id, connection_id);
            }

            info!(lobby_id = %lobby_id, participant_id = %participant_id, "Participant left lobby");
            lobby.present.is_empty()
        };

        if destroy {
            self.destroy_lobby(lobby_id);
        }
        Ok(())
    }

    /// Tear a lobby down: stop its tick timer first, then unsubscribe the
    /// remaining connections and drop the record.
    pub fn destroy_lobby(&self, lobby_id: Uuid) {
        self.scheduler.stop_ticking(lobby_id);

        match self.lobbies.remove(&lobby_id) {
            Some((_, lobby)) => {
                for participant in &lobby.participants {
                    self.dispatcher
                        .unsubscribe(lobby_id, participant.connection_id);
                }
                info!(lobby_id = %lobby_id, "Lobby destroyed");
            }
            None => {
                warn!(lobby_id = %lobby_id, "Destroy requested for unknown lobby");
            }
        }
    }

    /// Refresh a lobby participant's connection-address id after a
    /// reconnect, updating the group subscription to match.
    pub fn refresh_connection(&self, participant_id: Uuid, connection_id: Uuid) -> bool {
        for mut entry in self.lobbies.iter_mut() {
            let lobby_id = *entry.key();
            let lobby = entry.value_mut();
            if let Some(side) = lobby.side_of(participant_id) {
                let slot = match side {
                    PlayerSide::Left => &mut lobby.participants[0],
                    PlayerSide::Right => &mut lobby.participants[1],
                };
                let old = slot.connection_id;
                slot.connection_id = connection_id;
                self.dispatcher.unsubscribe(lobby_id, old);
                self.dispatcher.subscribe(lobby_id, connection_id);
                return true;
            }
        }
        false
    }

    pub fn lobby_count(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_ticking(&self, lobby_id: &Uuid) -> bool {
        self.scheduler.is_ticking(lobby_id)
    }

    /// Lobby id holding this participant, if any
    pub fn find_lobby_of(&self, participant_id: Uuid) -> Option<Uuid> {
        self.lobbies
            .iter()
            .find(|entry| entry.value().side_of(participant_id).is_some())
            .map(|entry| *entry.key())
    }
}
