//! Matchmaking queue implementation

use std::collections::VecDeque;
use uuid::Uuid;

use crate::config::PairingPolicy;
use crate::net::protocol::{ConnectionId, ParticipantDescriptor};
use crate::util::time::unix_millis;

/// A queued or lobby-assigned participant
#[derive(Debug, Clone)]
pub struct Participant {
    pub participant_id: Uuid,
    /// Routing address; refreshed when the underlying connection changes
    pub connection_id: ConnectionId,
    pub display_name: String,
    /// Player vs. spectator
    pub is_player: bool,
    /// Skill rating, reserved for future matching logic
    pub rating: Option<u32>,
    pub queued_at_ms: u64,
}

impl Participant {
    pub fn from_descriptor(descriptor: ParticipantDescriptor) -> Self {
        Self {
            participant_id: Uuid::new_v4(),
            connection_id: descriptor.connection_id,
            display_name: descriptor.display_name,
            is_player: descriptor.is_player,
            rating: descriptor.rating,
            queued_at_ms: unix_millis(),
        }
    }
}

/// The ordered waiting list of participants.
///
/// Insertion order is significant; which end a pair is taken from is decided
/// by the configured [`PairingPolicy`]. No participant appears twice.
pub struct MatchQueue {
    queue: VecDeque<Participant>,
    policy: PairingPolicy,
}

impl MatchQueue {
    pub fn new(policy: PairingPolicy) -> Self {
        Self {
            queue: VecDeque::new(),
            policy,
        }
    }

    /// Append a participant at the tail. A participant already queued under
    /// the same id is replaced, preserving the no-duplicates invariant on
    /// rejoin.
    pub fn enqueue(&mut self, participant: Participant) {
        self.queue
            .retain(|p| p.participant_id != participant.participant_id);
        self.queue.push_back(participant);
    }

    /// Remove a participant (voluntary leave or disconnect)
    pub fn remove(&mut self, participant_id: Uuid) -> Option<Participant> {
        let pos = self
            .queue
            .iter()
            .position(|p| p.participant_id == participant_id)?;
        self.queue.remove(pos)
    }

    /// Update a queued participant's connection-address id
    pub fn refresh_connection(
        &mut self,
        participant_id: Uuid,
        connection_id: ConnectionId,
    ) -> bool {
        match self
            .queue
            .iter_mut()
            .find(|p| p.participant_id == participant_id)
        {
            Some(p) => {
                p.connection_id = connection_id;
                true
            }
            None => false,
        }
    }

    /// Remove and return a pair of participants, or `None` below two
    /// entries.
    ///
    /// Under `NewestTwo` (the source-faithful default) the two most recently
    /// queued participants are taken from the tail, which can starve long
    /// waiters; `OldestTwo` takes from the head instead.
    pub fn dequeue_pair(&mut self) -> Option<(Participant, Participant)> {
        if self.queue.len() < 2 {
            return None;
        }
        match self.policy {
            PairingPolicy::NewestTwo => {
                let first = self.queue.pop_back()?;
                let second = self.queue.pop_back()?;
                Some((first, second))
            }
            PairingPolicy::OldestTwo => {
                let first = self.queue.pop_front()?;
                let second = self.queue.pop_front()?;
                Some((first, second))
            }
        }
    }

    pub fn contains(&self, participant_id: &Uuid) -> bool {
        self.queue
            .iter()
            .any(|p| &p.participant_id == participant_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
