//! Wire DTOs at the boundary to the transport layer
//!
//! The transport (websocket gateway, test harness, ...) validates raw client
//! traffic into `ClientRequest` values and delivers `ServerEvent` values to
//! connections. Nothing in this crate parses sockets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::MatchSnapshot;

/// Stable id the transport uses to address one live connection
pub type ConnectionId = Uuid;

/// Descriptor handed in when a client asks to join the queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDescriptor {
    /// Connection-address id; must be refreshed if the connection changes
    pub connection_id: ConnectionId,
    pub display_name: String,
    /// Player vs. spectator
    pub is_player: bool,
    /// Skill rating, reserved for future matching logic
    pub rating: Option<u32>,
}

/// Requests consumed from the transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Enter the matchmaking queue
    JoinQueue { descriptor: ParticipantDescriptor },

    /// Leave the matchmaking queue
    LeaveQueue { participant_id: Uuid },

    /// Invite another participant to a match
    SendInvite {
        from_participant: Uuid,
        to_participant: Uuid,
    },

    /// Signal readiness inside a lobby
    PlayerReady {
        lobby_id: Uuid,
        participant_id: Uuid,
    },
}

/// Events produced for the transport layer to deliver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A lobby was created for the receiving connections
    LobbyCreated { lobby_id: Uuid },

    /// Per-tick simulation snapshot
    ServerUpdate { snapshot: MatchSnapshot },

    /// Fatal per-operation failure
    Error { status: u16, message: String },
}
