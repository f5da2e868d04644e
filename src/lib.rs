//! Pong Match Server - authoritative two-player match engine
//!
//! The engine pairs waiting participants, tracks lobbies and readiness, and
//! runs one independent simulation clock per active match. Transport, auth,
//! chat, and persistence are external collaborators: a gateway registers
//! connections on the [`net::ConnectionHub`], feeds validated requests into
//! [`app::AppState::dispatch`], and drains per-connection receivers for
//! outbound events.

pub mod app;
pub mod config;
pub mod game;
pub mod lobby;
pub mod matchmaking;
pub mod net;
pub mod util;

pub use app::{AppState, EngineError};
pub use config::Config;
