//! Per-lobby tick scheduler
//!
//! One cancellable periodic task per active lobby. A lobby's ticks run on a
//! single task, so they are strictly sequential even when a tick's work
//! overruns the interval; across lobbies no ordering is guaranteed.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::{GameData, MatchSnapshot};
use crate::net::Dispatcher;
use crate::util::time::unix_millis;

/// Registry of running tick timers, keyed by lobby id
#[derive(Default)]
pub struct TickScheduler {
    tasks: DashMap<Uuid, JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the periodic tick task for a lobby.
    ///
    /// Idempotent: an existing entry for the lobby id is left untouched and
    /// `false` is returned. The check is an explicit entry lookup, not
    /// failure-driven control flow.
    pub fn start_ticking(
        &self,
        lobby_id: Uuid,
        tick_interval: Duration,
        game: Arc<Mutex<GameData>>,
        dispatcher: Dispatcher,
    ) -> bool {
        match self.tasks.entry(lobby_id) {
            Entry::Occupied(_) => {
                debug!(lobby_id = %lobby_id, "Tick timer already running");
                false
            }
            Entry::Vacant(entry) => {
                let handle = tokio::spawn(async move {
                    let mut ticker = interval(tick_interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                    loop {
                        ticker.tick().await;

                        let snapshot = {
                            let mut game = game.lock();
                            game.tick(unix_millis());
                            MatchSnapshot::from_game(&game)
                        };

                        dispatcher.publish(lobby_id, snapshot);
                    }
                });

                entry.insert(handle);
                info!(lobby_id = %lobby_id, interval_ms = tick_interval.as_millis() as u64, "Tick timer created");
                true
            }
        }
    }

    /// Cancel and remove a lobby's tick task; a no-op when absent.
    ///
    /// The abort happens before the caller releases the lobby record, so no
    /// tick fires against a destroyed lobby.
    pub fn stop_ticking(&self, lobby_id: Uuid) -> bool {
        match self.tasks.remove(&lobby_id) {
            Some((_, handle)) => {
                handle.abort();
                info!(lobby_id = %lobby_id, "Tick timer removed");
                true
            }
            None => false,
        }
    }

    pub fn is_ticking(&self, lobby_id: &Uuid) -> bool {
        self.tasks.contains_key(lobby_id)
    }

    pub fn active_timers(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::net::ConnectionHub;

    fn fixture() -> (Arc<Mutex<GameData>>, Dispatcher) {
        let game = Arc::new(Mutex::new(GameData::new(GameConfig::default(), 11)));
        let dispatcher = Dispatcher::new(Arc::new(ConnectionHub::new()));
        (game, dispatcher)
    }

    #[tokio::test]
    async fn double_start_keeps_one_timer() {
        let scheduler = TickScheduler::new();
        let lobby_id = Uuid::new_v4();
        let (game, dispatcher) = fixture();

        assert!(scheduler.start_ticking(
            lobby_id,
            Duration::from_millis(10),
            game.clone(),
            dispatcher.clone()
        ));
        assert!(!scheduler.start_ticking(lobby_id, Duration::from_millis(10), game, dispatcher));
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.stop_ticking(lobby_id);
    }

    #[tokio::test]
    async fn stop_is_a_noop_when_absent() {
        let scheduler = TickScheduler::new();
        assert!(!scheduler.stop_ticking(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn ticking_advances_the_simulation() {
        let scheduler = TickScheduler::new();
        let lobby_id = Uuid::new_v4();
        let (game, dispatcher) = fixture();

        scheduler.start_ticking(lobby_id, Duration::from_millis(5), game.clone(), dispatcher);
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop_ticking(lobby_id);

        // The first tick serves; the new-round flag must be cleared
        assert!(!game.lock().is_new_round);
        assert!(!scheduler.is_ticking(&lobby_id));
    }
}
