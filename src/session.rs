/// Session — owns the room list engine for one logged-in connection.
///
/// There is no global store: a host creates a `RoomListSession` when the
/// connection comes up, routes every room event through it, and calls
/// `stop` on logout. The session also listens to an [`ActiveCallFeed`]
/// and folds its latest value into the engine before each update.
///
/// [`ActiveCallFeed`]: crate::notify::ActiveCallFeed
use tokio::sync::watch;

use crate::algorithms::{ActiveCallSet, Algorithm, AlgorithmError};
use crate::config::{ConfigError, EngineConfig};
use crate::models::{RoomRef, UpdateCause};

#[derive(Debug)]
pub struct RoomListSession {
    algorithm: Algorithm,
    calls: Option<watch::Receiver<ActiveCallSet>>,
}

impl RoomListSession {
    /// Build the engine from `config`, load `rooms` and seed the active calls.
    pub fn start(
        config: &EngineConfig,
        rooms: Vec<RoomRef>,
        mut calls: Option<watch::Receiver<ActiveCallSet>>,
    ) -> Result<Self, ConfigError> {
        let mut algorithm = Algorithm::new();
        config.apply_to(&mut algorithm)?;
        algorithm.set_known_rooms(rooms)?;

        // A fresh receiver has already seen the current value; seed it explicitly.
        if let Some(rx) = calls.as_mut() {
            let current = rx.borrow_and_update().clone();
            algorithm.set_active_calls(current);
        }

        let session = RoomListSession { algorithm, calls };
        log::info!(
            "Room list session started: {} rooms, {} tags",
            session.algorithm.known_rooms().len(),
            config.tags.len()
        );
        Ok(session)
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn algorithm_mut(&mut self) -> &mut Algorithm {
        &mut self.algorithm
    }

    pub fn is_running(&self) -> bool {
        self.calls.is_some()
    }

    /// Forward one room event, after picking up any call changes.
    pub fn handle_room_update(
        &mut self,
        room: RoomRef,
        cause: UpdateCause,
    ) -> Result<bool, AlgorithmError> {
        let pinned = self.sync_active_calls();
        let changed = self.algorithm.handle_room_update(room, cause)?;
        Ok(pinned || changed)
    }

    /// Pull the latest active-call set if the feed moved. Returns true if the
    /// visible order changed.
    pub fn sync_active_calls(&mut self) -> bool {
        let rx = match self.calls.as_mut() {
            Some(rx) => rx,
            None => return false,
        };

        match rx.has_changed() {
            Ok(true) => {
                let calls = rx.borrow_and_update().clone();
                self.algorithm.set_active_calls(calls)
            }
            Ok(false) => false,
            Err(_) => {
                log::debug!("Active call feed closed");
                self.calls = None;
                false
            }
        }
    }

    /// Tear down: stop listening for calls. The engine stays readable.
    pub fn stop(&mut self) {
        if self.calls.take().is_some() {
            log::info!("Room list session stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Room, RoomId, Tag};
    use crate::notify::ActiveCallFeed;

    fn recent(id: &str, ts: u64) -> RoomRef {
        Room::new(id, id).with_last_activity(ts).into_ref()
    }

    fn untagged(session: &RoomListSession) -> Vec<String> {
        session.algorithm().get_ordered_rooms()[&Tag::UNTAGGED]
            .iter()
            .map(|r| r.id.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_start_seeds_current_calls() {
        let _ = env_logger::builder().is_test(true).try_init();
        let feed = ActiveCallFeed::new();
        feed.call_started(RoomId::from("!b"));

        let session = RoomListSession::start(
            &EngineConfig::default(),
            vec![recent("!a", 20), recent("!b", 10)],
            Some(feed.subscribe()),
        )
        .unwrap();
        assert!(session.is_running());
        assert_eq!(untagged(&session), vec!["!b", "!a"]);
    }

    #[test]
    fn test_call_changes_apply_on_next_update() {
        let feed = ActiveCallFeed::new();
        let mut session = RoomListSession::start(
            &EngineConfig::default(),
            vec![recent("!a", 30), recent("!b", 20), recent("!e", 10)],
            Some(feed.subscribe()),
        )
        .unwrap();

        feed.call_started(RoomId::from("!e"));
        assert!(session.sync_active_calls());
        assert!(!session.sync_active_calls());
        assert_eq!(untagged(&session), vec!["!e", "!a", "!b"]);

        feed.call_ended(&RoomId::from("!e"));
        session
            .handle_room_update(recent("!b", 40), UpdateCause::Timeline)
            .unwrap();
        assert_eq!(untagged(&session), vec!["!b", "!a", "!e"]);
    }

    #[test]
    fn test_stop_ignores_further_calls() {
        let feed = ActiveCallFeed::new();
        let mut session = RoomListSession::start(
            &EngineConfig::default(),
            vec![recent("!a", 30), recent("!e", 10)],
            Some(feed.subscribe()),
        )
        .unwrap();

        session.stop();
        assert!(!session.is_running());

        feed.call_started(RoomId::from("!e"));
        assert!(!session.sync_active_calls());
        assert_eq!(untagged(&session), vec!["!a", "!e"]);
    }

    #[test]
    fn test_dropped_feed_detaches() {
        let feed = ActiveCallFeed::new();
        let mut session = RoomListSession::start(
            &EngineConfig::default(),
            vec![recent("!a", 30)],
            Some(feed.subscribe()),
        )
        .unwrap();

        drop(feed);
        assert!(!session.sync_active_calls());
        assert!(!session.is_running());
    }

    #[test]
    fn test_bad_config_fails_start() {
        let config = EngineConfig {
            tags: Default::default(),
        };
        assert!(matches!(
            RoomListSession::start(&config, vec![], None),
            Err(ConfigError::Algorithm(AlgorithmError::MissingFallbackTag(_)))
        ));
    }
}
