//! # Room List Engine
//!
//! **Incremental tag partitioning and deterministic per-tag ordering for a
//! chat client's room list.**
//!
//! The engine takes a snapshot of the rooms an account can see, sorts them
//! into tags (Invites, Favourites, DMs, …) and keeps each tag ordered as
//! timeline events, read receipts, membership changes and manual drags
//! arrive one at a time.
//!
//! - **Deterministic order**: every comparator ends in a room-id tie-break
//! - **Exact manual keys**: arbitrary-precision decimal order keys, so
//!   repeated insertion between two rooms never loses precision
//! - **Presentation layers**: importance shaping, a sticky open room, and
//!   active-call pinning, none of which disturb the underlying sort
//! - **Change notifications** per tag over channels the host drains
//!
//! ## Quick Start
//!
//! ```rust
//! use roomlist::config::EngineConfig;
//! use roomlist::models::{Room, Tag, UpdateCause};
//! use roomlist::session::RoomListSession;
//!
//! let rooms = vec![
//!     Room::new("!a:example.org", "Alpha").with_last_activity(10).into_ref(),
//!     Room::new("!b:example.org", "Beta").with_last_activity(20).into_ref(),
//! ];
//! let mut session = RoomListSession::start(&EngineConfig::default(), rooms, None).unwrap();
//!
//! let bumped = Room::new("!a:example.org", "Alpha").with_last_activity(30).into_ref();
//! session.handle_room_update(bumped, UpdateCause::Timeline).unwrap();
//!
//! let untagged = &session.algorithm().get_ordered_rooms()[&Tag::UNTAGGED];
//! assert_eq!(untagged[0].id.as_str(), "!a:example.org");
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Room ids, tags, order keys, room snapshots, update causes |
//! | [`algorithms`] | Classification, sorting, per-tag lists, pinning, the orchestrator |
//! | [`notify`] | Tag change notifications and the active-call feed |
//! | [`config`] | JSON engine configuration |
//! | [`session`] | Engine lifecycle for one logged-in connection |

// Crate-level lint configuration: stylistic lints only.
#![allow(
    clippy::empty_line_after_doc_comments,
    clippy::doc_lazy_continuation,
    clippy::inherent_to_string,
    clippy::should_implement_trait
)]

// ── Public modules ──────────────────────────────────────────────────────────

/// Identity types, order keys and room snapshots.
pub mod models;

/// Tag classification, sort policies, per-tag lists and the orchestrator.
pub mod algorithms;

/// Outgoing tag change notifications and the incoming active-call feed.
pub mod notify;

/// Serde-backed engine configuration.
pub mod config;

/// Per-connection engine ownership.
pub mod session;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use algorithms::{
    Algorithm, AlgorithmError, ConsistencyWarning, EngineState, ListOrdering, OrderingError,
    SortAlgorithm, TagMap,
};
pub use config::{ConfigError, EngineConfig, TagConfig};
pub use models::{
    BuiltinTag, Membership, NotificationLevel, OrderKey, OrderKeyError, Room, RoomId, RoomRef, Tag,
    UpdateCause,
};
pub use notify::{ActiveCallFeed, SubscriptionId, TagChange};
pub use session::RoomListSession;

// ── Library metadata ────────────────────────────────────────────────────────

/// Room list engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the engine version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert!(version().contains('.'));
    }
}
