/// Room snapshots as seen by the ordering engine.
///
/// Rooms are owned by the host. The engine only holds `Arc<Room>` handles;
/// a host that observes a change builds a fresh snapshot and hands it over
/// together with an [`UpdateCause`]. A handle whose id is tracked but whose
/// pointer differs from the tracked one is a stale reference and gets
/// replaced.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::models::ids::{RoomId, Tag};
use crate::models::order_key::OrderKey;

/// Shared handle to a host-owned room snapshot.
pub type RoomRef = Arc<Room>;

// ---------------------------------------------------------------------------
// Membership, NotificationLevel
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Membership {
    Invite,
    #[default]
    Join,
    Leave,
    Ban,
}

/// Per-room unread state, most urgent first when sorted descending.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[repr(u8)]
pub enum NotificationLevel {
    #[default]
    None = 0,
    /// Unread activity that did not notify.
    Unread = 1,
    Notified = 2,
    /// Mentions and keyword highlights.
    Highlight = 3,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub membership: Membership,
    /// Explicit tags with their optional manual-order key.
    #[serde(default)]
    pub tags: BTreeMap<Tag, Option<OrderKey>>,
    /// Timestamp of the latest timeline event (ms since epoch).
    #[serde(default)]
    pub last_activity_ms: u64,
    /// Known 1:1 conversation.
    #[serde(default)]
    pub is_direct: bool,
    #[serde(default)]
    pub notification: NotificationLevel,
}

impl Room {
    /// A joined, untagged room with no activity.
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Room {
            id: id.into(),
            name: name.into(),
            membership: Membership::Join,
            tags: BTreeMap::new(),
            last_activity_ms: 0,
            is_direct: false,
            notification: NotificationLevel::None,
        }
    }

    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = membership;
        self
    }

    pub fn with_tag(mut self, tag: Tag, order: Option<OrderKey>) -> Self {
        self.tags.insert(tag, order);
        self
    }

    pub fn with_last_activity(mut self, ts_ms: u64) -> Self {
        self.last_activity_ms = ts_ms;
        self
    }

    pub fn with_direct(mut self, is_direct: bool) -> Self {
        self.is_direct = is_direct;
        self
    }

    pub fn with_notification(mut self, level: NotificationLevel) -> Self {
        self.notification = level;
        self
    }

    pub fn into_ref(self) -> RoomRef {
        Arc::new(self)
    }

    /// Manual-order key of this room inside `tag`, if it has one.
    pub fn order_in(&self, tag: &Tag) -> Option<&OrderKey> {
        self.tags.get(tag).and_then(|key| key.as_ref())
    }
}

// ---------------------------------------------------------------------------
// UpdateCause
// ---------------------------------------------------------------------------

/// Why an incremental update was raised for a room.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateCause {
    Timeline,
    ReadReceipt,
    NewRoom,
    RoomRemoved,
    RoomOrderInTagChange,
    PossibleTagChange,
}

impl UpdateCause {
    /// Causes that only move a room within the tags it already holds.
    pub fn is_activity(&self) -> bool {
        matches!(
            self,
            UpdateCause::Timeline | UpdateCause::ReadReceipt | UpdateCause::RoomOrderInTagChange
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateCause::Timeline => "Timeline",
            UpdateCause::ReadReceipt => "ReadReceipt",
            UpdateCause::NewRoom => "NewRoom",
            UpdateCause::RoomRemoved => "RoomRemoved",
            UpdateCause::RoomOrderInTagChange => "RoomOrderInTagChange",
            UpdateCause::PossibleTagChange => "PossibleTagChange",
        }
    }
}

impl fmt::Display for UpdateCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
