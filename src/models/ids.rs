/// Core identity types for the room list.
///
/// - `RoomId`: opaque, externally assigned room identifier
/// - `BuiltinTag`: the fixed, exhaustively matchable set of list sections
/// - `Tag`: either a built-in section or a user-defined tag id

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// Externally owned room identifier. Ordering is plain byte order of the id,
/// which is what every comparator falls back to for deterministic tie-breaks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        RoomId(s)
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// BuiltinTag
// ---------------------------------------------------------------------------

/// Fixed list sections. Discriminant order is the display order of sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BuiltinTag {
    Invite = 0,
    Favourite = 1,
    DM = 2,
    Untagged = 3,
    LowPriority = 4,
    ServerNotice = 5,
    Suggested = 6,
    SavedItems = 7,
    Archived = 8,
}

impl BuiltinTag {
    pub const ALL: [BuiltinTag; 9] = [
        BuiltinTag::Invite,
        BuiltinTag::Favourite,
        BuiltinTag::DM,
        BuiltinTag::Untagged,
        BuiltinTag::LowPriority,
        BuiltinTag::ServerNotice,
        BuiltinTag::Suggested,
        BuiltinTag::SavedItems,
        BuiltinTag::Archived,
    ];

    /// Wire name. Favourite, LowPriority and ServerNotice use the protocol's
    /// well-known account-data tag names; the rest are client-side sections.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinTag::Invite => "builtin.invite",
            BuiltinTag::Favourite => "m.favourite",
            BuiltinTag::DM => "builtin.direct",
            BuiltinTag::Untagged => "builtin.untagged",
            BuiltinTag::LowPriority => "m.lowpriority",
            BuiltinTag::ServerNotice => "m.server_notice",
            BuiltinTag::Suggested => "builtin.suggested",
            BuiltinTag::SavedItems => "builtin.saved_items",
            BuiltinTag::Archived => "builtin.archived",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BuiltinTag::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A list section a room can belong to.
///
/// Derived `Ord` puts every built-in tag (in discriminant order) before any
/// custom tag, so `BTreeMap<Tag, _>` iterates sections in a stable order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Builtin(BuiltinTag),
    Custom(String),
}

impl Tag {
    pub const INVITE: Tag = Tag::Builtin(BuiltinTag::Invite);
    pub const FAVOURITE: Tag = Tag::Builtin(BuiltinTag::Favourite);
    pub const DM: Tag = Tag::Builtin(BuiltinTag::DM);
    pub const UNTAGGED: Tag = Tag::Builtin(BuiltinTag::Untagged);
    pub const LOW_PRIORITY: Tag = Tag::Builtin(BuiltinTag::LowPriority);
    pub const SERVER_NOTICE: Tag = Tag::Builtin(BuiltinTag::ServerNotice);
    pub const SUGGESTED: Tag = Tag::Builtin(BuiltinTag::Suggested);
    pub const SAVED_ITEMS: Tag = Tag::Builtin(BuiltinTag::SavedItems);
    pub const ARCHIVED: Tag = Tag::Builtin(BuiltinTag::Archived);

    /// Parse a tag name. Known built-in names map to `Builtin`, anything else
    /// is a user-defined tag.
    pub fn parse(name: &str) -> Self {
        match BuiltinTag::from_name(name) {
            Some(builtin) => Tag::Builtin(builtin),
            None => Tag::Custom(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tag::Builtin(builtin) => builtin.as_str(),
            Tag::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Tag::Builtin(_))
    }
}

impl From<BuiltinTag> for Tag {
    fn from(builtin: BuiltinTag) -> Self {
        Tag::Builtin(builtin)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        match BuiltinTag::from_name(&name) {
            Some(builtin) => Tag::Builtin(builtin),
            None => Tag::Custom(name),
        }
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Builtin(builtin) => builtin.as_str().to_string(),
            Tag::Custom(name) => name,
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Builtin(builtin) => write!(f, "Tag({:?})", builtin),
            Tag::Custom(name) => write!(f, "Tag(custom:{})", name),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
