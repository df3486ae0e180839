/// Data model shared by every ordering component.
///
/// # Module structure
/// - `ids` — RoomId, BuiltinTag, Tag identity types
/// - `order_key` — exact decimal manual-order keys
/// - `room` — Room snapshots, membership, notification level, update causes
pub mod ids;
pub mod order_key;
pub mod room;

pub use ids::{BuiltinTag, RoomId, Tag};
pub use order_key::{OrderKey, OrderKeyError};
pub use room::{Membership, NotificationLevel, Room, RoomRef, UpdateCause};
