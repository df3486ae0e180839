/// Active-call pinning — a view transform over a tag's visible order.
///
/// Rooms hosting an ongoing call move to the front of the tag, keeping their
/// relative order; every other room keeps its relative order behind them.
/// The wrapped ordering state is never touched.
use std::collections::HashSet;

use crate::models::{RoomId, RoomRef};

pub type ActiveCallSet = HashSet<RoomId>;

/// Stable-partition `order` so rooms in `active_calls` come first.
pub fn pin_active_calls(order: &[RoomRef], active_calls: &ActiveCallSet) -> Vec<RoomRef> {
    if active_calls.is_empty() {
        return order.to_vec();
    }

    let (mut pinned, rest): (Vec<RoomRef>, Vec<RoomRef>) = order
        .iter()
        .cloned()
        .partition(|room| active_calls.contains(&room.id));
    pinned.extend(rest);
    pinned
}
