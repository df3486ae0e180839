/// Per-tag ordering — the authoritative ordered room list for one tag.
///
/// Every mutation is followed by a full re-sort with the tag's
/// [`SortAlgorithm`]. Tags are bounded by one account's room count, so the
/// extra comparisons never show up next to the cost of rendering the list.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::algorithms::limits::LARGE_TAG_ROOM_COUNT;
use crate::algorithms::sort::SortAlgorithm;
use crate::models::{RoomId, RoomRef, Tag, UpdateCause};

// ---------------------------------------------------------------------------
// Errors & outcomes
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error("Update cause {0} cannot be applied to a single tag")]
    InvalidUpdateCause(UpdateCause),
}

/// Non-fatal inconsistency found while applying an update. The update is
/// skipped; the engine stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyWarning {
    pub tag: Tag,
    pub room_id: RoomId,
    pub cause: UpdateCause,
    pub reason: &'static str,
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} in {}: {}",
            self.cause, self.room_id, self.tag, self.reason
        )
    }
}

/// What a single-tag update did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Room membership of the tag or the room-id order changed.
    Reordered,
    /// Same rooms in the same order, but an entry was swapped for a newer snapshot.
    Refreshed,
    /// Nothing changed.
    Unchanged,
    /// The update could not apply; nothing changed.
    Skipped(ConsistencyWarning),
}

impl UpdateOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, UpdateOutcome::Reordered | UpdateOutcome::Refreshed)
    }
}

// ---------------------------------------------------------------------------
// OrderingAlgorithm
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct OrderingAlgorithm {
    tag: Tag,
    sort: SortAlgorithm,
    rooms: Vec<RoomRef>,
}

impl OrderingAlgorithm {
    pub fn new(tag: Tag, sort: SortAlgorithm) -> Self {
        OrderingAlgorithm {
            tag,
            sort,
            rooms: Vec::new(),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn sort_algorithm(&self) -> SortAlgorithm {
        self.sort
    }

    /// Read-only view of the ordered list.
    pub fn ordered_rooms(&self) -> &[RoomRef] {
        &self.rooms
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.position(room_id).is_some()
    }

    /// Swap the comparator and re-sort what is already held.
    pub fn set_sort_algorithm(&mut self, sort: SortAlgorithm) {
        self.sort = sort;
        self.resort();
    }

    /// Replace the whole list and sort it. Later duplicates of a room id
    /// replace earlier ones.
    pub fn set_rooms(&mut self, rooms: Vec<RoomRef>) {
        self.rooms.clear();
        let mut seen: HashMap<RoomId, usize> = HashMap::with_capacity(rooms.len());
        for room in rooms {
            match seen.get(&room.id) {
                Some(&idx) => self.rooms[idx] = room,
                None => {
                    seen.insert(room.id.clone(), self.rooms.len());
                    self.rooms.push(room);
                }
            }
        }
        if self.rooms.len() > LARGE_TAG_ROOM_COUNT {
            log::debug!(
                "Tag {} holds {} rooms; every update re-sorts all of them",
                self.tag,
                self.rooms.len()
            );
        }
        self.resort();
    }

    /// Apply one incremental update.
    pub fn handle_room_update(
        &mut self,
        room: &RoomRef,
        cause: UpdateCause,
    ) -> Result<UpdateOutcome, OrderingError> {
        let before = self.id_sequence();

        match cause {
            UpdateCause::NewRoom => match self.position(&room.id) {
                Some(idx) => self.rooms[idx] = room.clone(),
                None => self.rooms.push(room.clone()),
            },
            UpdateCause::RoomRemoved => match self.position(&room.id) {
                Some(idx) => {
                    self.rooms.remove(idx);
                }
                None => return Ok(self.skip(room, cause, "room not present in tag")),
            },
            UpdateCause::RoomOrderInTagChange
            | UpdateCause::Timeline
            | UpdateCause::ReadReceipt => match self.position(&room.id) {
                Some(idx) => {
                    if Arc::ptr_eq(&self.rooms[idx], room) {
                        return Ok(UpdateOutcome::Unchanged);
                    }
                    self.rooms[idx] = room.clone();
                }
                None => return Ok(self.skip(room, cause, "room not present in tag")),
            },
            UpdateCause::PossibleTagChange => {
                return Err(OrderingError::InvalidUpdateCause(cause));
            }
        }

        self.resort();

        if self.id_sequence() != before {
            Ok(UpdateOutcome::Reordered)
        } else {
            Ok(UpdateOutcome::Refreshed)
        }
    }

    fn skip(&self, room: &RoomRef, cause: UpdateCause, reason: &'static str) -> UpdateOutcome {
        let warning = ConsistencyWarning {
            tag: self.tag.clone(),
            room_id: room.id.clone(),
            cause,
            reason,
        };
        log::warn!("Consistency warning: {}", warning);
        UpdateOutcome::Skipped(warning)
    }

    fn resort(&mut self) {
        self.sort.sort(&self.tag, &mut self.rooms);
    }

    fn position(&self, room_id: &RoomId) -> Option<usize> {
        self.rooms.iter().position(|r| &r.id == room_id)
    }

    fn id_sequence(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|r| r.id.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
