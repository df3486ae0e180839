/// List shaping on top of a tag's sort order.
///
/// A `ListAlgorithm` owns the tag's [`OrderingAlgorithm`] and derives a
/// visible order from it. Shaping never writes back into the wrapped
/// algorithm, so switching list orderings at runtime keeps the sort state.
///
/// - `Natural`: the wrapped order, untouched.
/// - `Importance`: stable-partitioned by notification level, most urgent first.
///
/// Independently of the ordering, a sticky room (the room the user has open)
/// is held at the visual index it had when it became sticky.
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::algorithms::sort::SortAlgorithm;
use crate::algorithms::tag_order::{OrderingAlgorithm, OrderingError, UpdateOutcome};
use crate::models::{RoomId, RoomRef, Tag, UpdateCause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListOrdering {
    #[default]
    Natural,
    Importance,
}

impl ListOrdering {
    pub fn from_string(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "NATURAL" => ListOrdering::Natural,
            "IMPORTANCE" => ListOrdering::Importance,
            _ => ListOrdering::Natural,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            ListOrdering::Natural => "NATURAL".to_string(),
            ListOrdering::Importance => "IMPORTANCE".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct StickyRoom {
    room_id: RoomId,
    index: usize,
}

#[derive(Clone, Debug)]
pub struct ListAlgorithm {
    ordering: ListOrdering,
    inner: OrderingAlgorithm,
    sticky: Option<StickyRoom>,
    view: Vec<RoomRef>,
}

impl ListAlgorithm {
    pub fn new(tag: Tag, sort: SortAlgorithm, ordering: ListOrdering) -> Self {
        ListAlgorithm {
            ordering,
            inner: OrderingAlgorithm::new(tag, sort),
            sticky: None,
            view: Vec::new(),
        }
    }

    pub fn tag(&self) -> &Tag {
        self.inner.tag()
    }

    pub fn list_ordering(&self) -> ListOrdering {
        self.ordering
    }

    pub fn sort_algorithm(&self) -> SortAlgorithm {
        self.inner.sort_algorithm()
    }

    /// The wrapped, authoritative sort order.
    pub fn inner(&self) -> &OrderingAlgorithm {
        &self.inner
    }

    /// The shaped order shown for this tag.
    pub fn ordered_rooms(&self) -> &[RoomRef] {
        &self.view
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.inner.contains(room_id)
    }

    pub fn set_list_ordering(&mut self, ordering: ListOrdering) {
        self.ordering = ordering;
        self.rebuild_view();
    }

    pub fn set_sort_algorithm(&mut self, sort: SortAlgorithm) {
        self.inner.set_sort_algorithm(sort);
        self.rebuild_view();
    }

    pub fn set_rooms(&mut self, rooms: Vec<RoomRef>) {
        self.inner.set_rooms(rooms);
        self.rebuild_view();
    }

    pub fn handle_room_update(
        &mut self,
        room: &RoomRef,
        cause: UpdateCause,
    ) -> Result<UpdateOutcome, OrderingError> {
        let outcome = self.inner.handle_room_update(room, cause)?;
        if outcome.is_change() {
            self.rebuild_view();
        }
        Ok(outcome)
    }

    /// Make `room_id` sticky at its current visual index, or clear stickiness.
    /// A room this tag does not hold clears any sticky entry.
    pub fn set_sticky_room(&mut self, room_id: Option<&RoomId>) {
        self.sticky = None;
        self.rebuild_view();

        if let Some(room_id) = room_id {
            if let Some(index) = self.view.iter().position(|r| &r.id == room_id) {
                self.sticky = Some(StickyRoom {
                    room_id: room_id.clone(),
                    index,
                });
            }
        }
    }

    pub fn sticky_room(&self) -> Option<&RoomId> {
        self.sticky.as_ref().map(|s| &s.room_id)
    }

    /// Visual index the sticky room is held at.
    pub fn sticky_index(&self) -> Option<usize> {
        self.sticky.as_ref().map(|s| s.index)
    }

    /// Hold `room_id` at a previously recorded index, e.g. when a tag's
    /// engine is rebuilt. The room need not be present yet.
    pub fn restore_sticky_room(&mut self, room_id: RoomId, index: usize) {
        self.sticky = Some(StickyRoom { room_id, index });
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        let mut view = self.inner.ordered_rooms().to_vec();

        if self.ordering == ListOrdering::Importance {
            // sort_by_key is stable, so rooms keep their sort order inside a level.
            view.sort_by_key(|room| Reverse(room.notification));
        }

        if let Some(sticky) = &self.sticky {
            if let Some(current) = view.iter().position(|r| r.id == sticky.room_id) {
                let room = view.remove(current);
                let index = sticky.index.min(view.len());
                view.insert(index, room);
            }
        }

        self.view = view;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
