/// Room list orchestrator — the single entry point for ordering state.
///
/// `Algorithm` owns one [`ListAlgorithm`] per configured tag, the
/// externally visible `cached_rooms` (tag → ordered rooms, after active-call
/// pinning), the reverse index room id → tags, and the full list of known
/// rooms. Every full resync flows through `set_known_rooms` and every
/// incremental change through `handle_room_update`.
///
/// **Consistency guarantee:** after every mutation the reverse index is the
/// exact inverse of `cached_rooms`, every known room sits in at least one
/// tag, and no tag lists a room twice. `set_known_rooms(same rooms)` is
/// idempotent and yields the same `snapshot_hash`.
///
/// State machine: `Uninitialized` → `Populated` (after `populate_tags`) →
/// `Ready` (after the first `set_known_rooms`). Incremental updates are only
/// accepted when `Ready`.
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::algorithms::classifier;
use crate::algorithms::limits::{
    check_key_precision, KeyPrecisionStatus, MAX_PENDING_WARNINGS, RENUMBER_STEP,
};
use crate::algorithms::list::{ListAlgorithm, ListOrdering};
use crate::algorithms::pinning::{pin_active_calls, ActiveCallSet};
use crate::algorithms::sort::SortAlgorithm;
use crate::algorithms::tag_order::{ConsistencyWarning, OrderingError, UpdateOutcome};
use crate::models::{OrderKey, Room, RoomId, RoomRef, Tag, UpdateCause};
use crate::notify::{SubscriptionId, TagChange, TagChangeNotifier};

// ---------------------------------------------------------------------------
// Errors & types
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("Sort and list configuration disagree (only sorted: {only_sorted:?}, only listed: {only_listed:?})")]
    ConfigMismatch {
        only_sorted: Vec<Tag>,
        only_listed: Vec<Tag>,
    },

    #[error("Fallback tag {0} is not configured")]
    MissingFallbackTag(Tag),

    #[error("Engine not ready (state: {0:?})")]
    NotReady(EngineState),

    #[error("Unknown tag: {0}")]
    UnknownTag(Tag),

    #[error("Tag {0} is not manually sorted")]
    NotManuallySorted(Tag),

    #[error("Room {room_id} is not in tag {tag}")]
    RoomNotInTag { tag: Tag, room_id: RoomId },

    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Uninitialized,
    Populated,
    Ready,
}

/// Tag → rooms in display order.
pub type TagMap = BTreeMap<Tag, Vec<RoomRef>>;

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Algorithm {
    state: EngineState,
    sorting: BTreeMap<Tag, SortAlgorithm>,
    list_orderings: BTreeMap<Tag, ListOrdering>,
    engines: BTreeMap<Tag, ListAlgorithm>,
    cached_rooms: TagMap,
    room_id_to_tags: HashMap<RoomId, BTreeSet<Tag>>,
    known_rooms: Vec<RoomRef>,
    active_calls: ActiveCallSet,
    sticky_room: Option<RoomId>,
    notifier: TagChangeNotifier,
    /// Skipped per-room updates, oldest first. Bounded by
    /// `MAX_PENDING_WARNINGS`; the host drains it with `take_warnings`.
    warnings: VecDeque<ConsistencyWarning>,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm {
    pub fn new() -> Self {
        Algorithm {
            state: EngineState::Uninitialized,
            sorting: BTreeMap::new(),
            list_orderings: BTreeMap::new(),
            engines: BTreeMap::new(),
            cached_rooms: TagMap::new(),
            room_id_to_tags: HashMap::new(),
            known_rooms: Vec::new(),
            active_calls: ActiveCallSet::new(),
            sticky_room: None,
            notifier: TagChangeNotifier::new(),
            warnings: VecDeque::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// (Re)build one engine per tag.
    ///
    /// Both maps must name the same tags and must include Untagged, the
    /// fallback every room can land in. On an engine that is already `Ready`
    /// the previously known rooms are replayed through `set_known_rooms`.
    pub fn populate_tags(
        &mut self,
        sort_map: BTreeMap<Tag, SortAlgorithm>,
        list_map: BTreeMap<Tag, ListOrdering>,
    ) -> Result<(), AlgorithmError> {
        let only_sorted: Vec<Tag> = sort_map
            .keys()
            .filter(|tag| !list_map.contains_key(*tag))
            .cloned()
            .collect();
        let only_listed: Vec<Tag> = list_map
            .keys()
            .filter(|tag| !sort_map.contains_key(*tag))
            .cloned()
            .collect();
        if !only_sorted.is_empty() || !only_listed.is_empty() {
            return Err(AlgorithmError::ConfigMismatch {
                only_sorted,
                only_listed,
            });
        }
        if !sort_map.contains_key(&Tag::UNTAGGED) {
            return Err(AlgorithmError::MissingFallbackTag(Tag::UNTAGGED));
        }

        // Rebuilt engines keep the index their tag's sticky room is held at.
        let held: BTreeMap<Tag, (RoomId, usize)> = self
            .engines
            .iter()
            .filter_map(|(tag, engine)| {
                let room_id = engine.sticky_room()?.clone();
                let index = engine.sticky_index()?;
                Some((tag.clone(), (room_id, index)))
            })
            .collect();

        self.engines = sort_map
            .iter()
            .map(|(tag, sort)| {
                let ordering = list_map.get(tag).copied().unwrap_or_default();
                let mut engine = ListAlgorithm::new(tag.clone(), *sort, ordering);
                if let Some((room_id, index)) = held.get(tag) {
                    engine.restore_sticky_room(room_id.clone(), *index);
                }
                (tag.clone(), engine)
            })
            .collect();
        self.sorting = sort_map;
        self.list_orderings = list_map;

        log::debug!(
            "Populated {} tag engines (state was {:?})",
            self.engines.len(),
            self.state
        );

        if self.state == EngineState::Ready {
            let rooms = std::mem::take(&mut self.known_rooms);
            self.set_known_rooms(rooms)?;
        } else {
            self.cached_rooms.clear();
            self.room_id_to_tags.clear();
            self.state = EngineState::Populated;
        }
        Ok(())
    }

    /// Full resync from a complete room snapshot.
    ///
    /// Later duplicates of a room id replace earlier ones. Tags whose
    /// visible order changed are notified.
    pub fn set_known_rooms(&mut self, rooms: Vec<RoomRef>) -> Result<(), AlgorithmError> {
        if self.state == EngineState::Uninitialized {
            return Err(AlgorithmError::NotReady(self.state));
        }

        let mut known: Vec<RoomRef> = Vec::with_capacity(rooms.len());
        let mut positions: HashMap<RoomId, usize> = HashMap::with_capacity(rooms.len());
        for room in rooms {
            match positions.get(&room.id) {
                Some(&idx) => known[idx] = room,
                None => {
                    positions.insert(room.id.clone(), known.len());
                    known.push(room);
                }
            }
        }

        let mut buckets: BTreeMap<Tag, Vec<RoomRef>> = self
            .engines
            .keys()
            .map(|tag| (tag.clone(), Vec::new()))
            .collect();
        let mut index: HashMap<RoomId, BTreeSet<Tag>> = HashMap::with_capacity(known.len());
        for room in &known {
            let tags = self.get_tags_for_room(room);
            for tag in &tags {
                if let Some(bucket) = buckets.get_mut(tag) {
                    bucket.push(room.clone());
                }
            }
            index.insert(room.id.clone(), tags);
        }

        for (tag, engine) in self.engines.iter_mut() {
            engine.set_rooms(buckets.remove(tag).unwrap_or_default());
            if engine.sticky_room() != self.sticky_room.as_ref() {
                engine.set_sticky_room(self.sticky_room.as_ref());
            }
        }

        self.room_id_to_tags = index;
        self.known_rooms = known;
        self.state = EngineState::Ready;
        self.refresh_all();

        log::debug!(
            "Resynced {} rooms across {} tags",
            self.known_rooms.len(),
            self.engines.len()
        );
        debug_assert!(self.index_is_consistent());
        Ok(())
    }

    /// Current classification of `room`, restricted to configured tags.
    ///
    /// Never empty: falls back to DM for direct rooms when DM is configured,
    /// else Untagged.
    pub fn get_tags_for_room(&self, room: &Room) -> BTreeSet<Tag> {
        let mut tags: BTreeSet<Tag> = classifier::tags_for_room(room)
            .into_iter()
            .filter(|tag| self.engines.contains_key(tag))
            .collect();

        if tags.is_empty() {
            let fallback = classifier::fallback_tag(room);
            if self.engines.contains_key(&fallback) {
                tags.insert(fallback);
            } else {
                tags.insert(Tag::UNTAGGED);
            }
        }
        tags
    }

    /// Apply one incremental update. Returns `Ok(true)` if any tag's visible
    /// order changed (and a notification went out).
    pub fn handle_room_update(
        &mut self,
        room: RoomRef,
        cause: UpdateCause,
    ) -> Result<bool, AlgorithmError> {
        if self.state != EngineState::Ready {
            return Err(AlgorithmError::NotReady(self.state));
        }

        let indexed = self.room_id_to_tags.contains_key(&room.id);
        let mut cause = cause;

        // A room we already place is not new; re-derive its tags instead.
        if cause == UpdateCause::NewRoom && indexed {
            log::debug!("NewRoom for indexed room {}, treating as tag change", room.id);
            cause = UpdateCause::PossibleTagChange;
        }

        // Placing a room needs its full state; activity alone is not enough.
        if cause.is_activity() && !indexed {
            log::debug!("Dropping {} for unplaced room {}", cause, room.id);
            return Ok(false);
        }

        let changed = match cause {
            UpdateCause::NewRoom => {
                self.track_known(&room);
                let tags = self.get_tags_for_room(&room);
                self.room_id_to_tags.insert(room.id.clone(), tags.clone());
                self.apply_to_tags(&tags, &room, UpdateCause::NewRoom)?
            }
            UpdateCause::PossibleTagChange => {
                self.track_known(&room);
                self.apply_tag_change(&room)?
            }
            UpdateCause::RoomRemoved => self.remove_room(&room)?,
            UpdateCause::Timeline | UpdateCause::ReadReceipt | UpdateCause::RoomOrderInTagChange => {
                self.track_known(&room);
                let tags = self.room_tags(&room.id);
                self.apply_to_tags(&tags, &room, cause)?
            }
        };

        debug_assert!(self.index_is_consistent());
        Ok(changed)
    }

    /// Current snapshot of every tag's visible order.
    pub fn get_ordered_rooms(&self) -> &TagMap {
        &self.cached_rooms
    }

    pub fn ordered_room_ids(&self) -> BTreeMap<Tag, Vec<RoomId>> {
        self.cached_rooms
            .iter()
            .map(|(tag, rooms)| (tag.clone(), rooms.iter().map(|r| r.id.clone()).collect()))
            .collect()
    }

    pub fn tags_of(&self, room_id: &RoomId) -> Option<&BTreeSet<Tag>> {
        self.room_id_to_tags.get(room_id)
    }

    pub fn known_rooms(&self) -> &[RoomRef] {
        &self.known_rooms
    }

    // -----------------------------------------------------------------------
    // Runtime reconfiguration
    // -----------------------------------------------------------------------

    pub fn get_tag_sorting(&self, tag: &Tag) -> Result<SortAlgorithm, AlgorithmError> {
        self.sorting
            .get(tag)
            .copied()
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))
    }

    /// Swap a tag's comparator and re-derive its order from current membership.
    pub fn set_tag_sorting(&mut self, tag: &Tag, sort: SortAlgorithm) -> Result<(), AlgorithmError> {
        let engine = self
            .engines
            .get_mut(tag)
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))?;
        engine.set_sort_algorithm(sort);
        self.sorting.insert(tag.clone(), sort);
        log::info!("Tag {} now sorted {}", tag, sort.to_string());
        self.refresh_tag(tag);
        Ok(())
    }

    pub fn get_list_ordering(&self, tag: &Tag) -> Result<ListOrdering, AlgorithmError> {
        self.list_orderings
            .get(tag)
            .copied()
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))
    }

    pub fn set_list_ordering(
        &mut self,
        tag: &Tag,
        ordering: ListOrdering,
    ) -> Result<(), AlgorithmError> {
        let engine = self
            .engines
            .get_mut(tag)
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))?;
        engine.set_list_ordering(ordering);
        self.list_orderings.insert(tag.clone(), ordering);
        log::info!("Tag {} now listed {}", tag, ordering.to_string());
        self.refresh_tag(tag);
        Ok(())
    }

    /// Replace the active-call set and re-pin every tag. Returns true if any
    /// tag's visible order changed.
    pub fn set_active_calls(&mut self, calls: ActiveCallSet) -> bool {
        if calls == self.active_calls {
            return false;
        }
        log::debug!("Active calls changed ({} rooms)", calls.len());
        self.active_calls = calls;
        self.refresh_all()
    }

    pub fn active_calls(&self) -> &ActiveCallSet {
        &self.active_calls
    }

    /// Hold `room_id` at its current visual index in every tag holding it,
    /// or release the held room with `None`.
    pub fn set_sticky_room(&mut self, room_id: Option<RoomId>) -> bool {
        if room_id == self.sticky_room {
            return false;
        }
        for engine in self.engines.values_mut() {
            engine.set_sticky_room(room_id.as_ref());
        }
        self.sticky_room = room_id;
        self.refresh_all()
    }

    pub fn sticky_room(&self) -> Option<&RoomId> {
        self.sticky_room.as_ref()
    }

    // -----------------------------------------------------------------------
    // Manual ordering
    // -----------------------------------------------------------------------

    /// Order key that moves `room_id` to `target_index` of a manually sorted
    /// tag. The host stores the key and reports `RoomOrderInTagChange`.
    ///
    /// The index counts the tag's sort order without the moved room, not the
    /// shaped or pinned list. Unkeyed rooms always sort after keyed ones, so a
    /// target inside that unkeyed tail yields the key right after the last
    /// keyed room. Call `renumber_manual_order` first to key every room.
    pub fn compute_manual_order(
        &self,
        tag: &Tag,
        room_id: &RoomId,
        target_index: usize,
    ) -> Result<OrderKey, AlgorithmError> {
        let engine = self.manual_engine(tag)?;
        let order = engine.inner().ordered_rooms();
        if !order.iter().any(|r| &r.id == room_id) {
            return Err(AlgorithmError::RoomNotInTag {
                tag: tag.clone(),
                room_id: room_id.clone(),
            });
        }

        // Keyed rooms always sort ahead of unkeyed ones.
        let keyed: Vec<&OrderKey> = order
            .iter()
            .filter(|r| &r.id != room_id)
            .filter_map(|r| r.order_in(tag))
            .collect();
        let idx = target_index.min(keyed.len());
        let prev = idx.checked_sub(1).map(|i| keyed[i]);
        let next = keyed.get(idx).copied();

        let key = OrderKey::between(prev, next);
        if check_key_precision(&key) == KeyPrecisionStatus::NeedsRenumbering {
            log::warn!(
                "Order key for {} in {} has {} fractional digits; renumber the tag",
                room_id,
                tag,
                key.scale()
            );
        }
        Ok(key)
    }

    /// Fresh evenly spaced keys for every room of a manual tag, in current
    /// order, for the host to persist.
    pub fn renumber_manual_order(
        &self,
        tag: &Tag,
    ) -> Result<Vec<(RoomId, OrderKey)>, AlgorithmError> {
        let engine = self.manual_engine(tag)?;
        Ok(engine
            .inner()
            .ordered_rooms()
            .iter()
            .enumerate()
            .map(|(i, room)| {
                let key = OrderKey::from_int((i as i64 + 1) * RENUMBER_STEP);
                (room.id.clone(), key)
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Notifications & diagnostics
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<TagChange>) {
        self.notifier.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn take_warnings(&mut self) -> Vec<ConsistencyWarning> {
        self.warnings.drain(..).collect()
    }

    /// Deterministic hash of the visible ordering.
    ///
    /// Hashes tags in canonical BTreeMap order and, per tag, each room's id,
    /// name, activity and order key in display order. Two engines showing the
    /// same lists produce the same hash.
    pub fn snapshot_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();

        for (tag, rooms) in &self.cached_rooms {
            hasher.update(b"T");
            hash_str(&mut hasher, tag.as_str());
            hasher.update(&(rooms.len() as u64).to_le_bytes());
            for room in rooms {
                hash_str(&mut hasher, room.id.as_str());
                hash_str(&mut hasher, &room.name);
                hasher.update(&room.last_activity_ms.to_le_bytes());
                hasher.update(&[room.notification as u8]);
                match room.order_in(tag) {
                    Some(key) => hash_str(&mut hasher, &key.to_string()),
                    None => {
                        hasher.update(b"-");
                    }
                }
            }
        }

        *hasher.finalize().as_bytes()
    }

    pub fn snapshot_hash_hex(&self) -> String {
        hex::encode(self.snapshot_hash())
    }

    /// True when the reverse index is the exact inverse of the cached lists
    /// and no tag lists a room twice.
    pub fn index_is_consistent(&self) -> bool {
        let mut derived: HashMap<&RoomId, BTreeSet<&Tag>> = HashMap::new();
        for (tag, rooms) in &self.cached_rooms {
            let mut seen = HashSet::with_capacity(rooms.len());
            for room in rooms {
                if !seen.insert(&room.id) {
                    return false;
                }
                derived.entry(&room.id).or_default().insert(tag);
            }
        }

        derived.len() == self.room_id_to_tags.len()
            && self.room_id_to_tags.iter().all(|(id, tags)| {
                derived
                    .get(id)
                    .map(|found| found.len() == tags.len() && tags.iter().all(|t| found.contains(t)))
                    .unwrap_or(false)
            })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Re-derive tags for an already tracked room and move it between engines.
    fn apply_tag_change(&mut self, room: &RoomRef) -> Result<bool, AlgorithmError> {
        let new_tags = self.get_tags_for_room(room);
        let old_tags = self.room_tags(&room.id);

        if new_tags != old_tags {
            let removed: BTreeSet<Tag> = old_tags.difference(&new_tags).cloned().collect();
            let added: BTreeSet<Tag> = new_tags.difference(&old_tags).cloned().collect();
            log::debug!(
                "Room {} tags changed: -{:?} +{:?}",
                room.id,
                removed,
                added
            );

            let mut changed = self.apply_to_tags(&removed, room, UpdateCause::RoomRemoved)?;
            changed |= self.apply_to_tags(&added, room, UpdateCause::NewRoom)?;
            self.room_id_to_tags.insert(room.id.clone(), new_tags.clone());

            // One more pass so tags the room stayed in pick up the new snapshot.
            changed |= self.apply_to_tags(&new_tags, room, UpdateCause::Timeline)?;
            return Ok(changed);
        }

        let manual: BTreeSet<Tag> = new_tags
            .into_iter()
            .filter(|tag| self.sorting.get(tag) == Some(&SortAlgorithm::Manual))
            .collect();
        if manual.is_empty() {
            return Ok(false);
        }
        self.apply_to_tags(&manual, room, UpdateCause::RoomOrderInTagChange)
    }

    fn remove_room(&mut self, room: &RoomRef) -> Result<bool, AlgorithmError> {
        let tags = match self.room_id_to_tags.remove(&room.id) {
            Some(tags) => tags,
            None => {
                log::debug!("RoomRemoved for unplaced room {}", room.id);
                return Ok(false);
            }
        };

        let changed = self.apply_to_tags(&tags, room, UpdateCause::RoomRemoved)?;
        self.known_rooms.retain(|r| r.id != room.id);
        Ok(changed)
    }

    fn apply_to_tags(
        &mut self,
        tags: &BTreeSet<Tag>,
        room: &RoomRef,
        cause: UpdateCause,
    ) -> Result<bool, AlgorithmError> {
        let mut changed = false;
        for tag in tags {
            changed |= self.apply_to_tag(tag, room, cause)?;
        }
        Ok(changed)
    }

    fn apply_to_tag(
        &mut self,
        tag: &Tag,
        room: &RoomRef,
        cause: UpdateCause,
    ) -> Result<bool, AlgorithmError> {
        let engine = self
            .engines
            .get_mut(tag)
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))?;
        let outcome = engine.handle_room_update(room, cause)?;

        if cause == UpdateCause::NewRoom
            && self.sticky_room.as_ref() == Some(&room.id)
            && engine.sticky_room().is_none()
        {
            engine.set_sticky_room(Some(&room.id));
        }

        match outcome {
            UpdateOutcome::Reordered | UpdateOutcome::Refreshed => Ok(self.refresh_tag(tag)),
            UpdateOutcome::Unchanged => Ok(false),
            UpdateOutcome::Skipped(warning) => {
                self.record_warning(warning);
                Ok(false)
            }
        }
    }

    /// Re-pin one tag into `cached_rooms` and notify if its order moved.
    fn refresh_tag(&mut self, tag: &Tag) -> bool {
        let pinned = match self.engines.get(tag) {
            Some(engine) => pin_active_calls(engine.ordered_rooms(), &self.active_calls),
            None => return false,
        };
        let previous = self.cached_rooms.insert(tag.clone(), pinned).unwrap_or_default();
        let current = self.cached_rooms.get(tag).map(Vec::as_slice).unwrap_or(&[]);

        match classify_change(&previous, current) {
            Some(structural) => {
                self.notifier.emit(TagChange {
                    tag: tag.clone(),
                    structural,
                });
                true
            }
            None => false,
        }
    }

    fn refresh_all(&mut self) -> bool {
        let mut changed = false;

        let dropped: Vec<Tag> = self
            .cached_rooms
            .keys()
            .filter(|tag| !self.engines.contains_key(*tag))
            .cloned()
            .collect();
        for tag in dropped {
            self.cached_rooms.remove(&tag);
            self.notifier.emit(TagChange {
                tag,
                structural: true,
            });
            changed = true;
        }

        let tags: Vec<Tag> = self.engines.keys().cloned().collect();
        for tag in &tags {
            changed |= self.refresh_tag(tag);
        }
        changed
    }

    fn record_warning(&mut self, warning: ConsistencyWarning) {
        if self.warnings.len() >= MAX_PENDING_WARNINGS {
            self.warnings.pop_front();
        }
        self.warnings.push_back(warning);
    }

    fn track_known(&mut self, room: &RoomRef) {
        match self.known_rooms.iter_mut().find(|r| r.id == room.id) {
            Some(tracked) => {
                if !Arc::ptr_eq(tracked, room) {
                    *tracked = room.clone();
                }
            }
            None => self.known_rooms.push(room.clone()),
        }
    }

    fn room_tags(&self, room_id: &RoomId) -> BTreeSet<Tag> {
        self.room_id_to_tags.get(room_id).cloned().unwrap_or_default()
    }

    fn manual_engine(&self, tag: &Tag) -> Result<&ListAlgorithm, AlgorithmError> {
        let engine = self
            .engines
            .get(tag)
            .ok_or_else(|| AlgorithmError::UnknownTag(tag.clone()))?;
        if engine.sort_algorithm() != SortAlgorithm::Manual {
            return Err(AlgorithmError::NotManuallySorted(tag.clone()));
        }
        Ok(engine)
    }
}

/// `Some(true)` if the id sequence changed, `Some(false)` if only snapshots
/// were swapped, `None` if nothing changed.
fn classify_change(before: &[RoomRef], after: &[RoomRef]) -> Option<bool> {
    if before.len() != after.len() || before.iter().zip(after).any(|(a, b)| a.id != b.id) {
        return Some(true);
    }
    if before.iter().zip(after).any(|(a, b)| !Arc::ptr_eq(a, b)) {
        return Some(false);
    }
    None
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::sort::compare_names;
    use crate::models::{Membership, NotificationLevel};
    use std::cmp::Ordering;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn configured(tags: &[(Tag, SortAlgorithm)]) -> Algorithm {
        init_logging();
        let sort_map: BTreeMap<Tag, SortAlgorithm> = tags.iter().cloned().collect();
        let list_map = sort_map
            .keys()
            .map(|tag| (tag.clone(), ListOrdering::Natural))
            .collect();
        let mut algo = Algorithm::new();
        algo.populate_tags(sort_map, list_map).unwrap();
        algo
    }

    fn standard() -> Algorithm {
        configured(&[
            (Tag::INVITE, SortAlgorithm::Recent),
            (Tag::FAVOURITE, SortAlgorithm::Manual),
            (Tag::DM, SortAlgorithm::Recent),
            (Tag::UNTAGGED, SortAlgorithm::Recent),
            (Tag::ARCHIVED, SortAlgorithm::Recent),
        ])
    }

    fn recent(id: &str, ts: u64) -> RoomRef {
        Room::new(id, id).with_last_activity(ts).into_ref()
    }

    fn favourite(id: &str, key: &str) -> RoomRef {
        Room::new(id, id)
            .with_tag(Tag::FAVOURITE, Some(OrderKey::parse(key).unwrap()))
            .into_ref()
    }

    fn ids(algo: &Algorithm, tag: &Tag) -> Vec<String> {
        algo.get_ordered_rooms()
            .get(tag)
            .map(|rooms| rooms.iter().map(|r| r.id.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    fn assert_invariants(algo: &Algorithm) {
        assert!(algo.index_is_consistent());
        for room in algo.known_rooms() {
            let placed = algo
                .get_ordered_rooms()
                .values()
                .any(|rooms| rooms.iter().any(|r| r.id == room.id));
            assert!(placed, "{} is known but not placed", room.id);
        }
    }

    // -------------------------------------------------------------------
    // Lifecycle & configuration
    // -------------------------------------------------------------------

    #[test]
    fn test_state_machine() {
        init_logging();
        let mut algo = Algorithm::new();
        assert_eq!(algo.state(), EngineState::Uninitialized);
        assert_eq!(
            algo.set_known_rooms(vec![]).unwrap_err(),
            AlgorithmError::NotReady(EngineState::Uninitialized)
        );
        assert_eq!(
            algo.handle_room_update(recent("!a", 1), UpdateCause::Timeline)
                .unwrap_err(),
            AlgorithmError::NotReady(EngineState::Uninitialized)
        );

        let mut algo = standard();
        assert_eq!(algo.state(), EngineState::Populated);
        assert_eq!(
            algo.handle_room_update(recent("!a", 1), UpdateCause::NewRoom)
                .unwrap_err(),
            AlgorithmError::NotReady(EngineState::Populated)
        );

        algo.set_known_rooms(vec![]).unwrap();
        assert_eq!(algo.state(), EngineState::Ready);
    }

    #[test]
    fn test_config_mismatch() {
        let mut algo = Algorithm::new();
        let sort_map: BTreeMap<Tag, SortAlgorithm> = [
            (Tag::UNTAGGED, SortAlgorithm::Recent),
            (Tag::FAVOURITE, SortAlgorithm::Manual),
        ]
        .into_iter()
        .collect();
        let list_map: BTreeMap<Tag, ListOrdering> = [
            (Tag::UNTAGGED, ListOrdering::Natural),
            (Tag::DM, ListOrdering::Natural),
        ]
        .into_iter()
        .collect();

        let err = algo.populate_tags(sort_map, list_map).unwrap_err();
        assert_eq!(
            err,
            AlgorithmError::ConfigMismatch {
                only_sorted: vec![Tag::FAVOURITE],
                only_listed: vec![Tag::DM],
            }
        );
        assert_eq!(algo.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_untagged_must_be_configured() {
        let mut algo = Algorithm::new();
        let sort_map = [(Tag::FAVOURITE, SortAlgorithm::Manual)].into_iter().collect();
        let list_map = [(Tag::FAVOURITE, ListOrdering::Natural)].into_iter().collect();
        assert_eq!(
            algo.populate_tags(sort_map, list_map).unwrap_err(),
            AlgorithmError::MissingFallbackTag(Tag::UNTAGGED)
        );
    }

    #[test]
    fn test_unknown_tag() {
        let mut algo = standard();
        let work = Tag::parse("u.work");
        assert_eq!(
            algo.get_tag_sorting(&work).unwrap_err(),
            AlgorithmError::UnknownTag(work.clone())
        );
        assert_eq!(
            algo.set_list_ordering(&work, ListOrdering::Importance)
                .unwrap_err(),
            AlgorithmError::UnknownTag(work)
        );
    }

    #[test]
    fn test_repopulate_is_idempotent_with_sticky_room() {
        init_logging();
        let sort_map: BTreeMap<Tag, SortAlgorithm> = [
            (Tag::UNTAGGED, SortAlgorithm::Recent),
            (Tag::FAVOURITE, SortAlgorithm::Manual),
        ]
        .into_iter()
        .collect();
        let list_map: BTreeMap<Tag, ListOrdering> = sort_map
            .keys()
            .map(|t| (t.clone(), ListOrdering::Natural))
            .collect();

        let mut algo = Algorithm::new();
        algo.populate_tags(sort_map.clone(), list_map.clone()).unwrap();
        algo.set_known_rooms(vec![recent("!a", 30), recent("!b", 20), recent("!c", 10)])
            .unwrap();
        algo.set_sticky_room(Some(RoomId::from("!b")));
        algo.handle_room_update(recent("!b", 1), UpdateCause::Timeline)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!b", "!c"]);
        let before = algo.snapshot_hash();

        let (_, mut rx) = algo.subscribe();
        algo.populate_tags(sort_map.clone(), list_map.clone()).unwrap();
        algo.populate_tags(sort_map, list_map).unwrap();

        assert_eq!(algo.snapshot_hash(), before);
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!b", "!c"]);
        assert_eq!(algo.sticky_room(), Some(&RoomId::from("!b")));
        assert!(rx.try_recv().is_err());
        assert_invariants(&algo);
    }

    #[test]
    fn test_repopulate_replays_known_rooms() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), favourite("!f", "1")])
            .unwrap();

        let sort_map: BTreeMap<Tag, SortAlgorithm> = [
            (Tag::UNTAGGED, SortAlgorithm::Alphabetical),
            (Tag::FAVOURITE, SortAlgorithm::Recent),
        ]
        .into_iter()
        .collect();
        let list_map = sort_map
            .keys()
            .map(|t| (t.clone(), ListOrdering::Natural))
            .collect();
        algo.populate_tags(sort_map, list_map).unwrap();

        assert_eq!(algo.state(), EngineState::Ready);
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a"]);
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!f"]);
        assert!(!algo.get_ordered_rooms().contains_key(&Tag::DM));
        assert_invariants(&algo);
    }

    // -------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------

    #[test]
    fn test_resync_orders_untagged_by_recency() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), recent("!b", 20)])
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!b", "!a"]);
        assert_invariants(&algo);
    }

    #[test]
    fn test_timeline_moves_room_up() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), recent("!b", 20)])
            .unwrap();

        let changed = algo
            .handle_room_update(recent("!a", 30), UpdateCause::Timeline)
            .unwrap();
        assert!(changed);
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!b"]);
        assert_eq!(algo.known_rooms().len(), 2);
        assert_invariants(&algo);
    }

    #[test]
    fn test_manual_drag_to_front() {
        let mut algo = standard();
        algo.set_known_rooms(vec![favourite("!a", "10"), favourite("!c", "50")])
            .unwrap();
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!a", "!c"]);

        let key = algo
            .compute_manual_order(&Tag::FAVOURITE, &RoomId::from("!c"), 0)
            .unwrap();
        assert_eq!(key.to_string(), "5");

        let changed = algo
            .handle_room_update(favourite("!c", "5"), UpdateCause::RoomOrderInTagChange)
            .unwrap();
        assert!(changed);
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!c", "!a"]);
    }

    #[test]
    fn test_invite_accepted_moves_to_untagged() {
        let mut algo = standard();
        let invited = Room::new("!d", "d")
            .with_membership(Membership::Invite)
            .with_last_activity(5)
            .into_ref();
        algo.set_known_rooms(vec![recent("!a", 10), invited]).unwrap();
        assert_eq!(ids(&algo, &Tag::INVITE), vec!["!d"]);

        let joined = recent("!d", 5);
        let changed = algo
            .handle_room_update(joined, UpdateCause::PossibleTagChange)
            .unwrap();
        assert!(changed);

        assert!(ids(&algo, &Tag::INVITE).is_empty());
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!d"]);
        let tags = algo.tags_of(&RoomId::from("!d")).unwrap();
        assert!(!tags.contains(&Tag::INVITE));
        assert!(tags.contains(&Tag::UNTAGGED));
        assert_invariants(&algo);
    }

    #[test]
    fn test_direct_invite_accepted_moves_to_dm() {
        let mut algo = standard();
        let invited = Room::new("!d", "d")
            .with_membership(Membership::Invite)
            .with_direct(true)
            .into_ref();
        algo.set_known_rooms(vec![invited]).unwrap();

        let joined = Room::new("!d", "d").with_direct(true).into_ref();
        algo.handle_room_update(joined, UpdateCause::NewRoom).unwrap();

        assert_eq!(ids(&algo, &Tag::DM), vec!["!d"]);
        assert!(ids(&algo, &Tag::INVITE).is_empty());
        assert_invariants(&algo);
    }

    #[test]
    fn test_active_call_pins_room() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 30), recent("!b", 20), recent("!e", 10)])
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!b", "!e"]);

        let calls: ActiveCallSet = [RoomId::from("!e")].into_iter().collect();
        assert!(algo.set_active_calls(calls.clone()));
        assert!(!algo.set_active_calls(calls));
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!e", "!a", "!b"]);

        // Pinning survives incremental updates.
        algo.handle_room_update(recent("!b", 40), UpdateCause::Timeline)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!e", "!b", "!a"]);

        assert!(algo.set_active_calls(ActiveCallSet::new()));
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!b", "!a", "!e"]);
        assert_invariants(&algo);
    }

    #[test]
    fn test_activity_for_unplaced_room_is_dropped() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10)]).unwrap();
        let (_, mut rx) = algo.subscribe();
        let before = algo.snapshot_hash();

        for cause in [
            UpdateCause::Timeline,
            UpdateCause::ReadReceipt,
            UpdateCause::RoomOrderInTagChange,
        ] {
            let changed = algo.handle_room_update(recent("!x", 99), cause).unwrap();
            assert!(!changed);
        }

        assert_eq!(algo.snapshot_hash(), before);
        assert_eq!(algo.known_rooms().len(), 1);
        assert!(algo.tags_of(&RoomId::from("!x")).is_none());
        assert!(rx.try_recv().is_err());
    }

    // -------------------------------------------------------------------
    // Invariants & laws
    // -------------------------------------------------------------------

    #[test]
    fn test_resync_is_idempotent() {
        let rooms = vec![
            recent("!a", 10),
            recent("!b", 20),
            favourite("!f", "3"),
            Room::new("!i", "i")
                .with_membership(Membership::Invite)
                .into_ref(),
            Room::new("!l", "l").with_membership(Membership::Leave).into_ref(),
        ];
        let mut algo = standard();
        algo.set_known_rooms(rooms.clone()).unwrap();
        let first = algo.snapshot_hash();
        let first_ids = algo.ordered_room_ids();

        let (_, mut rx) = algo.subscribe();
        algo.set_known_rooms(rooms).unwrap();

        assert_eq!(algo.snapshot_hash(), first);
        assert_eq!(algo.ordered_room_ids(), first_ids);
        assert_eq!(algo.snapshot_hash_hex().len(), 64);
        assert!(rx.try_recv().is_err());
        assert_invariants(&algo);
    }

    #[test]
    fn test_invariants_hold_across_updates() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), recent("!b", 20), favourite("!f", "1")])
            .unwrap();

        let steps: Vec<(RoomRef, UpdateCause)> = vec![
            (recent("!c", 30), UpdateCause::NewRoom),
            (recent("!c", 30), UpdateCause::NewRoom),
            (
                Room::new("!a", "a")
                    .with_tag(Tag::FAVOURITE, Some(OrderKey::from_int(2)))
                    .with_last_activity(10)
                    .into_ref(),
                UpdateCause::PossibleTagChange,
            ),
            (recent("!b", 50), UpdateCause::ReadReceipt),
            (recent("!f", 0), UpdateCause::RoomRemoved),
            (
                Room::new("!c", "c")
                    .with_membership(Membership::Leave)
                    .into_ref(),
                UpdateCause::PossibleTagChange,
            ),
        ];
        for (room, cause) in steps {
            algo.handle_room_update(room, cause).unwrap();
            assert_invariants(&algo);
        }

        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!a"]);
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!b"]);
        assert_eq!(ids(&algo, &Tag::ARCHIVED), vec!["!c"]);
        assert_eq!(algo.known_rooms().len(), 3);
        assert!(algo.take_warnings().is_empty());
    }

    #[test]
    fn test_alphabetical_tag_is_ordered_by_name() {
        let mut algo = standard();
        algo.set_known_rooms(vec![
            Room::new("!1", "delta").into_ref(),
            Room::new("!2", "Bravo").into_ref(),
            Room::new("!3", "alpha").into_ref(),
            Room::new("!4", "Charlie").into_ref(),
        ])
        .unwrap();
        algo.set_tag_sorting(&Tag::UNTAGGED, SortAlgorithm::Alphabetical)
            .unwrap();
        assert_eq!(
            algo.get_tag_sorting(&Tag::UNTAGGED).unwrap(),
            SortAlgorithm::Alphabetical
        );

        let rooms = &algo.get_ordered_rooms()[&Tag::UNTAGGED];
        for pair in rooms.windows(2) {
            assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!3", "!2", "!4", "!1"]);
    }

    #[test]
    fn test_manual_insert_lands_between_neighbours() {
        let mut algo = standard();
        algo.set_known_rooms(vec![
            favourite("!a", "1"),
            favourite("!b", "2"),
            favourite("!x", "9"),
        ])
        .unwrap();

        let key = algo
            .compute_manual_order(&Tag::FAVOURITE, &RoomId::from("!x"), 1)
            .unwrap();
        assert!(key > OrderKey::from_int(1));
        assert!(key < OrderKey::from_int(2));

        let moved = Room::new("!x", "!x")
            .with_tag(Tag::FAVOURITE, Some(key))
            .into_ref();
        algo.handle_room_update(moved, UpdateCause::RoomOrderInTagChange)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!a", "!x", "!b"]);
    }

    #[test]
    fn test_manual_order_errors() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 1), favourite("!f", "1")])
            .unwrap();

        assert_eq!(
            algo.compute_manual_order(&Tag::UNTAGGED, &RoomId::from("!a"), 0)
                .unwrap_err(),
            AlgorithmError::NotManuallySorted(Tag::UNTAGGED)
        );
        assert_eq!(
            algo.compute_manual_order(&Tag::FAVOURITE, &RoomId::from("!a"), 0)
                .unwrap_err(),
            AlgorithmError::RoomNotInTag {
                tag: Tag::FAVOURITE,
                room_id: RoomId::from("!a"),
            }
        );
    }

    #[test]
    fn test_manual_target_in_unkeyed_tail() {
        let mut algo = standard();
        algo.set_known_rooms(vec![
            favourite("!a", "1"),
            favourite("!x", "5"),
            Room::new("!u1", "u1").with_tag(Tag::FAVOURITE, None).into_ref(),
            Room::new("!u2", "u2").with_tag(Tag::FAVOURITE, None).into_ref(),
        ])
        .unwrap();
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!a", "!x", "!u1", "!u2"]);

        // Aimed between !u1 and !u2; lands after the last keyed room instead.
        let key = algo
            .compute_manual_order(&Tag::FAVOURITE, &RoomId::from("!a"), 2)
            .unwrap();
        assert_eq!(key.to_string(), "6");

        let moved = Room::new("!a", "!a")
            .with_tag(Tag::FAVOURITE, Some(key))
            .into_ref();
        algo.handle_room_update(moved, UpdateCause::RoomOrderInTagChange)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!x", "!a", "!u1", "!u2"]);
    }

    #[test]
    fn test_warning_queue_is_bounded() {
        let mut algo = standard();
        for i in 0..MAX_PENDING_WARNINGS + 5 {
            algo.record_warning(ConsistencyWarning {
                tag: Tag::UNTAGGED,
                room_id: RoomId::new(format!("!r{}", i)),
                cause: UpdateCause::RoomRemoved,
                reason: "room not present in tag",
            });
        }

        let warnings = algo.take_warnings();
        assert_eq!(warnings.len(), MAX_PENDING_WARNINGS);
        assert_eq!(warnings[0].room_id, RoomId::from("!r5"));
        assert!(algo.take_warnings().is_empty());
    }

    #[test]
    fn test_renumber_manual_order() {
        let mut algo = standard();
        algo.set_known_rooms(vec![
            favourite("!a", "0.5"),
            favourite("!b", "0.75"),
            Room::new("!u", "u").with_tag(Tag::FAVOURITE, None).into_ref(),
        ])
        .unwrap();

        let keys = algo.renumber_manual_order(&Tag::FAVOURITE).unwrap();
        let rendered: Vec<(&str, String)> = keys
            .iter()
            .map(|(id, key)| (id.as_str(), key.to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("!a", "1".to_string()),
                ("!b", "2".to_string()),
                ("!u", "3".to_string()),
            ]
        );
    }

    // -------------------------------------------------------------------
    // Incremental path details
    // -------------------------------------------------------------------

    #[test]
    fn test_new_room_is_placed_once() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10)]).unwrap();

        let room = recent("!n", 20);
        assert!(algo
            .handle_room_update(room.clone(), UpdateCause::NewRoom)
            .unwrap());
        assert!(!algo.handle_room_update(room, UpdateCause::NewRoom).unwrap());

        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!n", "!a"]);
        assert_eq!(algo.known_rooms().len(), 2);
    }

    #[test]
    fn test_room_removed_clears_bookkeeping() {
        let mut algo = standard();
        let both = Room::new("!m", "m")
            .with_tag(Tag::FAVOURITE, Some(OrderKey::one()))
            .with_tag(Tag::DM, None)
            .into_ref();
        algo.set_known_rooms(vec![recent("!a", 10), both.clone()])
            .unwrap();
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!m"]);
        assert_eq!(ids(&algo, &Tag::DM), vec!["!m"]);

        assert!(algo
            .handle_room_update(both.clone(), UpdateCause::RoomRemoved)
            .unwrap());
        assert!(ids(&algo, &Tag::FAVOURITE).is_empty());
        assert!(ids(&algo, &Tag::DM).is_empty());
        assert!(algo.tags_of(&RoomId::from("!m")).is_none());
        assert_eq!(algo.known_rooms().len(), 1);

        assert!(!algo.handle_room_update(both, UpdateCause::RoomRemoved).unwrap());
        assert_invariants(&algo);
    }

    #[test]
    fn test_unconfigured_tags_fall_back() {
        let algo = standard();
        let work = Tag::parse("u.work");
        let room = Room::new("!w", "w").with_tag(work.clone(), None).into_ref();
        assert_eq!(
            algo.get_tags_for_room(&room),
            [Tag::UNTAGGED].into_iter().collect()
        );

        let mut algo = configured(&[
            (Tag::UNTAGGED, SortAlgorithm::Recent),
            (work.clone(), SortAlgorithm::Alphabetical),
        ]);
        algo.set_known_rooms(vec![room]).unwrap();
        assert_eq!(ids(&algo, &work), vec!["!w"]);
        assert!(ids(&algo, &Tag::UNTAGGED).is_empty());
    }

    #[test]
    fn test_notifications_distinguish_structural_changes() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), recent("!b", 20)])
            .unwrap();
        let (id, mut rx) = algo.subscribe();

        // Same position, new snapshot.
        algo.handle_room_update(recent("!b", 20), UpdateCause::ReadReceipt)
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            TagChange {
                tag: Tag::UNTAGGED,
                structural: false
            }
        );

        algo.handle_room_update(recent("!a", 30), UpdateCause::Timeline)
            .unwrap();
        assert!(rx.try_recv().unwrap().structural);
        assert!(rx.try_recv().is_err());

        assert!(algo.unsubscribe(id));
        algo.handle_room_update(recent("!b", 40), UpdateCause::Timeline)
            .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_possible_tag_change_without_tag_change() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 10), favourite("!f", "1"), favourite("!g", "2")])
            .unwrap();

        // Untagged is not manual: nothing to re-apply.
        assert!(!algo
            .handle_room_update(recent("!a", 10), UpdateCause::PossibleTagChange)
            .unwrap());

        // Favourite is manual: the new key is picked up.
        assert!(algo
            .handle_room_update(favourite("!g", "0.5"), UpdateCause::PossibleTagChange)
            .unwrap());
        assert_eq!(ids(&algo, &Tag::FAVOURITE), vec!["!g", "!f"]);
    }

    #[test]
    fn test_sticky_room_through_orchestrator() {
        let mut algo = standard();
        algo.set_known_rooms(vec![recent("!a", 30), recent("!b", 20), recent("!c", 10)])
            .unwrap();
        assert!(!algo.set_sticky_room(None));
        algo.set_sticky_room(Some(RoomId::from("!b")));
        assert_eq!(algo.sticky_room(), Some(&RoomId::from("!b")));

        algo.handle_room_update(recent("!c", 50), UpdateCause::Timeline)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!c", "!b", "!a"]);

        algo.handle_room_update(recent("!b", 1), UpdateCause::Timeline)
            .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!c", "!b", "!a"]);

        assert!(algo.set_sticky_room(None));
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!c", "!a", "!b"]);
        assert_invariants(&algo);
    }

    #[test]
    fn test_importance_list_ordering() {
        let mut algo = standard();
        algo.set_known_rooms(vec![
            recent("!a", 30),
            Room::new("!b", "b")
                .with_last_activity(20)
                .with_notification(NotificationLevel::Highlight)
                .into_ref(),
        ])
        .unwrap();
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!a", "!b"]);

        algo.set_list_ordering(&Tag::UNTAGGED, ListOrdering::Importance)
            .unwrap();
        assert_eq!(
            algo.get_list_ordering(&Tag::UNTAGGED).unwrap(),
            ListOrdering::Importance
        );
        assert_eq!(ids(&algo, &Tag::UNTAGGED), vec!["!b", "!a"]);
    }
}
