/// Change notifications out of the engine and the active-call feed into it.
///
/// Both directions are plain channels rather than callback registries:
/// - tag changes go out over `tokio::sync::mpsc` unbounded channels. Sending
///   never blocks, and hosts drain with `try_recv` (or `recv().await` from an
///   async UI loop). Dropping a receiver unsubscribes it.
/// - the active-call set comes in over a `tokio::sync::watch` channel. The
///   engine only ever needs the latest set, which is exactly what `watch` keeps.
use tokio::sync::{mpsc, watch};

use crate::algorithms::pinning::ActiveCallSet;
use crate::models::{RoomId, Tag};

// ---------------------------------------------------------------------------
// Tag change notifications
// ---------------------------------------------------------------------------

/// One tag's cached order changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChange {
    pub tag: Tag,
    /// True when the tag's room-id sequence changed (rooms added, removed or
    /// reordered). False when only room snapshots were refreshed in place.
    pub structural: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Default)]
pub struct TagChangeNotifier {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, mpsc::UnboundedSender<TagChange>)>,
}

impl TagChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<TagChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, tx));
        (id, rx)
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver to every live subscriber; receivers that were dropped are pruned.
    pub fn emit(&mut self, change: TagChange) {
        self.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(change.clone()).is_ok();
            if !delivered {
                log::debug!("Dropping closed tag change subscriber {:?}", id);
            }
            delivered
        });
    }
}

// ---------------------------------------------------------------------------
// Active-call feed
// ---------------------------------------------------------------------------

/// Host-side publisher of the set of rooms currently hosting a call.
#[derive(Debug)]
pub struct ActiveCallFeed {
    tx: watch::Sender<ActiveCallSet>,
}

impl Default for ActiveCallFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCallFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ActiveCallSet::new());
        ActiveCallFeed { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ActiveCallSet> {
        self.tx.subscribe()
    }

    /// Returns true if the room was not already in a call.
    pub fn call_started(&self, room_id: RoomId) -> bool {
        self.tx.send_if_modified(|set| set.insert(room_id))
    }

    /// Returns true if the room was in a call.
    pub fn call_ended(&self, room_id: &RoomId) -> bool {
        self.tx.send_if_modified(|set| set.remove(room_id))
    }

    pub fn replace(&self, calls: ActiveCallSet) {
        self.tx.send_if_modified(|set| {
            if *set == calls {
                false
            } else {
                *set = calls;
                true
            }
        });
    }

    pub fn current(&self) -> ActiveCallSet {
        self.tx.borrow().clone()
    }
}
