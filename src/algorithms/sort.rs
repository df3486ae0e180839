/// Per-tag comparator policy.
///
/// Every comparator is a strict weak ordering that ends in a room-id
/// tie-break, so sorting the same rooms always produces the same order.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Room, RoomRef, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortAlgorithm {
    /// By the room's manual-order key inside the tag; unkeyed rooms last.
    Manual,
    /// By display name, case-insensitive first.
    Alphabetical,
    /// By last activity, newest first.
    #[default]
    Recent,
}

impl SortAlgorithm {
    pub fn from_string(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MANUAL" => SortAlgorithm::Manual,
            "ALPHABETICAL" => SortAlgorithm::Alphabetical,
            "RECENT" => SortAlgorithm::Recent,
            _ => SortAlgorithm::Recent,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            SortAlgorithm::Manual => "MANUAL".to_string(),
            SortAlgorithm::Alphabetical => "ALPHABETICAL".to_string(),
            SortAlgorithm::Recent => "RECENT".to_string(),
        }
    }

    pub fn compare(&self, tag: &Tag, a: &Room, b: &Room) -> Ordering {
        let primary = match self {
            SortAlgorithm::Manual => compare_manual(tag, a, b),
            SortAlgorithm::Alphabetical => compare_names(&a.name, &b.name),
            SortAlgorithm::Recent => b.last_activity_ms.cmp(&a.last_activity_ms),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Stable in-place sort of a tag's rooms.
    pub fn sort(&self, tag: &Tag, rooms: &mut [RoomRef]) {
        rooms.sort_by(|a, b| self.compare(tag, a, b));
    }
}

fn compare_manual(tag: &Tag, a: &Room, b: &Room) -> Ordering {
    match (a.order_in(tag), b.order_in(tag)) {
        (Some(ka), Some(kb)) => ka.cmp(kb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Name comparison: Unicode lowercase folding first, so "alpha" and "Alpha"
/// sit together, then the raw names to keep case variants in a fixed order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
