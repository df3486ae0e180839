/// Tag classification — which sections a room belongs to right now.
///
/// Precedence:
/// 1. Invite membership ⇒ `{Invite}`
/// 2. Leave / Ban membership ⇒ `{Archived}`
/// 3. Explicit tags, verbatim
/// 4. Known 1:1 conversation ⇒ `{DM}`
/// 5. Otherwise `{Untagged}`
///
/// The result is never empty.
use std::collections::BTreeSet;

use crate::models::{Membership, Room, Tag};

pub fn tags_for_room(room: &Room) -> BTreeSet<Tag> {
    let mut tags = BTreeSet::new();

    match room.membership {
        Membership::Invite => {
            tags.insert(Tag::INVITE);
        }
        Membership::Leave | Membership::Ban => {
            tags.insert(Tag::ARCHIVED);
        }
        Membership::Join => {
            if !room.tags.is_empty() {
                tags.extend(room.tags.keys().cloned());
            } else {
                tags.insert(fallback_tag(room));
            }
        }
    }

    debug_assert!(!tags.is_empty());
    tags
}

/// Section a joined room lands in when none of its explicit tags apply.
pub fn fallback_tag(room: &Room) -> Tag {
    if room.is_direct {
        Tag::DM
    } else {
        Tag::UNTAGGED
    }
}
