/// Ordering guardrails.
///
/// These constants bound how far manual-order keys may deepen and flag tags
/// large enough that full re-sorts start to matter.
use crate::models::OrderKey;

/// Fractional digits after which a manual key should be renumbered.
/// Each midpoint insertion adds at most one digit.
pub const MAX_ORDER_KEY_SCALE: u32 = 64;

/// Tag size above which a full re-sort per update gets logged.
pub const LARGE_TAG_ROOM_COUNT: usize = 10_000;

/// Spacing between keys handed out by a renumber pass.
pub const RENUMBER_STEP: i64 = 1;

/// Consistency warnings kept until the host drains them; oldest dropped first.
pub const MAX_PENDING_WARNINGS: usize = 256;

/// Precision status for a manual-order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrecisionStatus {
    /// Key is short, nothing to do.
    Ok,
    /// Key has deepened past the soft cap; the tag should be renumbered.
    NeedsRenumbering,
}

/// Check whether a manual key has grown deep enough to warrant renumbering.
pub fn check_key_precision(key: &OrderKey) -> KeyPrecisionStatus {
    if key.scale() > MAX_ORDER_KEY_SCALE {
        KeyPrecisionStatus::NeedsRenumbering
    } else {
        KeyPrecisionStatus::Ok
    }
}
