pub mod algorithm;
/// Ordering algorithms — from one room's classification up to the full tag map.
///
/// Rooms are partitioned into tags, each tag is kept in a deterministic order
/// by its sort policy, shaped by its list policy, and finally pinned so rooms
/// with an ongoing call surface first.
///
/// # Module structure
/// - `limits` — Guardrail constants and key precision checking
/// - `classifier` — Which tags a room belongs to
/// - `sort` — Manual / Alphabetical / Recent comparators
/// - `tag_order` — Authoritative per-tag ordered list (OrderingAlgorithm)
/// - `list` — Natural / Importance shaping and the sticky room (ListAlgorithm)
/// - `pinning` — Active-call view transform
/// - `algorithm` — Orchestrator (Algorithm, TagMap, snapshot_hash)
pub mod classifier;
pub mod limits;
pub mod list;
pub mod pinning;
pub mod sort;
pub mod tag_order;

// Re-export core types for convenience
pub use algorithm::{Algorithm, AlgorithmError, EngineState, TagMap};
pub use classifier::{fallback_tag, tags_for_room};
pub use limits::{check_key_precision, KeyPrecisionStatus};
pub use list::{ListAlgorithm, ListOrdering};
pub use pinning::{pin_active_calls, ActiveCallSet};
pub use sort::{compare_names, SortAlgorithm};
pub use tag_order::{ConsistencyWarning, OrderingAlgorithm, OrderingError, UpdateOutcome};
