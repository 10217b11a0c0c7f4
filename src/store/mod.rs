//! Per-bed store
//!
//! The facade the tool layer talks to: SQLite-backed records behind a
//! read-through cache, with change notifications published per topic.

pub mod beds;
pub mod cache;
pub mod notify;

pub use beds::{BedExport, BedStore, BedSummary, ClearedRecords, StoreError, StoreResult, WardSummary, BED_COUNT};
pub use cache::{RecordCache, DEFAULT_CACHE_TTL};
pub use notify::{ChangeNotifier, RecordKind, StoreEvent, SubscriptionToken, Topic};
