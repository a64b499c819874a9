//! Collections: a chained hash store and a comparator-driven max-heap.
//!
//! # Invariants
//! - `KeyedStore` never exceeds its configured load factor; it doubles its
//!   bucket count and redistributes every entry instead.
//! - `RankIndex` extraction on an empty heap is reported as an error, never
//!   answered with a default value.

mod error;
mod keyed_store;
mod rank_index;

pub use error::CollectionError;
pub use keyed_store::{BucketHash, KeyedStore};
pub use rank_index::{Comparator, RankIndex};
