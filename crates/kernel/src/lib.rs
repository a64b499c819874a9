//! Kernel: per-file version trees and the registry that owns them.
//!
//! # Invariants
//! - Version ids are unique and strictly increasing per file; the root is 0.
//! - A snapshot is never mutated; writing to one branches a new draft child.
//! - Every mutating registry call ticks the logical clock exactly once and
//!   rebuilds both rank indices from the file map before returning.
//! - The kernel never prints. Outcomes and errors are returned to the caller;
//!   `tracing` events are diagnostics only.

mod config;
mod error;
mod node;
mod registry;
mod tree;

pub use branchstore_common::{Tick, VersionId};
pub use config::{ConfigError, RegistryConfig};
pub use error::{ErrorKind, RegistryError, TreeError};
pub use node::{VersionNode, VersionState};
pub use registry::{FileRegistry, RankedFile};
pub use tree::{
    History, HistoryEntry, RollbackTarget, SnapshotOutcome, VersionTree, WriteOutcome,
};
