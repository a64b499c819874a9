//! Shared types used across the branchstore crates.

mod types;

pub use types::{Tick, VersionId};
