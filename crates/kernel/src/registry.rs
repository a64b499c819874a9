use std::cmp::Ordering;

use branchstore_collections::{Comparator, KeyedStore, RankIndex};
use branchstore_common::{Tick, VersionId};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RegistryConfig};
use crate::error::{RegistryError, TreeError};
use crate::tree::{HistoryEntry, RollbackTarget, SnapshotOutcome, VersionTree, WriteOutcome};

/// A file's position in a ranking, captured when the rank indices were rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedFile {
    pub name: String,
    pub last_changed: Tick,
    pub version_count: usize,
    pub created_at: Tick,
}

impl RankedFile {
    fn of(tree: &VersionTree) -> Self {
        Self {
            name: tree.name().to_owned(),
            last_changed: tree.last_changed(),
            version_count: tree.version_count(),
            created_at: tree.created_at(),
        }
    }
}

/// More recent change ranks higher; ties go to the earlier-registered file.
fn by_recency(a: &RankedFile, b: &RankedFile) -> Ordering {
    a.last_changed
        .cmp(&b.last_changed)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// More versions rank higher; ties go to the earlier-registered file.
fn by_version_count(a: &RankedFile, b: &RankedFile) -> Ordering {
    a.version_count
        .cmp(&b.version_count)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Owner of every file's version tree, the logical clock and the rankings.
///
/// Each mutating call ticks the clock once, delegates to the named tree and
/// then rebuilds both rank indices from the file map. Read-only calls never
/// tick. Calls naming an unregistered file fail before ticking.
#[derive(Debug)]
pub struct FileRegistry {
    config: RegistryConfig,
    files: KeyedStore<String, VersionTree>,
    recent: RankIndex<RankedFile>,
    biggest: RankIndex<RankedFile>,
    clock: Tick,
}

impl FileRegistry {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        Self::build(RegistryConfig::default())
    }

    /// Create an empty registry after validating `config`.
    pub fn with_config(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RegistryConfig) -> Self {
        Self {
            files: KeyedStore::with_buckets(config.file_buckets, config.max_load_factor),
            recent: RankIndex::new(by_recency as Comparator<RankedFile>),
            biggest: RankIndex::new(by_version_count as Comparator<RankedFile>),
            clock: Tick::ZERO,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Current reading of the logical clock.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Read-only access to a file's version tree.
    pub fn file(&self, name: &str) -> Option<&VersionTree> {
        self.files.get(name)
    }

    /// Registered filenames, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Register a new file whose root is an empty snapshot. Returns its creation tick.
    pub fn create(&mut self, name: &str) -> Result<Tick, RegistryError> {
        if self.files.contains_key(name) {
            return Err(RegistryError::AlreadyExists {
                name: name.to_owned(),
            });
        }
        let at = self.clock.advance();
        let tree = VersionTree::with_config(name, at, &self.config);
        self.files.insert(name.to_owned(), tree);
        tracing::debug!(file = name, tick = at.0, "created file");
        self.rebuild_indices();
        Ok(at)
    }

    /// Content of the file's active version.
    pub fn read(&self, name: &str) -> Result<&str, RegistryError> {
        Ok(self.tree(name)?.read())
    }

    pub fn insert(&mut self, name: &str, text: &str) -> Result<WriteOutcome, RegistryError> {
        self.mutate(name, "insert", |tree, at| tree.insert(text, at))
    }

    pub fn update(&mut self, name: &str, text: &str) -> Result<WriteOutcome, RegistryError> {
        self.mutate(name, "update", |tree, at| tree.update(text, at))
    }

    /// Commit the active draft. An already committed version is reported
    /// through [`SnapshotOutcome::AlreadyCommitted`], not as an error.
    pub fn snapshot(&mut self, name: &str, message: &str) -> Result<SnapshotOutcome, RegistryError> {
        self.mutate(name, "snapshot", |tree, at| Ok(tree.snapshot(message, at)))
    }

    /// Move the file's active pointer. Returns the new active version.
    pub fn rollback(
        &mut self,
        name: &str,
        target: RollbackTarget,
    ) -> Result<VersionId, RegistryError> {
        self.mutate(name, "rollback", |tree, _| tree.rollback(target))
    }

    /// Committed versions on the active line of ancestry, most recent first.
    pub fn history(&self, name: &str) -> Result<Vec<HistoryEntry>, RegistryError> {
        Ok(self
            .tree(name)?
            .history()
            .filter_map(HistoryEntry::from_node)
            .collect())
    }

    /// Drop a file and its whole history.
    pub fn remove(&mut self, name: &str) -> Result<(), RegistryError> {
        self.files
            .remove(name)
            .ok_or_else(|| RegistryError::FileNotFound {
                name: name.to_owned(),
            })?;
        let at = self.clock.advance();
        tracing::debug!(file = name, tick = at.0, "removed file");
        self.rebuild_indices();
        Ok(())
    }

    /// Files by most recent content change, highest first. `None` means no limit.
    pub fn rank_by_recency(&self, limit: Option<usize>) -> Result<Vec<RankedFile>, RegistryError> {
        Ok(self.recent.clone().drain_ranked(limit)?)
    }

    /// Files by number of versions, highest first. `None` means no limit.
    pub fn rank_by_version_count(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<RankedFile>, RegistryError> {
        Ok(self.biggest.clone().drain_ranked(limit)?)
    }

    fn tree(&self, name: &str) -> Result<&VersionTree, RegistryError> {
        self.files
            .get(name)
            .ok_or_else(|| RegistryError::FileNotFound {
                name: name.to_owned(),
            })
    }

    fn mutate<R>(
        &mut self,
        name: &str,
        op: &'static str,
        apply: impl FnOnce(&mut VersionTree, Tick) -> Result<R, TreeError>,
    ) -> Result<R, RegistryError> {
        let tree = self
            .files
            .get_mut(name)
            .ok_or_else(|| RegistryError::FileNotFound {
                name: name.to_owned(),
            })?;
        let at = self.clock.advance();
        let result = apply(tree, at);
        tracing::debug!(
            file = name,
            op,
            tick = at.0,
            ok = result.is_ok(),
            active = %tree.active_id(),
            "applied file operation"
        );
        self.rebuild_indices();
        result.map_err(|source| RegistryError::Version {
            name: name.to_owned(),
            source,
        })
    }

    fn rebuild_indices(&mut self) {
        let entries: Vec<RankedFile> = self.files.values().map(RankedFile::of).collect();
        self.recent.rebuild(entries.iter().cloned());
        self.biggest.rebuild(entries);
        tracing::trace!(files = self.files.len(), "rebuilt rank indices");
    }
}

impl Default for FileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
