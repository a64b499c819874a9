use branchstore_collections::KeyedStore;
use branchstore_common::{Tick, VersionId};
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::TreeError;
use crate::node::VersionNode;

/// Where a rollback should move the active pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackTarget {
    /// The active version's parent.
    Parent,
    /// A specific committed version.
    Version(VersionId),
}

/// Result of an `insert` or `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// The version that now holds the written content.
    pub version: VersionId,
    /// Whether the write forked a new draft off a snapshot.
    pub branched: bool,
}

/// Result of a `snapshot` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "version", rename_all = "snake_case")]
pub enum SnapshotOutcome {
    /// The active draft was committed.
    Committed(VersionId),
    /// The active version was already a snapshot; nothing changed.
    AlreadyCommitted(VersionId),
}

/// One committed version on the active line of ancestry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: VersionId,
    pub message: String,
    pub snapshot_at: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Append,
    Replace,
}

/// Full version history of one file.
///
/// Nodes live in an append-only arena where a node's slot equals its id, so
/// the arena is freed in one pass when the tree drops. The id index mirrors
/// the arena and answers lookups for ids supplied from outside the tree.
#[derive(Debug)]
pub struct VersionTree {
    name: String,
    nodes: Vec<VersionNode>,
    index: KeyedStore<VersionId, usize>,
    active: VersionId,
    /// `None` once every id has been handed out.
    next_id: Option<VersionId>,
    created_at: Tick,
    last_changed: Tick,
}

impl VersionTree {
    /// Create a file whose root snapshot is stamped with `at`, using default settings.
    pub fn new(name: impl Into<String>, at: Tick) -> Self {
        Self::with_config(name, at, &RegistryConfig::default())
    }

    pub fn with_config(name: impl Into<String>, at: Tick, config: &RegistryConfig) -> Self {
        let mut index = KeyedStore::with_buckets(config.version_buckets, config.max_load_factor);
        index.insert(VersionId::ROOT, 0);
        Self {
            name: name.into(),
            nodes: vec![VersionNode::root(config.root_message.clone(), at)],
            index,
            active: VersionId::ROOT,
            next_id: VersionId::ROOT.next(),
            created_at: at,
            last_changed: at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_id(&self) -> VersionId {
        self.active
    }

    /// The currently selected version.
    pub fn active(&self) -> &VersionNode {
        &self.nodes[slot(self.active)]
    }

    /// Look up a version by id.
    pub fn node(&self, id: VersionId) -> Option<&VersionNode> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Direct children of `id`, in branch order.
    pub fn children(&self, id: VersionId) -> Option<&[VersionId]> {
        self.node(id).map(VersionNode::children)
    }

    /// Every version in id order, drafts included.
    pub fn nodes(&self) -> &[VersionNode] {
        &self.nodes
    }

    /// Total number of versions, root and drafts included.
    pub fn version_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn created_at(&self) -> Tick {
        self.created_at
    }

    /// Tick of the last content change (creation, insert or update).
    pub fn last_changed(&self) -> Tick {
        self.last_changed
    }

    /// Content of the active version.
    pub fn read(&self) -> &str {
        self.active().content()
    }

    /// Append `text` to the active version, branching if it is a snapshot.
    pub fn insert(&mut self, text: &str, at: Tick) -> Result<WriteOutcome, TreeError> {
        self.write(WriteMode::Append, text, at)
    }

    /// Replace the active version's content, branching if it is a snapshot.
    pub fn update(&mut self, text: &str, at: Tick) -> Result<WriteOutcome, TreeError> {
        self.write(WriteMode::Replace, text, at)
    }

    /// Commit the active draft under `message`.
    pub fn snapshot(&mut self, message: &str, at: Tick) -> SnapshotOutcome {
        let active = &mut self.nodes[slot(self.active)];
        if active.is_snapshot() {
            return SnapshotOutcome::AlreadyCommitted(active.id());
        }
        active.commit(message, at);
        SnapshotOutcome::Committed(active.id())
    }

    /// Move the active pointer. On failure the active version is unchanged.
    pub fn rollback(&mut self, target: RollbackTarget) -> Result<VersionId, TreeError> {
        let destination = match target {
            RollbackTarget::Parent => self
                .active()
                .parent()
                .ok_or(TreeError::AtRoot(self.active))?,
            RollbackTarget::Version(id) => {
                let node = self.node(id).ok_or(TreeError::NoSuchVersion(id))?;
                if !node.is_snapshot() {
                    return Err(TreeError::DraftVersion(id));
                }
                id
            }
        };
        self.active = destination;
        Ok(destination)
    }

    /// Committed versions from the active one up to the root, most recent first.
    pub fn history(&self) -> History<'_> {
        History {
            tree: self,
            cursor: Some(self.active),
        }
    }

    fn write(&mut self, mode: WriteMode, text: &str, at: Tick) -> Result<WriteOutcome, TreeError> {
        let active = &mut self.nodes[slot(self.active)];
        let outcome = if active.is_snapshot() {
            let content = match mode {
                WriteMode::Append => format!("{}{}", active.content(), text),
                WriteMode::Replace => text.to_owned(),
            };
            WriteOutcome {
                version: self.branch(content, at)?,
                branched: true,
            }
        } else {
            let content = active.content_mut();
            if mode == WriteMode::Replace {
                content.clear();
            }
            content.push_str(text);
            WriteOutcome {
                version: active.id(),
                branched: false,
            }
        };
        self.last_changed = at;
        Ok(outcome)
    }

    fn branch(&mut self, content: String, at: Tick) -> Result<VersionId, TreeError> {
        let id = self
            .next_id
            .ok_or(TreeError::IdsExhausted(VersionId(u32::MAX)))?;
        let parent = self.active;
        self.next_id = id.next();

        self.nodes.push(VersionNode::draft(id, content, at, parent));
        self.nodes[slot(parent)].push_child(id);
        self.index.insert(id, slot(id));
        self.active = id;

        tracing::trace!(file = %self.name, %id, %parent, "branched draft");
        Ok(id)
    }
}

/// Arena slot of a version id.
fn slot(id: VersionId) -> usize {
    id.0 as usize
}

/// Iterator over the committed ancestors of the active version.
pub struct History<'a> {
    tree: &'a VersionTree,
    cursor: Option<VersionId>,
}

impl<'a> Iterator for History<'a> {
    type Item = &'a VersionNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cursor {
            let node = self.tree.node(id)?;
            self.cursor = node.parent();
            if node.is_snapshot() {
                return Some(node);
            }
        }
        None
    }
}

impl HistoryEntry {
    /// Entry for a committed node; `None` for drafts.
    pub fn from_node(node: &VersionNode) -> Option<Self> {
        node.snapshot_at().map(|snapshot_at| Self {
            id: node.id(),
            message: node.message().to_owned(),
            snapshot_at,
        })
    }
}
