use branchstore_common::{Tick, VersionId};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a version node. The only transition is Draft → Snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    /// Content is still mutable in place.
    Draft,
    /// Content is frozen and labeled.
    Snapshot,
}

/// One version of a file.
///
/// Parent and children are stored as ids into the owning tree's arena, so a
/// node never holds a reference to another node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionNode {
    id: VersionId,
    content: String,
    message: String,
    created_at: Tick,
    /// `None` while the node is a draft.
    snapshot_at: Option<Tick>,
    parent: Option<VersionId>,
    children: Vec<VersionId>,
}

impl VersionNode {
    /// The root of a new file: an empty, already committed snapshot.
    pub(crate) fn root(message: impl Into<String>, at: Tick) -> Self {
        Self {
            id: VersionId::ROOT,
            content: String::new(),
            message: message.into(),
            created_at: at,
            snapshot_at: Some(at),
            parent: None,
            children: Vec::new(),
        }
    }

    /// A fresh draft branched off `parent`.
    pub(crate) fn draft(id: VersionId, content: String, at: Tick, parent: VersionId) -> Self {
        Self {
            id,
            content,
            message: String::new(),
            created_at: at,
            snapshot_at: None,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot label; empty for drafts.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> Tick {
        self.created_at
    }

    pub fn snapshot_at(&self) -> Option<Tick> {
        self.snapshot_at
    }

    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    /// Child ids in the order they were branched.
    pub fn children(&self) -> &[VersionId] {
        &self.children
    }

    pub fn state(&self) -> VersionState {
        if self.snapshot_at.is_some() {
            VersionState::Snapshot
        } else {
            VersionState::Draft
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.state() == VersionState::Snapshot
    }

    pub(crate) fn content_mut(&mut self) -> &mut String {
        debug_assert!(!self.is_snapshot(), "snapshot content is immutable");
        &mut self.content
    }

    pub(crate) fn commit(&mut self, message: impl Into<String>, at: Tick) {
        debug_assert!(!self.is_snapshot(), "node is already committed");
        self.message = message.into();
        self.snapshot_at = Some(at);
    }

    pub(crate) fn push_child(&mut self, child: VersionId) {
        self.children.push(child);
    }
}
