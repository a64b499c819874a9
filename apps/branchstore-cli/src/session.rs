//! Executes parsed commands against a registry and packages the results.

use branchstore_kernel::{
    ErrorKind, FileRegistry, HistoryEntry, RankedFile, RegistryError, SnapshotOutcome, Tick,
    VersionId, WriteOutcome,
};
use serde::Serialize;

use crate::command::{Command, ParseError};

/// Structured result of one input line, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Reply {
    Created {
        name: String,
        tick: Tick,
    },
    Content {
        name: String,
        content: String,
    },
    Written {
        name: String,
        #[serde(flatten)]
        outcome: WriteOutcome,
    },
    Snapshot {
        name: String,
        outcome: SnapshotOutcome,
    },
    RolledBack {
        name: String,
        active: VersionId,
    },
    History {
        name: String,
        entries: Vec<HistoryEntry>,
    },
    RecentFiles {
        files: Vec<RankedFile>,
    },
    BiggestTrees {
        files: Vec<RankedFile>,
    },
    Failed {
        /// `None` for lines that could not be parsed.
        kind: Option<ErrorKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        message: String,
    },
}

impl From<RegistryError> for Reply {
    fn from(err: RegistryError) -> Self {
        Reply::Failed {
            kind: Some(err.kind()),
            file: err.file_name().map(str::to_owned),
            message: err.to_string(),
        }
    }
}

impl From<ParseError> for Reply {
    fn from(err: ParseError) -> Self {
        Reply::Failed {
            kind: None,
            file: None,
            message: err.to_string(),
        }
    }
}

/// A registry plus the glue that turns commands into replies.
#[derive(Debug, Default)]
pub struct Session {
    registry: FileRegistry,
}

impl Session {
    pub fn new(registry: FileRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn execute(&mut self, command: Command) -> Reply {
        tracing::debug!(?command, "executing");
        self.dispatch(command).unwrap_or_else(Reply::from)
    }

    fn dispatch(&mut self, command: Command) -> Result<Reply, RegistryError> {
        let reg = &mut self.registry;
        Ok(match command {
            Command::Create { name } => {
                let tick = reg.create(&name)?;
                Reply::Created { name, tick }
            }
            Command::Read { name } => {
                let content = reg.read(&name)?.to_owned();
                Reply::Content { name, content }
            }
            Command::Insert { name, text } => {
                let outcome = reg.insert(&name, &text)?;
                Reply::Written { name, outcome }
            }
            Command::Update { name, text } => {
                let outcome = reg.update(&name, &text)?;
                Reply::Written { name, outcome }
            }
            Command::Snapshot { name, message } => {
                let outcome = reg.snapshot(&name, &message)?;
                Reply::Snapshot { name, outcome }
            }
            Command::Rollback { name, target } => {
                let active = reg.rollback(&name, target)?;
                Reply::RolledBack { name, active }
            }
            Command::History { name } => {
                let entries = reg.history(&name)?;
                Reply::History { name, entries }
            }
            Command::RecentFiles { limit } => Reply::RecentFiles {
                files: reg.rank_by_recency(limit)?,
            },
            Command::BiggestTrees { limit } => Reply::BiggestTrees {
                files: reg.rank_by_version_count(limit)?,
            },
        })
    }
}
