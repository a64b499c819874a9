//! Presentation of [`Reply`] values as text or JSON lines.

use std::io::Write;

use branchstore_kernel::SnapshotOutcome;

use crate::session::Reply;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable lines; warnings and errors go to stderr.
    Text,
    /// One JSON object per input line on stdout.
    Json,
}

pub struct Renderer<W, E> {
    format: Format,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Renderer<W, E> {
    pub fn new(format: Format, out: W, err: E) -> Self {
        Self { format, out, err }
    }

    pub fn render(&mut self, reply: &Reply) -> anyhow::Result<()> {
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut self.out, reply)?;
                writeln!(self.out)?;
            }
            Format::Text => self.render_text(reply)?,
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn render_text(&mut self, reply: &Reply) -> std::io::Result<()> {
        match reply {
            Reply::Created { name, .. } => writeln!(self.out, "Created file '{name}'."),
            Reply::Content { content, .. } => writeln!(self.out, "{content}"),
            Reply::Written { .. } | Reply::RolledBack { .. } => Ok(()),
            Reply::Snapshot { name, outcome } => match outcome {
                SnapshotOutcome::Committed(_) => Ok(()),
                SnapshotOutcome::AlreadyCommitted(id) => writeln!(
                    self.err,
                    "Warning: version {id} of '{name}' is already a snapshot."
                ),
            },
            Reply::History { name, entries } => {
                writeln!(self.out, "History for file: {name}")?;
                for entry in entries {
                    writeln!(
                        self.out,
                        "  - Version {}: {} (snapshot at {})",
                        entry.id, entry.message, entry.snapshot_at
                    )?;
                }
                Ok(())
            }
            Reply::RecentFiles { files } => {
                writeln!(self.out, "Most Recently Modified Files:")?;
                for file in files {
                    writeln!(
                        self.out,
                        "  - {} (Last modified: {})",
                        file.name, file.last_changed
                    )?;
                }
                Ok(())
            }
            Reply::BiggestTrees { files } => {
                writeln!(self.out, "Files with Most Versions:")?;
                for file in files {
                    writeln!(
                        self.out,
                        "  - {} ({} versions)",
                        file.name, file.version_count
                    )?;
                }
                Ok(())
            }
            Reply::Failed { message, .. } => writeln!(self.err, "Error: {message}"),
        }
    }
}
