//! Parsing of one input line into a [`Command`].
//!
//! Words are whitespace-delimited. Free-text arguments (content, messages)
//! are the remaining words joined with single spaces.

use branchstore_kernel::{RollbackTarget, VersionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { name: String },
    Read { name: String },
    Insert { name: String, text: String },
    Update { name: String, text: String },
    Snapshot { name: String, message: String },
    Rollback { name: String, target: RollbackTarget },
    History { name: String },
    RecentFiles { limit: Option<usize> },
    BiggestTrees { limit: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid {what} '{value}'")]
    InvalidNumber { what: &'static str, value: String },
}

/// Parse a line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    let command = match keyword {
        "CREATE" => Command::Create {
            name: filename(&mut words, "CREATE <filename>")?,
        },
        "READ" => Command::Read {
            name: filename(&mut words, "READ <filename>")?,
        },
        "INSERT" => Command::Insert {
            name: filename(&mut words, "INSERT <filename> <content...>")?,
            text: rest(words),
        },
        "UPDATE" => Command::Update {
            name: filename(&mut words, "UPDATE <filename> <content...>")?,
            text: rest(words),
        },
        "SNAPSHOT" => Command::Snapshot {
            name: filename(&mut words, "SNAPSHOT <filename> <message...>")?,
            message: rest(words),
        },
        "ROLLBACK" => {
            let name = filename(&mut words, "ROLLBACK <filename> [versionId]")?;
            Command::Rollback {
                name,
                target: rollback_target(words.next())?,
            }
        }
        "HISTORY" => Command::History {
            name: filename(&mut words, "HISTORY <filename>")?,
        },
        "RECENT_FILES" => Command::RecentFiles {
            limit: limit(words.next())?,
        },
        "BIGGEST_TREES" => Command::BiggestTrees {
            limit: limit(words.next())?,
        },
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn filename<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    usage: &'static str,
) -> Result<String, ParseError> {
    words
        .next()
        .map(str::to_owned)
        .ok_or(ParseError::Usage(usage))
}

fn rest<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

/// Absent or negative means the parent of the active version.
fn rollback_target(raw: Option<&str>) -> Result<RollbackTarget, ParseError> {
    let Some(raw) = raw else {
        return Ok(RollbackTarget::Parent);
    };
    let invalid = || ParseError::InvalidNumber {
        what: "version id",
        value: raw.to_owned(),
    };
    let n: i64 = raw.parse().map_err(|_| invalid())?;
    if n < 0 {
        return Ok(RollbackTarget::Parent);
    }
    let id = u32::try_from(n).map_err(|_| invalid())?;
    Ok(RollbackTarget::Version(VersionId(id)))
}

/// Absent or negative means unlimited.
fn limit(raw: Option<&str>) -> Result<Option<usize>, ParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let n: i64 = raw.parse().map_err(|_| ParseError::InvalidNumber {
        what: "count",
        value: raw.to_owned(),
    })?;
    Ok(usize::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t "), Ok(None));
    }

    #[test]
    fn free_text_is_joined_with_single_spaces() {
        assert_eq!(
            parse_line("INSERT notes hello   big  world").unwrap(),
            Some(Command::Insert {
                name: "notes".into(),
                text: "hello big world".into(),
            })
        );
        assert_eq!(
            parse_line("SNAPSHOT notes first draft").unwrap(),
            Some(Command::Snapshot {
                name: "notes".into(),
                message: "first draft".into(),
            })
        );
    }

    #[test]
    fn missing_text_is_empty() {
        assert_eq!(
            parse_line("UPDATE notes").unwrap(),
            Some(Command::Update {
                name: "notes".into(),
                text: String::new(),
            })
        );
    }

    #[test]
    fn rollback_with_and_without_id() {
        assert_eq!(
            parse_line("ROLLBACK a").unwrap(),
            Some(Command::Rollback {
                name: "a".into(),
                target: RollbackTarget::Parent,
            })
        );
        assert_eq!(
            parse_line("ROLLBACK a 3").unwrap(),
            Some(Command::Rollback {
                name: "a".into(),
                target: RollbackTarget::Version(VersionId(3)),
            })
        );
        assert!(matches!(
            parse_line("ROLLBACK a three"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn negative_rollback_id_means_parent() {
        assert_eq!(
            parse_line("ROLLBACK a -1").unwrap(),
            Some(Command::Rollback {
                name: "a".into(),
                target: RollbackTarget::Parent,
            })
        );
        assert_eq!(
            parse_line("ROLLBACK a 4294967296"),
            Err(ParseError::InvalidNumber {
                what: "version id",
                value: "4294967296".into(),
            })
        );
    }

    #[test]
    fn ranking_limits() {
        assert_eq!(
            parse_line("RECENT_FILES").unwrap(),
            Some(Command::RecentFiles { limit: None })
        );
        assert_eq!(
            parse_line("BIGGEST_TREES 2").unwrap(),
            Some(Command::BiggestTrees { limit: Some(2) })
        );
        assert_eq!(
            parse_line("RECENT_FILES -1").unwrap(),
            Some(Command::RecentFiles { limit: None })
        );
        assert!(parse_line("BIGGEST_TREES many").is_err());
    }

    #[test]
    fn missing_filename_reports_usage() {
        assert_eq!(
            parse_line("CREATE"),
            Err(ParseError::Usage("CREATE <filename>"))
        );
        assert_eq!(
            parse_line("HISTORY").unwrap_err().to_string(),
            "usage: HISTORY <filename>"
        );
    }

    #[test]
    fn unknown_and_lowercase_commands_rejected() {
        assert_eq!(
            parse_line("DELETE a"),
            Err(ParseError::Unknown("DELETE".into()))
        );
        assert_eq!(
            parse_line("create a"),
            Err(ParseError::Unknown("create".into()))
        );
    }
}
