use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::JournalError;
use crate::event::{AuditEvent, Level, Record};
use crate::Journal;

/// JSON-lines journal backed by a single append-only file.
///
/// Each record is written in its own open-append-close cycle so that no
/// file handle outlives a write and concurrent processes interleave whole
/// lines at worst. A write failure is reported as a diagnostic warning and
/// the record is dropped; journaling must never abort a trading flow.
#[derive(Debug, Clone)]
pub struct FileJournal {
    path: PathBuf,
}

impl FileJournal {
    /// Opens the journal, creating the file (and parent directories) if
    /// needed. Safe to call repeatedly; existing records are kept.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &Record) -> Result<(), JournalError> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

impl Journal for FileJournal {
    fn write(&self, level: Level, event: AuditEvent) {
        let record = Record::new(level, event);
        if let Err(e) = self.append(&record) {
            warn!(path = %self.path.display(), error = %e, "failed to append audit record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_append_as_one_json_line_each() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("azimuth.log");
        let journal = FileJournal::create(&path).unwrap();

        journal.info(AuditEvent::new("twap_start").symbol("BTCUSDT"));
        journal.error(AuditEvent::new("validate").error("side must be BUY or SELL"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Record = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.level, Level::Info);
        assert_eq!(first.event.action, "twap_start");
        assert!(first.ts.ends_with('Z'));

        let second: Record = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.level, Level::Error);
        assert_eq!(second.event.error.as_deref(), Some("side must be BUY or SELL"));
    }

    #[test]
    fn create_is_idempotent_and_preserves_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("azimuth.log");

        let journal = FileJournal::create(&path).unwrap();
        journal.info(AuditEvent::new("place_order"));

        let reopened = FileJournal::create(&path).unwrap();
        reopened.info(AuditEvent::new("place_order"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn create_builds_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("azimuth.log");
        FileJournal::create(&path).unwrap();
        assert!(path.exists());
    }
}
