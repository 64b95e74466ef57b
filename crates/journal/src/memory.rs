use std::sync::Mutex;

use crate::event::{AuditEvent, Level, Record};
use crate::Journal;

/// In-memory journal that collects records for inspection in tests.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    records: Mutex<Vec<Record>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of every record written so far, in write order.
    pub fn records(&self) -> Vec<Record> {
        self.guard().clone()
    }

    /// The `action` field of each record, in write order.
    pub fn actions(&self) -> Vec<String> {
        self.guard().iter().map(|r| r.event.action.clone()).collect()
    }
}

impl Journal for MemoryJournal {
    fn write(&self, level: Level, event: AuditEvent) {
        self.guard().push(Record::new(level, event));
    }
}
