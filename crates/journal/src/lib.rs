//! Append-only audit journal for order activity.
//!
//! Every order placed, rejected, or retried is recorded as one JSON object
//! per line so the file can be tailed, grepped, and replayed. The
//! [`Journal`] trait is the seam the executor and API clients write
//! through; [`FileJournal`] is the production implementation and
//! [`MemoryJournal`] backs tests.

pub mod error;
pub mod event;
pub mod export;
pub mod file;
pub mod memory;

// Re-export the core types to provide a clean public API.
pub use error::JournalError;
pub use event::{AuditEvent, Level, Record};
pub use export::{export_csv, EXPORT_COLUMNS};
pub use file::FileJournal;
pub use memory::MemoryJournal;

/// Sink for audit events. Implementations must not fail the caller:
/// a record that cannot be persisted is logged and dropped.
pub trait Journal: Send + Sync {
    fn write(&self, level: Level, event: AuditEvent);

    fn info(&self, event: AuditEvent) {
        self.write(Level::Info, event);
    }

    fn error(&self, event: AuditEvent) {
        self.write(Level::Error, event);
    }
}
