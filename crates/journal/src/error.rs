use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}
