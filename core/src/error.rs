use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShuffleError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History record {id} not found")]
    HistoryNotFound { id: i64 },

    #[error("Shuffle worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ShuffleResult<T> = Result<T, ShuffleError>;
