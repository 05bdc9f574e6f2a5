use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures surfaced by a storage backend.
///
/// A lookup that finds nothing is not an error: read operations return
/// `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A uniqueness constraint was violated on create.
    #[error("{field} '{value}' is already taken")]
    Conflict { field: &'static str, value: String },

    /// A message referenced a creator that does not exist.
    #[error("creator {0} does not exist")]
    UnknownCreator(i64),

    /// The backing store was never opened, or has been closed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Every generated confession id collided with an existing one.
    #[error("could not allocate a unique confession id")]
    IdSpaceExhausted,

    /// A stored row could not be decoded.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}
