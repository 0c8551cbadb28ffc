//! Record collection persistence.
//!
//! # Responsibility
//! - Define the load/save contract used by the service layer.
//! - Keep file layout and container details inside the core boundary.
//!
//! # Invariants
//! - `save` replaces the whole collection file; there are no partial updates.
//! - `load` on a missing file yields an empty collection, not an error.
//! - Corrupt or foreign file contents surface as `StoreError::Decode`.
//! - Stores provide no locking; callers serialize their own calls.

use crate::codec::{DecodeError, EncodeError};
use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod config;
pub mod file_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by record store configuration, load and save paths.
#[derive(Debug)]
pub enum StoreError {
    Config(String),
    Io { path: PathBuf, source: io::Error },
    Encode(EncodeError),
    Decode { path: PathBuf, source: DecodeError },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "invalid store config: {message}"),
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
            Self::Decode { path, source } => {
                write!(f, "failed to decode `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<EncodeError> for StoreError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

/// Persistence contract for the ordered record collection.
pub trait RecordStore {
    /// Reads the full collection in stored order.
    fn load(&self) -> StoreResult<Vec<Record>>;
    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[Record]) -> StoreResult<()>;
}
