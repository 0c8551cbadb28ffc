//! Record collection use-case service.
//!
//! # Responsibility
//! - Hold the in-memory collection between `load` and `save`.
//! - Provide add / replace / remove / edit-or-add entry points for the UI.
//!
//! # Invariants
//! - Mutations and `save` require the `Loaded` state.
//! - Insertion order is display order.
//! - A failed `save` leaves the in-memory collection untouched.

use crate::model::record::Record;
use crate::store::{RecordStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    NotLoaded,
    IndexOutOfRange { index: usize, len: usize },
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "record collection has not been loaded"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range for {len} record(s)")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotLoaded | Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Observable lifecycle of the held collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreState {
    #[default]
    Unloaded,
    Loaded { records: Vec<Record> },
}

/// Use-case wrapper owning the collection state over a `RecordStore`.
pub struct RecordService<S: RecordStore> {
    store: S,
    state: StoreState,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates an unloaded service over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: StoreState::Unloaded,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Returns the held records, or `None` before the first `load`.
    pub fn records(&self) -> Option<&[Record]> {
        match &self.state {
            StoreState::Unloaded => None,
            StoreState::Loaded { records } => Some(records),
        }
    }

    /// Reads the stored collection and moves to `Loaded`.
    ///
    /// On error the previous state is kept.
    pub fn load(&mut self) -> ServiceResult<&[Record]> {
        let records = self.store.load()?;
        self.state = StoreState::Loaded { records };
        Ok(self.records().unwrap_or_default())
    }

    /// Appends `record` and returns its position.
    pub fn add(&mut self, record: Record) -> ServiceResult<usize> {
        let records = self.loaded_mut()?;
        records.push(record);
        Ok(records.len() - 1)
    }

    /// Replaces the record at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, record: Record) -> ServiceResult<Record> {
        let records = self.loaded_mut()?;
        let len = records.len();
        let slot = records
            .get_mut(index)
            .ok_or(ServiceError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, record))
    }

    /// Removes and returns the record at `index`.
    pub fn remove(&mut self, index: usize) -> ServiceResult<Record> {
        let records = self.loaded_mut()?;
        if index >= records.len() {
            return Err(ServiceError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }
        Ok(records.remove(index))
    }

    /// Edit-or-add: `Some(index)` replaces, `None` appends.
    ///
    /// Returns the position of `record` after the call.
    pub fn upsert(&mut self, index: Option<usize>, record: Record) -> ServiceResult<usize> {
        match index {
            Some(index) => {
                self.replace(index, record)?;
                Ok(index)
            }
            None => self.add(record),
        }
    }

    /// Writes the held collection through the store.
    pub fn save(&self) -> ServiceResult<()> {
        let records = self.records().ok_or(ServiceError::NotLoaded)?;
        self.store.save(records)?;
        Ok(())
    }

    fn loaded_mut(&mut self) -> ServiceResult<&mut Vec<Record>> {
        match &mut self.state {
            StoreState::Unloaded => Err(ServiceError::NotLoaded),
            StoreState::Loaded { records } => Ok(records),
        }
    }
}
