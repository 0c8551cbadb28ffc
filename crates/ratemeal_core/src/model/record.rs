//! Meal record domain model.
//!
//! # Responsibility
//! - Define the validated record captured by one save action of the entry form.
//! - Reject invalid input at construction time, before a record is ever shared.
//!
//! # Invariants
//! - `name` is non-empty (exact check, no trimming).
//! - `rating` is `>= 0`. The entity does not enforce an upper bound.
//! - `photo` and `comment` are independently optional; `Some("")` and `None`
//!   are distinct comment states.
//!
//! # See also
//! - `crate::codec` for the persisted field mapping.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest rating the rating widget can produce.
///
/// Exposed for collaborators only; `Record::new` accepts larger values.
pub const MAX_RATING: i64 = 5;

/// Validation failure raised when constructing a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `name` was the empty string.
    EmptyName,
    /// `rating` was below zero.
    NegativeRating(i64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "record name must not be empty"),
            Self::NegativeRating(rating) => {
                write!(f, "record rating must be >= 0, got {rating}")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One rated meal: name, optional photo blob, rating and optional comment.
///
/// Fields are private so that every value in circulation went through
/// [`Record::new`]. Edits build a new record and replace the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: String,
    photo: Option<Vec<u8>>,
    rating: i64,
    comment: Option<String>,
}

impl Record {
    /// Builds a record from raw form input.
    ///
    /// Checks run in order: name first, then rating. The first failing check
    /// is returned and no record is built.
    ///
    /// # Errors
    /// - [`RecordValidationError::EmptyName`] when `name` is `""`.
    /// - [`RecordValidationError::NegativeRating`] when `rating < 0`.
    pub fn new(
        name: impl Into<String>,
        photo: Option<Vec<u8>>,
        rating: i64,
        comment: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            name: name.into(),
            photo,
            rating,
            comment,
        };
        record.validate()?;
        Ok(record)
    }

    /// Re-checks construction invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if !is_valid_name(&self.name) {
            return Err(RecordValidationError::EmptyName);
        }
        if self.rating < 0 {
            return Err(RecordValidationError::NegativeRating(self.rating));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo(&self) -> Option<&[u8]> {
        self.photo.as_deref()
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Consumes the record and returns `(name, photo, rating, comment)`.
    pub fn into_parts(self) -> (String, Option<Vec<u8>>, i64, Option<String>) {
        (self.name, self.photo, self.rating, self.comment)
    }
}

/// Returns whether `name` passes the record name check.
///
/// Lets the entry form enable its save action while the user types. A name
/// made of whitespace only is accepted.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
}

/// Clamps raw rating widget input into `0..=MAX_RATING`.
pub fn clamp_rating(value: i64) -> i64 {
    value.clamp(0, MAX_RATING)
}
