//! Domain model for rated meal records.
//!
//! # Responsibility
//! - Define the validated record shape shared by codec, store and service.
//!
//! # Invariants
//! - A `Record` value can only exist if it passed `Record::new`.

pub mod record;
