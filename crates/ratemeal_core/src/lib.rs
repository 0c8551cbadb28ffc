//! Core domain logic for RateThisMeal.
//! This crate is the single source of truth for record invariants and the
//! on-disk collection format.

pub mod codec;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::{decode_records, encode_records, DecodeError, EncodeError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{clamp_rating, is_valid_name, Record, RecordValidationError, MAX_RATING};
pub use service::record_service::{RecordService, ServiceError, ServiceResult, StoreState};
pub use store::config::{StoreConfig, DEFAULT_FILE_NAME};
pub use store::file_store::FileRecordStore;
pub use store::{RecordStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
