//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level meal functions to Dart via FRB.
//! - Turn core validation/store errors into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store access is serialized through one process-wide lock.
//! - Validation failures are reported as `ok = false`, never as errors.

use log::warn;
use ratemeal_core::{
    clamp_rating, core_version as core_version_inner, init_logging as init_logging_inner,
    is_valid_name, ping as ping_inner, FileRecordStore, Record, RecordService, StoreConfig,
    MAX_RATING,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const STORAGE_DIR_ENV: &str = "RATEMEAL_STORAGE_DIR";
const DEFAULT_STORAGE_DIR_NAME: &str = "ratemeal";
static STORAGE_ROOT: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Whether the entry form may enable its save action for `name`.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_name_is_valid(name: String) -> bool {
    is_valid_name(&name)
}

/// Number of stars the rating widget shows.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_max_rating() -> i64 {
    MAX_RATING
}

/// Clamps raw rating widget input into `0..=meal_max_rating()`.
///
/// Saving does not clamp; out-of-range values above the cap are stored as is.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_clamp_rating(value: i64) -> i64 {
    clamp_rating(value)
}

/// One stored meal as shown in the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealItem {
    /// Position in the stored collection (display order).
    pub index: u32,
    pub name: String,
    pub photo: Option<Vec<u8>>,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Response envelope for `meal_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealListResponse {
    pub ok: bool,
    /// Stored meals in display order (empty on failure).
    pub items: Vec<MealItem>,
    pub message: String,
}

/// Response envelope for add/update/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealActionResponse {
    pub ok: bool,
    /// Position of the affected meal; `None` on failure.
    pub index: Option<u32>,
    pub message: String,
}

impl MealActionResponse {
    fn success(message: impl Into<String>, index: usize) -> Self {
        Self {
            ok: true,
            index: u32::try_from(index).ok(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            index: None,
            message: message.into(),
        }
    }
}

/// Lists all stored meals.
///
/// # FFI contract
/// - Returns `ok = true` with an empty list on first run.
/// - Corrupt storage yields `ok = false`; the UI falls back to an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_list() -> MealListResponse {
    let result = with_record_service(|service| {
        let records = service.load().map_err(|err| err.to_string())?;
        Ok(records
            .iter()
            .enumerate()
            .map(|(index, record)| to_meal_item(index, record))
            .collect::<Vec<_>>())
    });

    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No meals yet.".to_string()
            } else {
                format!("Loaded {} meal(s).", items.len())
            };
            MealListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => MealListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("meal_list failed: {err}"),
        },
    }
}

/// Validates and appends a new meal, then persists the collection.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_add(
    name: String,
    photo: Option<Vec<u8>>,
    rating: i64,
    comment: Option<String>,
) -> MealActionResponse {
    save_meal(None, name, photo, rating, comment)
}

/// Validates and replaces the meal at `index`, then persists the collection.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_update(
    index: u32,
    name: String,
    photo: Option<Vec<u8>>,
    rating: i64,
    comment: Option<String>,
) -> MealActionResponse {
    save_meal(Some(index), name, photo, rating, comment)
}

/// Removes the meal at `index`, then persists the collection.
#[flutter_rust_bridge::frb(sync)]
pub fn meal_delete(index: u32) -> MealActionResponse {
    let result = with_record_service(|service| {
        service.load().map_err(|err| err.to_string())?;
        service
            .remove(index as usize)
            .map_err(|err| err.to_string())?;
        service.save().map_err(|err| err.to_string())?;
        Ok(index as usize)
    });

    match result {
        Ok(index) => MealActionResponse::success("Meal deleted.", index),
        Err(err) => MealActionResponse::failure(format!("meal_delete failed: {err}")),
    }
}

fn save_meal(
    index: Option<u32>,
    name: String,
    photo: Option<Vec<u8>>,
    rating: i64,
    comment: Option<String>,
) -> MealActionResponse {
    let record = match Record::new(name, photo, rating, comment) {
        Ok(record) => record,
        Err(err) => {
            warn!("event=meal_save module=ffi status=rejected error={err}");
            return MealActionResponse::failure(format!("Invalid meal: {err}"));
        }
    };

    let result = with_record_service(|service| {
        service.load().map_err(|err| err.to_string())?;
        let position = service
            .upsert(index.map(|value| value as usize), record)
            .map_err(|err| err.to_string())?;
        service.save().map_err(|err| err.to_string())?;
        Ok(position)
    });

    let verb = if index.is_some() { "updated" } else { "added" };
    match result {
        Ok(position) => MealActionResponse::success(format!("Meal {verb}."), position),
        Err(err) => MealActionResponse::failure(format!("meal save failed: {err}")),
    }
}

fn resolve_storage_root() -> PathBuf {
    STORAGE_ROOT
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORAGE_DIR_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_STORAGE_DIR_NAME)
        })
        .clone()
}

fn lock_store() -> MutexGuard<'static, ()> {
    // A panicked holder cannot leave the file half-written; recover the guard.
    STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_record_service<T>(
    f: impl FnOnce(&mut RecordService<FileRecordStore>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = lock_store();
    let config = StoreConfig::new(resolve_storage_root())
        .map_err(|err| format!("store config failed: {err}"))?;
    let mut service = RecordService::new(FileRecordStore::new(config));
    f(&mut service)
}

fn to_meal_item(index: usize, record: &Record) -> MealItem {
    MealItem {
        index: u32::try_from(index).unwrap_or(u32::MAX),
        name: record.name().to_string(),
        photo: record.photo().map(<[u8]>::to_vec),
        rating: record.rating(),
        comment: record.comment().map(str::to_string),
    }
}
