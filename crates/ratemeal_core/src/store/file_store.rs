//! File-backed record store.
//!
//! # Responsibility
//! - Persist the record collection as one container file under the
//!   configured storage root.
//! - Emit `records_load` / `records_save` events with counts and durations.
//!
//! # Invariants
//! - Writes go to a sibling temp file that is synced and then renamed over
//!   the target, so readers see either the old or the new collection.
//! - Record content is never written to logs.

use super::config::StoreConfig;
use super::{RecordStore, StoreError, StoreResult};
use crate::codec::{decode_records, encode_records};
use crate::model::record::Record;
use log::{error, info};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Record store writing a single container file.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    config: StoreConfig,
}

impl FileRecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self) -> StoreResult<Vec<Record>> {
        let started_at = Instant::now();
        let path = self.config.file_path();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=records_load module=store status=ok count=0 missing_file=true duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                error!(
                    "event=records_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    source
                );
                return Err(StoreError::Io { path, source });
            }
        };

        match decode_records(&bytes) {
            Ok(records) => {
                info!(
                    "event=records_load module=store status=ok count={} bytes={} duration_ms={}",
                    records.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(source) => {
                error!(
                    "event=records_load module=store status=error bytes={} duration_ms={} error_code=decode_failed error={}",
                    bytes.len(),
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(StoreError::Decode { path, source })
            }
        }
    }

    fn save(&self, records: &[Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        let bytes = encode_records(records)?;

        match write_replace(self.config.storage_root(), &self.config.file_path(), &bytes) {
            Ok(()) => {
                info!(
                    "event=records_save module=store status=ok count={} bytes={} duration_ms={}",
                    records.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=records_save module=store status=error count={} duration_ms={} error_code=write_failed error={}",
                    records.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn write_replace(root: &Path, target: &Path, bytes: &[u8]) -> StoreResult<()> {
    let io_err = |source: io::Error| StoreError::Io {
        path: target.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(root).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(target).map_err(|err| io_err(err.error))?;
    Ok(())
}
