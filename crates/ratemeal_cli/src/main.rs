//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ratemeal_core` linkage.
//! - Optionally summarize the record collection under a storage root.
//!
//! Usage: `ratemeal_cli [STORAGE_ROOT]`

use ratemeal_core::{FileRecordStore, RecordStore, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("ratemeal_core ping={}", ratemeal_core::ping());
    println!("ratemeal_core version={}", ratemeal_core::core_version());

    let Some(root) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match StoreConfig::new(&root) {
        Ok(config) => FileRecordStore::new(config),
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match store.load() {
        Ok(records) => {
            println!("records={}", records.len());
            for (index, record) in records.iter().enumerate() {
                println!(
                    "{index}\trating={}\tphoto_bytes={}\tcomment={}\tname={}",
                    record.rating(),
                    record.photo().map_or(0, <[u8]>::len),
                    record.comment().map_or("-", |_| "yes"),
                    record.name()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
