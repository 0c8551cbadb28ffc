use ratemeal_core::{
    DecodeError, FileRecordStore, Record, RecordStore, RecordValidationError, StoreConfig,
    StoreError,
};
use tempfile::TempDir;

fn store_in_tempdir() -> (TempDir, FileRecordStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileRecordStore::new(StoreConfig::new(dir.path()).unwrap());
    (dir, store)
}

#[test]
fn load_without_file_returns_empty_collection() {
    let (_dir, store) = store_in_tempdir();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn roundtrip_preserves_absent_optional_fields() {
    let (_dir, store) = store_in_tempdir();
    let taco = Record::new("Taco", None, 5, None).unwrap();

    store.save(&[taco.clone()]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, vec![taco]);
    assert_eq!(loaded[0].photo(), None);
    assert_eq!(loaded[0].comment(), None);
}

#[test]
fn roundtrip_preserves_photo_bytes_and_comment() {
    let (_dir, store) = store_in_tempdir();
    let photo = (0..=255u8).cycle().take(4096).collect::<Vec<_>>();
    let pie = Record::new("Pie", Some(photo.clone()), 4, Some("too sweet".to_string())).unwrap();

    store.save(&[pie]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded[0].photo(), Some(photo.as_slice()));
    assert_eq!(loaded[0].comment(), Some("too sweet"));
}

#[test]
fn roundtrip_distinguishes_empty_and_absent_comment() {
    let (_dir, store) = store_in_tempdir();
    let with_empty = Record::new("Salad", None, 2, Some(String::new())).unwrap();
    let without = Record::new("Salad", None, 2, None).unwrap();

    store.save(&[with_empty.clone(), without.clone()]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded[0].comment(), Some(""));
    assert_eq!(loaded[1].comment(), None);
    assert_eq!(loaded, vec![with_empty, without]);
}

#[test]
fn roundtrip_preserves_order() {
    let (_dir, store) = store_in_tempdir();
    let a = Record::new("Caprese Salad", None, 4, None).unwrap();
    let b = Record::new("Chicken and Potatoes", Some(vec![7; 16]), 5, None).unwrap();
    let c = Record::new("Pasta with Meatballs", None, 3, Some("ok".to_string())).unwrap();

    store.save(&[a.clone(), b.clone(), c.clone()]).unwrap();

    assert_eq!(store.load().unwrap(), vec![a, b, c]);
}

#[test]
fn saving_twice_is_idempotent() {
    let (_dir, store) = store_in_tempdir();
    let records = vec![
        Record::new("Taco", None, 5, None).unwrap(),
        Record::new("Soup", None, 0, Some("cold".to_string())).unwrap(),
    ];

    store.save(&records).unwrap();
    let once = std::fs::read(store.config().file_path()).unwrap();
    store.save(&records).unwrap();
    let twice = std::fs::read(store.config().file_path()).unwrap();

    assert_eq!(once, twice);
    assert_eq!(store.load().unwrap(), records);
}

#[test]
fn save_replaces_previous_collection() {
    let (_dir, store) = store_in_tempdir();
    store
        .save(&[
            Record::new("Taco", None, 5, None).unwrap(),
            Record::new("Soup", None, 1, None).unwrap(),
        ])
        .unwrap();

    let replacement = vec![Record::new("Pie", None, 4, None).unwrap()];
    store.save(&replacement).unwrap();

    assert_eq!(store.load().unwrap(), replacement);

    store.save(&[]).unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn corrupt_file_is_a_decode_error_not_a_crash() {
    let (_dir, store) = store_in_tempdir();
    std::fs::write(store.config().file_path(), b"{\"meals\": []}").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        StoreError::Decode {
            source: DecodeError::BadMagic,
            ..
        }
    ));
}

#[test]
fn truncated_file_is_a_decode_error() {
    let (_dir, store) = store_in_tempdir();
    store
        .save(&[Record::new("Taco", Some(vec![1, 2, 3]), 5, None).unwrap()])
        .unwrap();

    let path = store.config().file_path();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

    assert!(matches!(
        store.load().unwrap_err(),
        StoreError::Decode {
            source: DecodeError::UnexpectedEof { .. },
            ..
        }
    ));
}

#[test]
fn invalid_persisted_entry_aborts_whole_load() {
    let (_dir, store) = store_in_tempdir();

    let mut bytes = b"RTML\x01".to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.push(4);
    bytes.extend_from_slice(b"name");
    bytes.push(0x01);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.push(6);
    bytes.extend_from_slice(b"rating");
    bytes.push(0x03);
    bytes.extend_from_slice(&3i64.to_le_bytes());
    std::fs::write(store.config().file_path(), &bytes).unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        StoreError::Decode {
            source: DecodeError::InvalidRecord {
                index: 0,
                source: RecordValidationError::EmptyName,
            },
            ..
        }
    ));
}

#[test]
fn custom_file_name_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path())
        .unwrap()
        .with_file_name("meals")
        .unwrap();
    let store = FileRecordStore::new(config);

    store
        .save(&[Record::new("Taco", None, 5, None).unwrap()])
        .unwrap();

    assert!(dir.path().join("meals").is_file());
    assert!(!dir.path().join("records").exists());
}
