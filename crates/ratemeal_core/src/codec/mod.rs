//! Self-describing binary container for record collections.
//!
//! # Responsibility
//! - Encode an ordered record sequence into one byte buffer.
//! - Decode a byte buffer back into records through `Record::new`.
//!
//! # Invariants
//! - Each record is a field-name -> tagged-value mapping; absent optional
//!   fields are omitted, never written as empty values.
//! - Unknown field names are skipped on decode.
//! - Decoding never panics on malformed input; every mismatch is a
//!   `DecodeError`.
//! - An entry that fails record validation aborts the whole decode.
//!
//! # Layout (little-endian)
//! `magic[4] version:u8 count:u32 { fields:u16 { key_len:u8 key tag:u8 value }* }*`

use crate::model::record::{Record, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod schema;

use schema::{
    field_by_name, FieldSpec, ValueTag, FIELD_COMMENT, FIELD_NAME, FIELD_PHOTO, FIELD_RATING,
    FORMAT_VERSION, MAGIC,
};

pub type EncodeResult<T> = Result<T, EncodeError>;
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failure while building a container buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    TooManyRecords(usize),
    ValueTooLarge { field: &'static str, len: usize },
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyRecords(count) => {
                write!(f, "record count {count} exceeds container limit")
            }
            Self::ValueTooLarge { field, len } => {
                write!(f, "field `{field}` value of {len} bytes exceeds container limit")
            }
        }
    }
}

impl Error for EncodeError {}

/// Failure while reading a container buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    BadMagic,
    UnsupportedVersion(u8),
    UnexpectedEof {
        offset: usize,
    },
    UnknownTag {
        offset: usize,
        tag: u8,
    },
    InvalidUtf8 {
        offset: usize,
    },
    TypeMismatch {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    DuplicateField {
        index: usize,
        field: &'static str,
    },
    MissingField {
        index: usize,
        field: &'static str,
    },
    InvalidRecord {
        index: usize,
        source: RecordValidationError,
    },
    TrailingBytes {
        offset: usize,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadMagic => write!(f, "not a record container (bad magic)"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "container version {version} is not supported (expected {FORMAT_VERSION})"
            ),
            Self::UnexpectedEof { offset } => {
                write!(f, "unexpected end of data at offset {offset}")
            }
            Self::UnknownTag { offset, tag } => {
                write!(f, "unknown value tag 0x{tag:02x} at offset {offset}")
            }
            Self::InvalidUtf8 { offset } => write!(f, "invalid UTF-8 text at offset {offset}"),
            Self::TypeMismatch {
                index,
                field,
                expected,
                found,
            } => write!(
                f,
                "record {index}: field `{field}` expected {expected}, found {found}"
            ),
            Self::DuplicateField { index, field } => {
                write!(f, "record {index}: field `{field}` appears more than once")
            }
            Self::MissingField { index, field } => {
                write!(f, "record {index}: required field `{field}` is missing")
            }
            Self::InvalidRecord { index, source } => write!(f, "record {index}: {source}"),
            Self::TrailingBytes { offset } => {
                write!(f, "unexpected trailing data at offset {offset}")
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Encodes `records` in order into a fresh container buffer.
///
/// # Errors
/// - `TooManyRecords` when the sequence does not fit the `u32` count.
/// - `ValueTooLarge` when a text or blob does not fit the `u32` length.
pub fn encode_records(records: &[Record]) -> EncodeResult<Vec<u8>> {
    let count =
        u32::try_from(records.len()).map_err(|_| EncodeError::TooManyRecords(records.len()))?;

    let mut out = Vec::with_capacity(16 + records.len() * 32);
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&count.to_le_bytes());

    for record in records {
        encode_record(&mut out, record)?;
    }

    Ok(out)
}

fn encode_record(out: &mut Vec<u8>, record: &Record) -> EncodeResult<()> {
    let mut fields: u16 = 2;
    if record.photo().is_some() {
        fields += 1;
    }
    if record.comment().is_some() {
        fields += 1;
    }
    out.extend_from_slice(&fields.to_le_bytes());

    write_key(out, &FIELD_NAME);
    write_len_prefixed(out, FIELD_NAME.name, record.name().as_bytes())?;

    if let Some(photo) = record.photo() {
        write_key(out, &FIELD_PHOTO);
        write_len_prefixed(out, FIELD_PHOTO.name, photo)?;
    }

    write_key(out, &FIELD_RATING);
    out.extend_from_slice(&record.rating().to_le_bytes());

    if let Some(comment) = record.comment() {
        write_key(out, &FIELD_COMMENT);
        write_len_prefixed(out, FIELD_COMMENT.name, comment.as_bytes())?;
    }

    Ok(())
}

fn write_key(out: &mut Vec<u8>, field: &FieldSpec) {
    // Schema names are short ASCII constants.
    out.push(field.name.len() as u8);
    out.extend_from_slice(field.name.as_bytes());
    out.push(field.tag.to_byte());
}

fn write_len_prefixed(out: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> EncodeResult<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::ValueTooLarge {
        field,
        len: bytes.len(),
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Decodes a container buffer into records, preserving stored order.
///
/// Every entry passes through `Record::new`; the first invalid entry aborts
/// the decode with `DecodeError::InvalidRecord`.
pub fn decode_records(bytes: &[u8]) -> DecodeResult<Vec<Record>> {
    let mut reader = Reader::new(bytes);

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(DecodeError::BadMagic);
    }
    let version = reader.u8()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let count = reader.u32()? as usize;
    // Cap the preallocation; `count` comes from untrusted input.
    let mut records = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        records.push(decode_record(&mut reader, index)?);
    }

    if !reader.is_at_end() {
        return Err(DecodeError::TrailingBytes {
            offset: reader.offset,
        });
    }

    Ok(records)
}

enum Value {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
}

impl Value {
    fn tag(&self) -> ValueTag {
        match self {
            Self::Text(_) => ValueTag::Text,
            Self::Bytes(_) => ValueTag::Bytes,
            Self::Int(_) => ValueTag::Int,
        }
    }
}

#[derive(Default)]
struct RecordSlots {
    name: Option<String>,
    photo: Option<Vec<u8>>,
    rating: Option<i64>,
    comment: Option<String>,
}

fn decode_record(reader: &mut Reader<'_>, index: usize) -> DecodeResult<Record> {
    let field_count = reader.u16()?;
    let mut slots = RecordSlots::default();

    for _ in 0..field_count {
        let key_len = reader.u8()? as usize;
        let key = reader.text(key_len)?;
        let value = read_value(reader)?;

        let Some(field) = field_by_name(&key) else {
            continue;
        };
        if value.tag() != field.tag {
            return Err(DecodeError::TypeMismatch {
                index,
                field: field.name,
                expected: field.tag.label(),
                found: value.tag().label(),
            });
        }

        let duplicate = match value {
            Value::Text(text) if field.name == FIELD_NAME.name => {
                slots.name.replace(text).is_some()
            }
            Value::Text(text) => slots.comment.replace(text).is_some(),
            Value::Bytes(blob) => slots.photo.replace(blob).is_some(),
            Value::Int(rating) => slots.rating.replace(rating).is_some(),
        };
        if duplicate {
            return Err(DecodeError::DuplicateField {
                index,
                field: field.name,
            });
        }
    }

    let name = slots.name.ok_or(DecodeError::MissingField {
        index,
        field: FIELD_NAME.name,
    })?;
    let rating = slots.rating.ok_or(DecodeError::MissingField {
        index,
        field: FIELD_RATING.name,
    })?;

    Record::new(name, slots.photo, rating, slots.comment)
        .map_err(|source| DecodeError::InvalidRecord { index, source })
}

fn read_value(reader: &mut Reader<'_>) -> DecodeResult<Value> {
    let tag_offset = reader.offset;
    let tag_byte = reader.u8()?;
    let tag = ValueTag::from_byte(tag_byte).ok_or(DecodeError::UnknownTag {
        offset: tag_offset,
        tag: tag_byte,
    })?;

    match tag {
        ValueTag::Text => {
            let len = reader.u32()? as usize;
            Ok(Value::Text(reader.text(len)?))
        }
        ValueTag::Bytes => {
            let len = reader.u32()? as usize;
            Ok(Value::Bytes(reader.take(len)?.to_vec()))
        }
        ValueTag::Int => Ok(Value::Int(reader.i64()?)),
    }
}

/// Bounds-checked cursor over an input buffer.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.offset == self.bytes.len()
    }

    fn take(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let bytes = self.bytes;
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= bytes.len())
            .ok_or(DecodeError::UnexpectedEof {
                offset: self.offset,
            })?;
        let slice = &bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> DecodeResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn text(&mut self, len: usize) -> DecodeResult<String> {
        let start = self.offset;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_records, encode_records, DecodeError, FORMAT_VERSION, MAGIC};
    use crate::model::record::{Record, RecordValidationError};

    fn header(count: u32) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&count.to_le_bytes());
        out
    }

    fn text_field(out: &mut Vec<u8>, key: &str, value: &str) {
        out.push(key.len() as u8);
        out.extend_from_slice(key.as_bytes());
        out.push(0x01);
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        out.extend_from_slice(value.as_bytes());
    }

    fn int_field(out: &mut Vec<u8>, key: &str, value: i64) {
        out.push(key.len() as u8);
        out.extend_from_slice(key.as_bytes());
        out.push(0x03);
        out.extend_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn empty_sequence_encodes_header_only() {
        let bytes = encode_records(&[]).unwrap();
        assert_eq!(bytes, header(0));
        assert!(decode_records(&bytes).unwrap().is_empty());
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let record = Record::new("Taco", None, 5, None).unwrap();
        let bytes = encode_records(&[record]).unwrap();

        let mut expected = header(1);
        expected.extend_from_slice(&2u16.to_le_bytes());
        text_field(&mut expected, "name", "Taco");
        int_field(&mut expected, "rating", 5);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn empty_comment_is_written_as_present_field() {
        let record = Record::new("Soup", None, 2, Some(String::new())).unwrap();
        let bytes = encode_records(&[record]).unwrap();
        let decoded = decode_records(&bytes).unwrap();
        assert_eq!(decoded[0].comment(), Some(""));
    }

    #[test]
    fn decode_accepts_any_field_order_and_skips_unknown_fields() {
        let mut bytes = header(1);
        bytes.extend_from_slice(&3u16.to_le_bytes());
        int_field(&mut bytes, "rating", 3);
        text_field(&mut bytes, "cuisine", "thai");
        text_field(&mut bytes, "name", "Curry");

        let decoded = decode_records(&bytes).unwrap();
        assert_eq!(decoded, vec![Record::new("Curry", None, 3, None).unwrap()]);
    }

    #[test]
    fn decode_rejects_foreign_data() {
        assert_eq!(decode_records(b"nope").unwrap_err(), DecodeError::BadMagic);
        assert_eq!(
            decode_records(b"RT").unwrap_err(),
            DecodeError::UnexpectedEof { offset: 0 }
        );

        let mut bytes = MAGIC.to_vec();
        bytes.push(9);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::UnsupportedVersion(9)
        );
    }

    #[test]
    fn decode_reports_truncation_instead_of_panicking() {
        let record = Record::new("Pie", Some(vec![1, 2, 3, 4]), 4, Some("too sweet".into()))
            .unwrap();
        let bytes = encode_records(&[record]).unwrap();

        for cut in 0..bytes.len() {
            assert!(decode_records(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn decode_rejects_huge_declared_count_without_allocating_it() {
        let bytes = header(u32::MAX);
        assert!(matches!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn decode_rejects_type_mismatch_and_missing_fields() {
        let mut bytes = header(1);
        bytes.extend_from_slice(&2u16.to_le_bytes());
        text_field(&mut bytes, "name", "Stew");
        text_field(&mut bytes, "rating", "five");
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::TypeMismatch {
                index: 0,
                field: "rating",
                expected: "int",
                found: "text",
            }
        );

        let mut bytes = header(1);
        bytes.extend_from_slice(&1u16.to_le_bytes());
        text_field(&mut bytes, "name", "Stew");
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::MissingField {
                index: 0,
                field: "rating",
            }
        );
    }

    #[test]
    fn decode_rejects_duplicate_fields() {
        let mut bytes = header(1);
        bytes.extend_from_slice(&3u16.to_le_bytes());
        text_field(&mut bytes, "name", "A");
        text_field(&mut bytes, "name", "B");
        int_field(&mut bytes, "rating", 1);
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::DuplicateField {
                index: 0,
                field: "name",
            }
        );
    }

    #[test]
    fn decode_runs_record_validation() {
        let mut bytes = header(2);
        bytes.extend_from_slice(&2u16.to_le_bytes());
        text_field(&mut bytes, "name", "Fine");
        int_field(&mut bytes, "rating", 1);
        bytes.extend_from_slice(&2u16.to_le_bytes());
        text_field(&mut bytes, "name", "Soup");
        int_field(&mut bytes, "rating", -1);

        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::InvalidRecord {
                index: 1,
                source: RecordValidationError::NegativeRating(-1),
            }
        );
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut bytes = encode_records(&[]).unwrap();
        bytes.push(0);
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::TrailingBytes { offset: 9 }
        );
    }

    #[test]
    fn decode_rejects_invalid_utf8_and_unknown_tags() {
        let mut bytes = header(1);
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.push(4);
        bytes.extend_from_slice(b"name");
        bytes.push(0x01);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe]);
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::InvalidUtf8 { offset: 21 }
        );

        let mut bytes = header(1);
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.push(4);
        bytes.extend_from_slice(b"name");
        bytes.push(0x7f);
        assert_eq!(
            decode_records(&bytes).unwrap_err(),
            DecodeError::UnknownTag {
                offset: 16,
                tag: 0x7f,
            }
        );
    }
}
