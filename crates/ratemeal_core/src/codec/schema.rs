//! Explicit field schema for the record container.
//!
//! # Invariants
//! - Tag byte values and field names are part of the on-disk format and must
//!   never be renumbered or renamed.
//! - New fields may be appended; they must be optional on read.

/// Leading bytes of every container file.
pub const MAGIC: [u8; 4] = *b"RTML";
/// Container layout version written by this binary.
pub const FORMAT_VERSION: u8 = 1;

/// Type tag written before every field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    /// `u32` length + UTF-8 bytes.
    Text,
    /// `u32` length + raw bytes.
    Bytes,
    /// `i64` little-endian.
    Int,
}

impl ValueTag {
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Text => 0x01,
            Self::Bytes => 0x02,
            Self::Int => 0x03,
        }
    }

    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Text),
            0x02 => Some(Self::Bytes),
            0x03 => Some(Self::Int),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Int => "int",
        }
    }
}

/// One entry of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub tag: ValueTag,
    pub required: bool,
}

pub const FIELD_NAME: FieldSpec = FieldSpec {
    name: "name",
    tag: ValueTag::Text,
    required: true,
};

pub const FIELD_PHOTO: FieldSpec = FieldSpec {
    name: "photo",
    tag: ValueTag::Bytes,
    required: false,
};

pub const FIELD_RATING: FieldSpec = FieldSpec {
    name: "rating",
    tag: ValueTag::Int,
    required: true,
};

pub const FIELD_COMMENT: FieldSpec = FieldSpec {
    name: "comment",
    tag: ValueTag::Text,
    required: false,
};

/// Record fields in write order.
pub const RECORD_FIELDS: &[FieldSpec] = &[FIELD_NAME, FIELD_PHOTO, FIELD_RATING, FIELD_COMMENT];

/// Looks up a known field by its on-disk name.
pub fn field_by_name(name: &str) -> Option<&'static FieldSpec> {
    RECORD_FIELDS.iter().find(|field| field.name == name)
}
