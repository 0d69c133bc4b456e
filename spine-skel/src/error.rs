use crate::AttachmentKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unexpected end of skeleton data: offset {offset} (needed {needed} bytes)")]
    UnexpectedEndOfData { offset: usize, needed: usize },

    #[error("Unsupported skeleton data, please export with a newer version of Spine.")]
    UnsupportedFormatVersion { version: String },

    #[error("Invalid timeline type for a slot: {slot}")]
    UnknownSlotTimeline { slot: String, kind: u8 },

    #[error("Invalid timeline type for a bone: {bone}")]
    UnknownBoneTimeline { bone: String, kind: u8 },

    #[error("Invalid timeline type for a path constraint: {constraint}")]
    UnknownPathTimeline { constraint: String, kind: u8 },

    #[error("Attachment not found: {name}")]
    AttachmentNotFound { name: String },

    #[error("Skin not found: {name}")]
    SkinNotFound { name: String },

    #[error("Parent mesh not found: {name}")]
    ParentMeshNotFound { name: String },

    #[error("Unable to read skeleton file: {path}")]
    FileRead { path: String },

    #[error("Invalid attachment type: {kind}")]
    UnknownAttachmentType { kind: u8 },

    #[error("Attachment loader returned the wrong kind for '{name}' (expected {expected:?})")]
    AttachmentKindMismatch {
        name: String,
        expected: AttachmentKind,
    },

    #[error("Region not found: {path}")]
    RegionNotFound { path: String },

    #[error("Invalid {kind} index: {index} (len={len})")]
    InvalidIndex {
        kind: &'static str,
        index: i64,
        len: usize,
    },

    #[error("Negative count {value} at offset {offset}")]
    NegativeCount { offset: usize, value: i32 },

    #[error("Invalid utf-8 in string at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Invalid draw order in animation '{animation}': {message}")]
    InvalidDrawOrder { animation: String, message: String },

    #[error("Failed to parse atlas: {message}")]
    AtlasParse { message: String },
}

impl Error {
    pub(crate) fn invalid_index(kind: &'static str, index: impl Into<i64>, len: usize) -> Self {
        Error::InvalidIndex {
            kind,
            index: index.into(),
            len,
        }
    }
}
