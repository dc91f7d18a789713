//! Shared error type across crosswire crates.

use std::fmt;

use thiserror::Error;

/// Stable machine-readable error codes (reported to callers and logged).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Truncated or corrupt binary stream.
    Decode,
    /// Malformed text (JSON syntax).
    Parse,
    /// Text field present with the wrong shape.
    TypeMismatch,
    /// Mandatory field absent after the whole object was consumed.
    MissingField,
    /// Polymorphic dispatch on an unregistered tag.
    UnknownVariant,
    /// Cross-boundary round trip failed.
    Reconstruction,
    /// Encoder-side contract violation.
    Encode,
    /// Post-decode domain validation failed.
    InvalidValue,
    /// A degraded message defaulted a field whose policy is to reject.
    MessageRejected,
    /// No handler registered for the requested action.
    UnknownAction,
    /// Configuration or registry build failure.
    Config,
}

impl ErrorCode {
    /// String representation used in logs and error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Decode => "DECODE_ERROR",
            ErrorCode::Parse => "PARSE_ERROR",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::UnknownVariant => "UNKNOWN_VARIANT",
            ErrorCode::Reconstruction => "RECONSTRUCTION_ERROR",
            ErrorCode::Encode => "ENCODE_ERROR",
            ErrorCode::InvalidValue => "INVALID_VALUE",
            ErrorCode::MessageRejected => "MESSAGE_REJECTED",
            ErrorCode::UnknownAction => "UNKNOWN_ACTION",
            ErrorCode::Config => "CONFIG_ERROR",
        }
    }
}

/// Which half of a cross-boundary round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructStage {
    /// Serializing the opaque value.
    Encode,
    /// Re-decoding the bytes as the local target type.
    Decode,
}

impl fmt::Display for ReconstructStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructStage::Encode => f.write_str("encoding the opaque value"),
            ReconstructStage::Decode => f.write_str("decoding the local target"),
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type used by core, messages and node.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("type mismatch: field `{field}` expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("unknown {family} variant: {tag}")]
    UnknownVariant { family: &'static str, tag: String },
    #[error("reconstruction failed while {stage}: {source}")]
    Reconstruction {
        stage: ReconstructStage,
        #[source]
        source: Box<WireError>,
    },
    #[error("encode error: {0}")]
    Encode(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("{message} rejected: defaulted fields {fields:?}")]
    MessageRejected {
        message: &'static str,
        fields: Vec<&'static str>,
    },
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("config: {0}")]
    Config(String),
}

impl WireError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            WireError::Decode(_) => ErrorCode::Decode,
            WireError::Parse(_) => ErrorCode::Parse,
            WireError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            WireError::MissingField(_) => ErrorCode::MissingField,
            WireError::UnknownVariant { .. } => ErrorCode::UnknownVariant,
            WireError::Reconstruction { .. } => ErrorCode::Reconstruction,
            WireError::Encode(_) => ErrorCode::Encode,
            WireError::InvalidValue(_) => ErrorCode::InvalidValue,
            WireError::MessageRejected { .. } => ErrorCode::MessageRejected,
            WireError::UnknownAction(_) => ErrorCode::UnknownAction,
            WireError::Config(_) => ErrorCode::Config,
        }
    }

    pub fn type_mismatch(field: &str, expected: &'static str) -> Self {
        WireError::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }

    /// For reconstruction errors, the error of the failing stage.
    pub fn root_cause(&self) -> &WireError {
        match self {
            WireError::Reconstruction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
