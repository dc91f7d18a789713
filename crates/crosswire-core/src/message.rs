//! Message contracts shared by the binary and text lanes.
//!
//! A message type supplies its own field list through these traits; the
//! codecs only provide the primitives it composes.

use serde_json::Value;

use crate::error::Result;
use crate::protocol::text::TextContext;
use crate::protocol::wire::{StreamInput, StreamOutput};

/// Encode-only contract. This is all an opaque handle exposes.
pub trait Writeable {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()>;
}

/// Binary decode constructor.
pub trait Readable: Sized {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self>;
}

/// Text encoder (named fields).
pub trait ToText {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value>;
}

/// Text decoder (named fields, any order, unknown names skipped).
pub trait FromText: Sized {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self>;
}

/// A message type usable on both lanes.
pub trait Message: Writeable + Readable + ToText + FromText {
    /// Name used in logs and error reports.
    const NAME: &'static str;
}

/// Domain validation run by collaborators after a successful decode.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Enum carried as an `i32` ordinal on the binary lane and as a tag string on
/// the text lane.
///
/// `VALUES` is the declared order; appending is compatible, reordering is not.
pub trait WireEnum: Sized + Copy + PartialEq + 'static {
    const NAME: &'static str;
    const VALUES: &'static [Self];

    fn tag(self) -> &'static str;

    /// Value substituted for an unrecognized text tag, if the enum has one.
    fn fallback() -> Option<Self> {
        None
    }

    fn ordinal(self) -> i32 {
        Self::VALUES
            .iter()
            .position(|v| *v == self)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(i32::MAX)
    }

    fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::VALUES.get(i).copied())
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::VALUES.iter().copied().find(|v| v.tag() == tag)
    }
}
