//! Tolerant field-by-field decoding for rolling upgrades.
//!
//! A message type opts in per field: each [`FieldSpec`] names a sentinel
//! value and a [`SentinelPolicy`]. The decoder never aborts; it substitutes
//! sentinels and returns a [`DecodeReport`] saying which fields were defaulted.
//!
//! Once a field fails, the stream position is no longer trustworthy, so every
//! later field is defaulted as well.

use crate::error::{Result, WireError};
use crate::protocol::wire::StreamInput;

/// What a collaborator must do with a message whose field was defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// The message is unusable without this field.
    RejectMessage,
    /// The message may be used with reduced functionality.
    ReducedFunctionality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Decoded,
    DefaultedDueToSkew { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub name: &'static str,
    pub policy: SentinelPolicy,
    pub status: FieldStatus,
}

impl FieldOutcome {
    pub fn is_defaulted(&self) -> bool {
        matches!(self.status, FieldStatus::DefaultedDueToSkew { .. })
    }
}

/// Per-field status for one tolerant decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub message: &'static str,
    pub fields: Vec<FieldOutcome>,
    /// Bytes left after the last field (fields appended by a newer producer).
    pub trailing_bytes: usize,
}

impl DecodeReport {
    pub fn is_degraded(&self) -> bool {
        self.fields.iter().any(FieldOutcome::is_defaulted)
    }

    pub fn defaulted(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.is_defaulted())
            .map(|f| f.name)
            .collect()
    }

    /// Defaulted fields whose policy rejects the message.
    pub fn rejected_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.is_defaulted() && f.policy == SentinelPolicy::RejectMessage)
            .map(|f| f.name)
            .collect()
    }

    pub fn status_of(&self, name: &str) -> Option<&FieldStatus> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.status)
    }

    /// Whether `name` holds its sentinel rather than decoded data.
    pub fn is_defaulted(&self, name: &str) -> bool {
        matches!(self.status_of(name), Some(FieldStatus::DefaultedDueToSkew { .. }))
    }
}

/// A tolerantly decoded value and its report.
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub report: DecodeReport,
}

impl<T> Decoded<T> {
    /// Apply the per-field policies: reject, or accept with a warning when
    /// only reduced-functionality fields were defaulted.
    pub fn accept(self) -> Result<T> {
        let rejected = self.report.rejected_fields();
        if !rejected.is_empty() {
            return Err(WireError::MessageRejected {
                message: self.report.message,
                fields: rejected,
            });
        }
        if self.report.is_degraded() {
            tracing::warn!(
                message = self.report.message,
                defaulted = ?self.report.defaulted(),
                "accepting message with reduced functionality"
            );
        }
        Ok(self.value)
    }
}

/// Documented fallback for one field.
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub policy: SentinelPolicy,
    pub sentinel: fn() -> T,
}

impl<T> Clone for FieldSpec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldSpec<T> {}

/// Message types decodable through [`ResilientDecoder`].
pub trait TolerantReadable: Sized {
    fn read_tolerant(input: &mut StreamInput<'_>) -> Decoded<Self>;
}

/// Runs independent field steps over one message.
pub struct ResilientDecoder<'i, 'r> {
    message: &'static str,
    input: &'i mut StreamInput<'r>,
    fields: Vec<FieldOutcome>,
    failed_at: Option<&'static str>,
}

impl<'i, 'r> ResilientDecoder<'i, 'r> {
    pub fn new(message: &'static str, input: &'i mut StreamInput<'r>) -> Self {
        Self {
            message,
            input,
            fields: Vec::new(),
            failed_at: None,
        }
    }

    /// Decode one field, or substitute its sentinel.
    pub fn field<T>(
        &mut self,
        spec: FieldSpec<T>,
        step: impl FnOnce(&mut StreamInput<'r>) -> Result<T>,
    ) -> T {
        if let Some(earlier) = self.failed_at {
            return self.default_field(spec, format!("preceding field `{earlier}` failed"));
        }

        let snapshot = self.input.snapshot();
        match step(&mut *self.input) {
            Ok(v) => {
                self.fields.push(FieldOutcome {
                    name: spec.name,
                    policy: spec.policy,
                    status: FieldStatus::Decoded,
                });
                v
            }
            Err(e) => {
                self.input.restore(snapshot);
                self.failed_at = Some(spec.name);
                tracing::warn!(
                    message = self.message,
                    field = spec.name,
                    policy = ?spec.policy,
                    error = %e,
                    "field defaulted to sentinel"
                );
                self.default_field(spec, e.to_string())
            }
        }
    }

    fn default_field<T>(&mut self, spec: FieldSpec<T>, reason: String) -> T {
        self.fields.push(FieldOutcome {
            name: spec.name,
            policy: spec.policy,
            status: FieldStatus::DefaultedDueToSkew { reason },
        });
        (spec.sentinel)()
    }

    /// Consume the rest of the message and produce the report.
    pub fn finish<T>(self, value: T) -> Decoded<T> {
        let trailing_bytes = self.input.drain();
        if trailing_bytes > 0 && self.failed_at.is_none() {
            tracing::debug!(
                message = self.message,
                trailing_bytes,
                "ignoring fields appended by a newer producer"
            );
        }
        Decoded {
            value,
            report: DecodeReport {
                message: self.message,
                fields: self.fields,
                trailing_bytes,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::protocol::wire::StreamOutput;

    const COUNT: FieldSpec<i32> = FieldSpec {
        name: "count",
        policy: SentinelPolicy::RejectMessage,
        sentinel: minus_one,
    };
    const LABEL: FieldSpec<String> = FieldSpec {
        name: "label",
        policy: SentinelPolicy::ReducedFunctionality,
        sentinel: String::new,
    };

    fn minus_one() -> i32 {
        -1
    }

    fn decode(bytes: bytes::Bytes) -> Decoded<(i32, String)> {
        let mut input = StreamInput::new(bytes);
        let mut d = ResilientDecoder::new("Sample", &mut input);
        let count = d.field(COUNT, |i| i.read_i32());
        let label = d.field(LABEL, |i| i.read_string());
        d.finish((count, label))
    }

    #[test]
    fn full_stream_decodes_every_field() {
        let mut out = StreamOutput::new();
        out.write_i32(3);
        out.write_string("x").unwrap();
        let d = decode(out.freeze());
        assert!(!d.report.is_degraded());
        assert_eq!(d.accept().unwrap(), (3, "x".to_string()));
    }

    #[test]
    fn missing_tail_is_reduced() {
        let mut out = StreamOutput::new();
        out.write_i32(3);
        let d = decode(out.freeze());
        assert_eq!(d.report.defaulted(), vec!["label"]);
        assert!(d.report.rejected_fields().is_empty());
        assert_eq!(d.accept().unwrap(), (3, String::new()));
    }

    #[test]
    fn failure_defaults_later_fields() {
        let d = decode(bytes::Bytes::from_static(&[0, 0]));
        assert_eq!(d.report.defaulted(), vec!["count", "label"]);
        assert!(matches!(
            d.report.status_of("label"),
            Some(FieldStatus::DefaultedDueToSkew { reason }) if reason.contains("count")
        ));
        let err = d.accept().unwrap_err();
        assert_eq!(err.code().as_str(), "MESSAGE_REJECTED");
    }

    #[test]
    fn trailing_fields_are_reported() {
        let mut out = StreamOutput::new();
        out.write_i32(1);
        out.write_string("a").unwrap();
        out.write_bool(true);
        let d = decode(out.freeze());
        assert_eq!(d.report.trailing_bytes, 1);
        assert!(!d.report.is_degraded());
    }
}
