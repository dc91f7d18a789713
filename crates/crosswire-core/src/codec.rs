//! Session-level entry points bundling limits and registries.

use bytes::Bytes;
use serde_json::Value;

use crate::error::{Result, WireError};
use crate::limits::DecodeLimits;
use crate::message::{FromText, Readable, ToText, Writeable};
use crate::protocol::text::{self, TextContext};
use crate::protocol::wire::{StreamInput, StreamOutput};
use crate::registry::Registries;
use crate::resilient::{Decoded, TolerantReadable};

/// Decode limits plus the registries variant fields resolve through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec<'r> {
    limits: DecodeLimits,
    registries: Option<&'r Registries>,
}

impl Codec<'static> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'r> Codec<'r> {
    pub fn with_registries<'a>(self, registries: &'a Registries) -> Codec<'a> {
        Codec {
            limits: self.limits,
            registries: Some(registries),
        }
    }

    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    pub fn registries(&self) -> Option<&'r Registries> {
        self.registries
    }

    pub fn output(&self) -> StreamOutput<'r> {
        match self.registries {
            Some(r) => StreamOutput::with_registries(r),
            None => StreamOutput::new(),
        }
    }

    pub fn input(&self, bytes: impl Into<Bytes>) -> StreamInput<'r> {
        let input = StreamInput::new(bytes).with_limits(self.limits);
        match self.registries {
            Some(r) => input.with_registries(r),
            None => input,
        }
    }

    pub fn text_context(&self) -> TextContext<'r> {
        match self.registries {
            Some(r) => TextContext::with_registries(r),
            None => TextContext::new(),
        }
    }

    pub fn encode<T: Writeable + ?Sized>(&self, value: &T) -> Result<Bytes> {
        let mut out = self.output();
        value.write_to(&mut out)?;
        Ok(out.freeze())
    }

    /// Decode a whole buffer; trailing bytes are an error.
    pub fn decode<T: Readable>(&self, bytes: impl Into<Bytes>) -> Result<T> {
        let mut input = self.input(bytes);
        let value = T::read_from(&mut input)?;
        input.ensure_consumed(std::any::type_name::<T>())?;
        Ok(value)
    }

    pub fn decode_tolerant<T: TolerantReadable>(&self, bytes: impl Into<Bytes>) -> Decoded<T> {
        T::read_tolerant(&mut self.input(bytes))
    }

    pub fn to_text<T: ToText + ?Sized>(&self, value: &T) -> Result<Value> {
        value.to_text(&self.text_context())
    }

    pub fn from_text<T: FromText>(&self, value: &Value) -> Result<T> {
        T::from_text(value, &self.text_context())
    }

    pub fn to_json<T: ToText + ?Sized>(&self, value: &T) -> Result<String> {
        let tree = self.to_text(value)?;
        serde_json::to_string(&tree).map_err(|e| WireError::Encode(e.to_string()))
    }

    pub fn from_json<T: FromText>(&self, s: &str) -> Result<T> {
        let tree = text::parse(s)?;
        self.from_text(&tree)
    }
}
