//! Binary lane: fixed-order, unnamed-field stream codec (panic-free).
//!
//! Layout rules:
//! - Integers are fixed width, big-endian.
//! - Lengths and counts are unsigned LEB128 varints (`u32`, at most 5 bytes).
//! - Nothing is self-describing; the decoder must know the schema it reads.
//!
//! Parsing rules:
//! - Never index raw buffers; check `remaining()` before every `get_*`.
//! - Length prefixes are bounded by [`DecodeLimits`] before allocating.
//! - Trailing bytes are not an error here; see [`StreamInput::ensure_consumed`].

use std::collections::BTreeMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};
use crate::limits::DecodeLimits;
use crate::message::{Readable, WireEnum, Writeable};
use crate::registry::{Registries, TypeRegistry, VariantFamily};

/// Maximum encoded size of a `u32` varint.
pub const MAX_VINT_BYTES: usize = 5;

/// Byte sink for the binary lane.
pub struct StreamOutput<'r> {
    buf: BytesMut,
    registries: Option<&'r Registries>,
}

impl StreamOutput<'static> {
    /// Output without polymorphic dispatch; writing a variant fails.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            registries: None,
        }
    }
}

impl Default for StreamOutput<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> StreamOutput<'r> {
    pub fn with_registries(registries: &'r Registries) -> Self {
        Self {
            buf: BytesMut::new(),
            registries: Some(registries),
        }
    }

    pub fn registries(&self) -> Option<&'r Registries> {
        self.registries
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.put_u8(u8::from(v));
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    pub fn write_vint(&mut self, mut v: u32) {
        while v >= 0x80 {
            self.buf.put_u8((v & 0x7f) as u8 | 0x80);
            v >>= 7;
        }
        self.buf.put_u8(v as u8);
    }

    fn write_len(&mut self, len: usize, what: &str) -> Result<()> {
        let v = u32::try_from(len)
            .map_err(|_| WireError::Encode(format!("{what} length {len} does not fit in u32")))?;
        self.write_vint(v);
        Ok(())
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_len(s.len(), "string")?;
        self.buf.put_slice(s.as_bytes());
        Ok(())
    }

    pub fn write_enum<E: WireEnum>(&mut self, e: E) {
        self.write_i32(e.ordinal());
    }

    pub fn write_optional<T: ?Sized>(
        &mut self,
        value: Option<&T>,
        f: impl FnOnce(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        match value {
            Some(v) => {
                self.write_bool(true);
                f(self, v)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    pub fn write_optional_string(&mut self, value: Option<&str>) -> Result<()> {
        self.write_optional(value, |out, s| out.write_string(s))
    }

    pub fn write_list<T>(
        &mut self,
        items: &[T],
        mut f: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        self.write_len(items.len(), "list")?;
        for item in items {
            f(self, item)?;
        }
        Ok(())
    }

    pub fn write_string_list(&mut self, items: &[String]) -> Result<()> {
        self.write_list(items, |out, s| out.write_string(s))
    }

    /// Entries are written in key order, so equal maps encode identically.
    pub fn write_string_map(&mut self, map: &BTreeMap<String, String>) -> Result<()> {
        self.write_len(map.len(), "map")?;
        for (k, v) in map {
            self.write_string(k)?;
            self.write_string(v)?;
        }
        Ok(())
    }

    pub fn write_message<T: Writeable + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.write_to(self)
    }

    pub fn write_optional_message<T: Writeable>(&mut self, value: Option<&T>) -> Result<()> {
        self.write_optional(value, |out, v| v.write_to(out))
    }

    pub fn write_message_list<T: Writeable>(&mut self, items: &[T]) -> Result<()> {
        self.write_list(items, |out, v| v.write_to(out))
    }

    /// Tag string, then the variant's own layout.
    pub fn write_variant<F: VariantFamily>(&mut self, value: &F) -> Result<()> {
        let registry = family_registry::<F>(self.registries, value.variant_tag())?;
        let tag = registry.registered_tag(value)?;
        self.write_string(tag)?;
        registry.encode_binary(value, self)?;
        Ok(())
    }

    pub fn write_optional_variant<F: VariantFamily>(&mut self, value: Option<&F>) -> Result<()> {
        self.write_optional(value, |out, v| out.write_variant(v))
    }

    pub fn write_variant_list<F: VariantFamily>(&mut self, items: &[F]) -> Result<()> {
        self.write_list(items, |out, v| out.write_variant(v))
    }
}

/// Byte source for the binary lane.
pub struct StreamInput<'r> {
    buf: Bytes,
    limits: DecodeLimits,
    registries: Option<&'r Registries>,
}

impl StreamInput<'static> {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            buf: buf.into(),
            limits: DecodeLimits::default(),
            registries: None,
        }
    }
}

impl<'r> StreamInput<'r> {
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_registries<'a>(self, registries: &'a Registries) -> StreamInput<'a> {
        StreamInput {
            buf: self.buf,
            limits: self.limits,
            registries: Some(registries),
        }
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    pub fn registries(&self) -> Option<&'r Registries> {
        self.registries
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Cheap position snapshot (reference-counted view of the rest).
    pub(crate) fn snapshot(&self) -> Bytes {
        self.buf.clone()
    }

    pub(crate) fn restore(&mut self, snapshot: Bytes) {
        self.buf = snapshot;
    }

    /// Discard whatever is left; returns the number of bytes dropped.
    pub fn drain(&mut self) -> usize {
        let n = self.buf.remaining();
        self.buf.advance(n);
        n
    }

    /// Fail if bytes remain after `message` was decoded.
    pub fn ensure_consumed(&self, message: &str) -> Result<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(WireError::Decode(format!(
                "{n} trailing bytes after {message}"
            ))),
        }
    }

    fn need(&self, n: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(WireError::Decode(format!(
                "truncated {what}: need {n} bytes, {} remaining",
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.need(1, "bool")?;
        match self.buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(WireError::Decode(format!("invalid bool byte 0x{b:02x}"))),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4, "i32")?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.need(8, "i64")?;
        Ok(self.buf.get_i64())
    }

    pub fn read_vint(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for i in 0..MAX_VINT_BYTES {
            self.need(1, "varint")?;
            let b = self.buf.get_u8();
            if i == MAX_VINT_BYTES - 1 && (b & 0xf0) != 0 {
                return Err(WireError::Decode("varint overflows u32".into()));
            }
            value |= u32::from(b & 0x7f) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::Decode("varint longer than 5 bytes".into()))
    }

    fn read_len(&mut self, bound: usize, what: &str) -> Result<usize> {
        let len = usize::try_from(self.read_vint()?)
            .map_err(|_| WireError::Decode(format!("{what} length does not fit in usize")))?;
        if len > bound {
            return Err(WireError::Decode(format!(
                "{what} length {len} exceeds limit {bound}"
            )));
        }
        Ok(len)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len(self.limits.max_string_bytes, "string")?;
        self.need(len, "string")?;
        let raw = self.buf.split_to(len);
        std::str::from_utf8(&raw)
            .map(str::to_owned)
            .map_err(|e| WireError::Decode(format!("string is not utf-8: {e}")))
    }

    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E> {
        let ordinal = self.read_i32()?;
        E::from_ordinal(ordinal).ok_or_else(|| {
            WireError::Decode(format!("{} ordinal {ordinal} out of range", E::NAME))
        })
    }

    pub fn read_optional<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.read_bool()? {
            f(self).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn read_optional_string(&mut self) -> Result<Option<String>> {
        self.read_optional(|input| input.read_string())
    }

    pub fn read_list<T>(&mut self, mut f: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let count = self.read_len(self.limits.max_list_len, "list")?;
        // every element takes at least one byte
        let mut out = Vec::with_capacity(count.min(self.buf.remaining()));
        for _ in 0..count {
            out.push(f(self)?);
        }
        Ok(out)
    }

    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        self.read_list(|input| input.read_string())
    }

    pub fn read_string_map(&mut self) -> Result<BTreeMap<String, String>> {
        let count = self.read_len(self.limits.max_list_len, "map")?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = self.read_string()?;
            let v = self.read_string()?;
            if out.insert(k, v).is_some() {
                return Err(WireError::Decode("duplicate map key".into()));
            }
        }
        Ok(out)
    }

    pub fn read_message<T: Readable>(&mut self) -> Result<T> {
        T::read_from(self)
    }

    pub fn read_optional_message<T: Readable>(&mut self) -> Result<Option<T>> {
        self.read_optional(|input| T::read_from(input))
    }

    pub fn read_message_list<T: Readable>(&mut self) -> Result<Vec<T>> {
        self.read_list(|input| T::read_from(input))
    }

    /// Tag string, then the tagged variant's layout resolved via the registry.
    pub fn read_variant<F: VariantFamily>(&mut self) -> Result<F> {
        let tag = self.read_string()?;
        let registry = family_registry::<F>(self.registries, &tag)?;
        registry.decode_binary(&tag, self)
    }

    pub fn read_optional_variant<F: VariantFamily>(&mut self) -> Result<Option<F>> {
        self.read_optional(|input| input.read_variant())
    }

    pub fn read_variant_list<F: VariantFamily>(&mut self) -> Result<Vec<F>> {
        self.read_list(|input| input.read_variant())
    }
}

/// A missing family registry means no tag of that family is known.
pub(crate) fn family_registry<'a, F: VariantFamily>(
    registries: Option<&'a Registries>,
    tag: &str,
) -> Result<&'a TypeRegistry<F>> {
    registries
        .and_then(|r| r.get::<F>())
        .ok_or_else(|| WireError::UnknownVariant {
            family: F::FAMILY,
            tag: tag.to_string(),
        })
}
