//! Cross-boundary reconstruction.
//!
//! A value received through [`OpaqueHandle`] is never downcast. It is written
//! with its own binary encoder and immediately re-read with the local target's
//! decoder, so the caller always ends up holding a locally constructed value.

use std::fmt;

use crate::error::{ReconstructStage, Result, WireError};
use crate::limits::DecodeLimits;
use crate::message::{Readable, Writeable};
use crate::protocol::wire::{StreamInput, StreamOutput};
use crate::registry::Registries;

/// Encode-only view of a value whose concrete type the receiver does not trust.
pub struct OpaqueHandle {
    inner: Box<dyn Writeable + Send + Sync>,
    type_name: &'static str,
}

impl OpaqueHandle {
    pub fn new<T: Writeable + Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Producer-side type name (diagnostics only).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Consume the handle, yielding a local `T`.
    pub fn reconstruct<T: Readable>(self) -> Result<T> {
        round_trip(self.inner.as_ref(), None)
    }

    /// As [`OpaqueHandle::reconstruct`], resolving variant fields through `registries`.
    pub fn reconstruct_with<T: Readable>(self, registries: &Registries) -> Result<T> {
        round_trip(self.inner.as_ref(), Some(registries))
    }
}

impl Writeable for OpaqueHandle {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        self.inner.write_to(out)
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueHandle")
            .field("type_name", &self.type_name)
            .finish()
    }
}

pub fn reconstruct<T: Readable>(value: &dyn Writeable) -> Result<T> {
    round_trip(value, None)
}

pub fn reconstruct_with<T: Readable>(value: &dyn Writeable, registries: &Registries) -> Result<T> {
    round_trip(value, Some(registries))
}

fn round_trip<T: Readable>(value: &dyn Writeable, registries: Option<&Registries>) -> Result<T> {
    let mut out = match registries {
        Some(r) => StreamOutput::with_registries(r),
        None => StreamOutput::new(),
    };
    value
        .write_to(&mut out)
        .map_err(|e| failed(ReconstructStage::Encode, e))?;

    let input = StreamInput::new(out.freeze()).with_limits(DecodeLimits::ceiling());
    let mut input = match registries {
        Some(r) => input.with_registries(r),
        None => input,
    };
    let target = T::read_from(&mut input).map_err(|e| failed(ReconstructStage::Decode, e))?;
    if !input.is_empty() {
        tracing::debug!(
            target_type = std::any::type_name::<T>(),
            trailing = input.remaining(),
            "reconstruction ignored trailing bytes"
        );
    }
    Ok(target)
}

fn failed(stage: ReconstructStage, source: WireError) -> WireError {
    tracing::debug!(%stage, error = %source, "reconstruction failed");
    WireError::Reconstruction {
        stage,
        source: Box::new(source),
    }
}
