//! crosswire core: dual-lane message codecs, type registry, tolerant decoding
//! and cross-boundary reconstruction.
//!
//! This crate defines the wire-level contracts and error surface shared by
//! the message catalogue and the node runtime. It carries no transport or
//! runtime dependencies; every codec call is a synchronous, pure
//! transformation over an in-memory buffer.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `WireError`/`Result` so a node does not
//! crash on truncated or hostile input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod codec;
pub mod error;
pub mod limits;
pub mod message;
pub mod protocol;
pub mod reconstruct;
pub mod registry;
pub mod resilient;

pub use codec::Codec;
/// Shared result type.
pub use error::{ErrorCode, Result, WireError};
pub use limits::DecodeLimits;
pub use message::{FromText, Message, Readable, ToText, Validate, WireEnum, Writeable};
pub use protocol::text::{ObjectReader, ObjectWriter, TextContext};
pub use protocol::wire::{StreamInput, StreamOutput};
pub use reconstruct::{reconstruct, reconstruct_with, OpaqueHandle};
pub use registry::{Registries, TypeRegistry, VariantCodec, VariantFamily};
pub use resilient::{
    DecodeReport, Decoded, FieldSpec, FieldStatus, ResilientDecoder, SentinelPolicy,
    TolerantReadable,
};
