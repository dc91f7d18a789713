//! Protocol lanes (Binary + Text).
//!
//! - Binary lane: fixed-order, unnamed fields, varint-prefixed strings/lists.
//! - Text lane: JSON objects with named fields, order-independent.
//!
//! All decoders are panic-free: malformed input is reported as `WireError`
//! instead of panicking or indexing raw buffers.

pub mod text;
pub mod wire;
