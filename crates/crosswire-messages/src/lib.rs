//! crosswire message catalogue.
//!
//! Notification and alerting messages built on `crosswire-core`, plus the
//! startup builders for their variant registries. Domain checks live in
//! `Validate` impls and run after decoding, never inside the codecs.

pub mod alerting;
pub mod notifications;
pub mod registry;
pub mod validate;

pub use registry::{
    channel_registry, registries_for, standard_registries, trigger_registry, CHANNEL_TAGS,
    TRIGGER_TAGS,
};
