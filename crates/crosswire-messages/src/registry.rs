//! Startup registry builders.
//!
//! A node registers only the variant tags it knows; an older node simply
//! passes a shorter tag list. The result is immutable and shared by reference.

use crosswire_core::{Registries, Result, TypeRegistry, WireError};

use crate::alerting::trigger::{
    Trigger, BUCKET_LEVEL_TRIGGER, DOCUMENT_LEVEL_TRIGGER, QUERY_LEVEL_TRIGGER,
};
use crate::notifications::channel::ChannelConfig;

/// Every channel tag built into this crate.
pub const CHANNEL_TAGS: &[&str] = &["slack", "chime", "microsoft_teams", "webhook", "sns", "email"];

/// Every trigger tag built into this crate.
pub const TRIGGER_TAGS: &[&str] = &[
    QUERY_LEVEL_TRIGGER,
    BUCKET_LEVEL_TRIGGER,
    DOCUMENT_LEVEL_TRIGGER,
];

pub fn channel_registry<S: AsRef<str>>(tags: &[S]) -> Result<TypeRegistry<ChannelConfig>> {
    let mut builder = TypeRegistry::builder();
    for tag in tags {
        builder = match tag.as_ref() {
            "slack" => builder.register("slack", ChannelConfig::Slack, ChannelConfig::as_slack),
            "chime" => builder.register("chime", ChannelConfig::Chime, ChannelConfig::as_chime),
            "microsoft_teams" => builder.register(
                "microsoft_teams",
                ChannelConfig::MicrosoftTeams,
                ChannelConfig::as_microsoft_teams,
            ),
            "webhook" => {
                builder.register("webhook", ChannelConfig::Webhook, ChannelConfig::as_webhook)
            }
            "sns" => builder.register("sns", ChannelConfig::Sns, ChannelConfig::as_sns),
            "email" => builder.register("email", ChannelConfig::Email, ChannelConfig::as_email),
            other => return Err(unknown_tag("channel", other, CHANNEL_TAGS)),
        };
    }
    builder.build()
}

pub fn trigger_registry<S: AsRef<str>>(tags: &[S]) -> Result<TypeRegistry<Trigger>> {
    let mut builder = TypeRegistry::builder();
    for tag in tags {
        builder = match tag.as_ref() {
            QUERY_LEVEL_TRIGGER => builder.register(
                QUERY_LEVEL_TRIGGER,
                Trigger::QueryLevel,
                Trigger::as_query_level,
            ),
            BUCKET_LEVEL_TRIGGER => builder.register(
                BUCKET_LEVEL_TRIGGER,
                Trigger::BucketLevel,
                Trigger::as_bucket_level,
            ),
            DOCUMENT_LEVEL_TRIGGER => builder.register(
                DOCUMENT_LEVEL_TRIGGER,
                Trigger::DocumentLevel,
                Trigger::as_document_level,
            ),
            other => return Err(unknown_tag("trigger", other, TRIGGER_TAGS)),
        };
    }
    builder.build()
}

fn unknown_tag(family: &str, tag: &str, known: &[&str]) -> WireError {
    WireError::Config(format!(
        "unknown {family} tag `{tag}` (known: {})",
        known.join(", ")
    ))
}

/// Registries for the given channel and trigger tags.
pub fn registries_for<S: AsRef<str>>(channels: &[S], triggers: &[S]) -> Result<Registries> {
    let regs = Registries::builder()
        .family(channel_registry(channels)?)
        .family(trigger_registry(triggers)?)
        .build()?;
    tracing::debug!(families = ?regs.families(), "registries built");
    Ok(regs)
}

/// Everything built into this crate.
pub fn standard_registries() -> Result<Registries> {
    registries_for(CHANNEL_TAGS, TRIGGER_TAGS)
}
