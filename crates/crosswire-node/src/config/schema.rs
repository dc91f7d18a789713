use serde::Deserialize;

use crosswire_core::{DecodeLimits, Registries, Result, WireError};
use crosswire_messages::{registries_for, CHANNEL_TAGS, TRIGGER_TAGS};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub codec: DecodeLimits,

    #[serde(default)]
    pub registry: RegistrySection,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WireError::Config(format!(
                "unsupported config version {} (expected 1)",
                self.version
            )));
        }
        self.node.validate()?;
        self.codec.validate()?;
        self.registry.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    #[serde(default = "default_node_name")]
    pub name: String,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            name: default_node_name(),
        }
    }
}

impl NodeSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WireError::Config("node.name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_node_name() -> String {
    "crosswire-node".into()
}

/// Variant tags this node registers. `None` means every tag built in.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    #[serde(default)]
    pub channels: Option<Vec<String>>,

    #[serde(default)]
    pub triggers: Option<Vec<String>>,
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        check_tags("registry.channels", self.channels.as_deref(), CHANNEL_TAGS)?;
        check_tags("registry.triggers", self.triggers.as_deref(), TRIGGER_TAGS)
    }

    pub fn channel_tags(&self) -> Vec<&str> {
        tags_or_all(self.channels.as_deref(), CHANNEL_TAGS)
    }

    pub fn trigger_tags(&self) -> Vec<&str> {
        tags_or_all(self.triggers.as_deref(), TRIGGER_TAGS)
    }

    /// Build the immutable registry set for this node.
    pub fn build(&self) -> Result<Registries> {
        registries_for(&self.channel_tags(), &self.trigger_tags())
    }
}

fn tags_or_all<'a>(configured: Option<&'a [String]>, all: &[&'static str]) -> Vec<&'a str> {
    match configured {
        Some(tags) => tags.iter().map(String::as_str).collect(),
        None => all.to_vec(),
    }
}

fn check_tags(field: &str, tags: Option<&[String]>, known: &[&str]) -> Result<()> {
    let Some(tags) = tags else {
        return Ok(());
    };
    if tags.is_empty() {
        return Err(WireError::Config(format!("{field} must not be empty")));
    }
    for (i, tag) in tags.iter().enumerate() {
        if !known.contains(&tag.as_str()) {
            return Err(WireError::Config(format!(
                "{field} has unknown tag `{tag}` (known: {})",
                known.join(", ")
            )));
        }
        if tags[..i].contains(tag) {
            return Err(WireError::Config(format!("{field} lists `{tag}` twice")));
        }
    }
    Ok(())
}
