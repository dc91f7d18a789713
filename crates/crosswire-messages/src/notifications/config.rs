//! Notification config: a named, typed channel definition.

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, Validate, WireEnum,
    WireError, Writeable,
};

use crate::notifications::channel::ChannelConfig;
use crate::notifications::types::ConfigType;
use crate::validate;

const CONFIG_NAME: &str = "name";
const DESCRIPTION: &str = "description";
const CONFIG_TYPE: &str = "config_type";
const IS_ENABLED: &str = "is_enabled";
const CONFIG: &str = "config";

/// `config` is absent only for `config_type: none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub name: String,
    pub description: String,
    pub config_type: ConfigType,
    pub is_enabled: bool,
    pub config: Option<ChannelConfig>,
}

impl NotificationConfig {
    /// Enabled config whose type follows the channel it carries.
    pub fn new(name: impl Into<String>, channel: ChannelConfig) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            config_type: channel.config_type(),
            is_enabled: true,
            config: Some(channel),
        }
    }
}

impl Writeable for NotificationConfig {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.name)?;
        out.write_string(&self.description)?;
        out.write_enum(self.config_type);
        out.write_bool(self.is_enabled);
        out.write_optional_variant(self.config.as_ref())
    }
}

impl Readable for NotificationConfig {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            name: input.read_string()?,
            description: input.read_string()?,
            config_type: input.read_enum()?,
            is_enabled: input.read_bool()?,
            config: input.read_optional_variant()?,
        })
    }
}

impl ToText for NotificationConfig {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(CONFIG_NAME, self.name.as_str())
            .field(DESCRIPTION, self.description.as_str())
            .enum_tag(CONFIG_TYPE, self.config_type)
            .field(IS_ENABLED, self.is_enabled)
            .variant_if_some(CONFIG, self.config.as_ref(), cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for NotificationConfig {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut name, mut config_type, mut config) = (None, None, None);
        let mut description = String::new();
        let mut is_enabled = true;
        for (field, v) in obj.fields() {
            match field {
                CONFIG_NAME => name = Some(text::string(field, v)?),
                DESCRIPTION => description = text::string(field, v)?,
                CONFIG_TYPE => config_type = Some(text::enum_tag(field, v)?),
                IS_ENABLED => is_enabled = text::boolean(field, v)?,
                CONFIG if v.is_null() => config = None,
                CONFIG => config = Some(text::variant(field, v, cx)?),
                _ => obj.skip(field),
            }
        }
        Ok(Self {
            name: text::required(name, CONFIG_NAME)?,
            description,
            config_type: text::required(config_type, CONFIG_TYPE)?,
            is_enabled,
            config,
        })
    }
}

impl Message for NotificationConfig {
    const NAME: &'static str = "NotificationConfig";
}

impl Validate for NotificationConfig {
    fn validate(&self) -> Result<()> {
        validate::non_empty(CONFIG_NAME, &self.name)?;
        match (&self.config, self.config_type) {
            (None, ConfigType::None) => Ok(()),
            (None, t) => Err(WireError::InvalidValue(format!(
                "{CONFIG_TYPE} `{}` requires a {CONFIG}",
                t.tag()
            ))),
            (Some(c), t) if c.config_type() != t => Err(WireError::InvalidValue(format!(
                "{CONFIG_TYPE} `{}` does not match {CONFIG} `{}`",
                t.tag(),
                c.config_type().tag()
            ))),
            (Some(c), _) => c.validate(),
        }
    }
}
