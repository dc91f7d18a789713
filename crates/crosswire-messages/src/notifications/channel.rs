//! Channel config variants (registry family `channel`).
//!
//! Each variant's tag equals its [`ConfigType`] tag.

use std::collections::BTreeMap;

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, Validate,
    VariantFamily, WireEnum, Writeable,
};

use crate::notifications::types::{ConfigType, HttpMethodType};
use crate::validate;

const URL: &str = "url";
const HEADER_PARAMS: &str = "header_params";
const METHOD: &str = "method";
const TOPIC_ARN: &str = "topic_arn";
const ROLE_ARN: &str = "role_arn";
const EMAIL_ACCOUNT_ID: &str = "email_account_id";
const RECIPIENT_LIST: &str = "recipient_list";
const EMAIL_GROUP_ID_LIST: &str = "email_group_id_list";
const RECIPIENT: &str = "recipient";

/// Channels configured by a single webhook url.
macro_rules! url_channel {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub url: String,
        }

        impl $name {
            pub fn new(url: impl Into<String>) -> Self {
                Self { url: url.into() }
            }
        }

        impl Writeable for $name {
            fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
                out.write_string(&self.url)
            }
        }

        impl Readable for $name {
            fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
                Ok(Self {
                    url: input.read_string()?,
                })
            }
        }

        impl ToText for $name {
            fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
                Ok(ObjectWriter::new().field(URL, self.url.as_str()).finish())
            }
        }

        impl FromText for $name {
            fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
                let obj = ObjectReader::new(Self::NAME, value)?;
                let mut url = None;
                for (name, v) in obj.fields() {
                    match name {
                        URL => url = Some(text::string(name, v)?),
                        _ => obj.skip(name),
                    }
                }
                Ok(Self {
                    url: text::required(url, URL)?,
                })
            }
        }

        impl Message for $name {
            const NAME: &'static str = stringify!($name);
        }

        impl Validate for $name {
            fn validate(&self) -> Result<()> {
                validate::url(URL, &self.url)
            }
        }
    };
}

url_channel!(Slack);
url_channel!(Chime);
url_channel!(
    /// Microsoft Teams incoming webhook.
    MicrosoftTeams
);

/// Generic HTTP webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub url: String,
    pub header_params: BTreeMap<String, String>,
    pub method: HttpMethodType,
}

impl Webhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            header_params: BTreeMap::new(),
            method: HttpMethodType::Post,
        }
    }
}

impl Writeable for Webhook {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.url)?;
        out.write_string_map(&self.header_params)?;
        out.write_enum(self.method);
        Ok(())
    }
}

impl Readable for Webhook {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            url: input.read_string()?,
            header_params: input.read_string_map()?,
            method: input.read_enum()?,
        })
    }
}

impl ToText for Webhook {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(URL, self.url.as_str())
            .string_map(HEADER_PARAMS, &self.header_params)
            .enum_tag(METHOD, self.method)
            .finish())
    }
}

impl FromText for Webhook {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut url = None;
        let mut header_params = BTreeMap::new();
        let mut method = HttpMethodType::Post;
        for (name, v) in obj.fields() {
            match name {
                URL => url = Some(text::string(name, v)?),
                HEADER_PARAMS => header_params = text::string_map(name, v)?,
                METHOD => method = text::enum_tag(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            url: text::required(url, URL)?,
            header_params,
            method,
        })
    }
}

impl Message for Webhook {
    const NAME: &'static str = "Webhook";
}

impl Validate for Webhook {
    fn validate(&self) -> Result<()> {
        validate::url(URL, &self.url)
    }
}

/// Amazon SNS topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sns {
    pub topic_arn: String,
    pub role_arn: Option<String>,
}

impl Writeable for Sns {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.topic_arn)?;
        out.write_optional_string(self.role_arn.as_deref())
    }
}

impl Readable for Sns {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            topic_arn: input.read_string()?,
            role_arn: input.read_optional_string()?,
        })
    }
}

impl ToText for Sns {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(TOPIC_ARN, self.topic_arn.as_str())
            .field_if_some(ROLE_ARN, self.role_arn.as_deref())
            .finish())
    }
}

impl FromText for Sns {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut topic_arn, mut role_arn) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                TOPIC_ARN => topic_arn = Some(text::string(name, v)?),
                ROLE_ARN => role_arn = text::string_or_null(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            topic_arn: text::required(topic_arn, TOPIC_ARN)?,
            role_arn,
        })
    }
}

impl Message for Sns {
    const NAME: &'static str = "Sns";
}

impl Validate for Sns {
    fn validate(&self) -> Result<()> {
        validate::sns_arn(TOPIC_ARN, &self.topic_arn)?;
        if let Some(role) = &self.role_arn {
            validate::iam_role_arn(ROLE_ARN, role)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecipient {
    pub recipient: String,
}

impl EmailRecipient {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

impl Writeable for EmailRecipient {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.recipient)
    }
}

impl Readable for EmailRecipient {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            recipient: input.read_string()?,
        })
    }
}

impl ToText for EmailRecipient {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(RECIPIENT, self.recipient.as_str())
            .finish())
    }
}

impl FromText for EmailRecipient {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut recipient = None;
        for (name, v) in obj.fields() {
            match name {
                RECIPIENT => recipient = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            recipient: text::required(recipient, RECIPIENT)?,
        })
    }
}

impl Message for EmailRecipient {
    const NAME: &'static str = "EmailRecipient";
}

/// Email through a configured account, to recipients and/or groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub email_account_id: String,
    pub recipient_list: Vec<EmailRecipient>,
    pub email_group_id_list: Vec<String>,
}

impl Writeable for Email {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.email_account_id)?;
        out.write_message_list(&self.recipient_list)?;
        out.write_string_list(&self.email_group_id_list)
    }
}

impl Readable for Email {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            email_account_id: input.read_string()?,
            recipient_list: input.read_message_list()?,
            email_group_id_list: input.read_string_list()?,
        })
    }
}

impl ToText for Email {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(EMAIL_ACCOUNT_ID, self.email_account_id.as_str())
            .message_list(RECIPIENT_LIST, &self.recipient_list, cx)?
            .field(EMAIL_GROUP_ID_LIST, self.email_group_id_list.clone())
            .finish())
    }
}

impl FromText for Email {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut email_account_id = None;
        let mut recipient_list = Vec::new();
        let mut email_group_id_list = Vec::new();
        for (name, v) in obj.fields() {
            match name {
                EMAIL_ACCOUNT_ID => email_account_id = Some(text::string(name, v)?),
                RECIPIENT_LIST => recipient_list = text::message_list(name, v, cx)?,
                EMAIL_GROUP_ID_LIST => email_group_id_list = text::string_list(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            email_account_id: text::required(email_account_id, EMAIL_ACCOUNT_ID)?,
            recipient_list,
            email_group_id_list,
        })
    }
}

impl Message for Email {
    const NAME: &'static str = "Email";
}

impl Validate for Email {
    fn validate(&self) -> Result<()> {
        validate::non_empty(EMAIL_ACCOUNT_ID, &self.email_account_id)?;
        for r in &self.recipient_list {
            validate::email(RECIPIENT, &r.recipient)?;
        }
        Ok(())
    }
}

/// Polymorphic channel payload of a notification config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelConfig {
    Slack(Slack),
    Chime(Chime),
    MicrosoftTeams(MicrosoftTeams),
    Webhook(Webhook),
    Sns(Sns),
    Email(Email),
}

impl ChannelConfig {
    pub fn config_type(&self) -> ConfigType {
        match self {
            ChannelConfig::Slack(_) => ConfigType::Slack,
            ChannelConfig::Chime(_) => ConfigType::Chime,
            ChannelConfig::MicrosoftTeams(_) => ConfigType::MicrosoftTeams,
            ChannelConfig::Webhook(_) => ConfigType::Webhook,
            ChannelConfig::Sns(_) => ConfigType::Sns,
            ChannelConfig::Email(_) => ConfigType::Email,
        }
    }

    pub fn as_slack(&self) -> Option<&Slack> {
        match self {
            ChannelConfig::Slack(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_chime(&self) -> Option<&Chime> {
        match self {
            ChannelConfig::Chime(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_microsoft_teams(&self) -> Option<&MicrosoftTeams> {
        match self {
            ChannelConfig::MicrosoftTeams(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_webhook(&self) -> Option<&Webhook> {
        match self {
            ChannelConfig::Webhook(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_sns(&self) -> Option<&Sns> {
        match self {
            ChannelConfig::Sns(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_email(&self) -> Option<&Email> {
        match self {
            ChannelConfig::Email(c) => Some(c),
            _ => None,
        }
    }
}

impl VariantFamily for ChannelConfig {
    const FAMILY: &'static str = "channel";

    fn variant_tag(&self) -> &str {
        self.config_type().tag()
    }
}

impl Validate for ChannelConfig {
    fn validate(&self) -> Result<()> {
        match self {
            ChannelConfig::Slack(c) => c.validate(),
            ChannelConfig::Chime(c) => c.validate(),
            ChannelConfig::MicrosoftTeams(c) => c.validate(),
            ChannelConfig::Webhook(c) => c.validate(),
            ChannelConfig::Sns(c) => c.validate(),
            ChannelConfig::Email(c) => c.validate(),
        }
    }
}
