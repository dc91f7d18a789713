//! Event payloads: where a notification came from and what it says.

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, Validate, Writeable,
};

use crate::notifications::types::SeverityType;
use crate::validate;

const FILE_NAME: &str = "file_name";
const FILE_ENCODING: &str = "file_encoding";
const FILE_DATA: &str = "file_data";
const FILE_CONTENT_TYPE: &str = "file_content_type";

const TEXT_DESCRIPTION: &str = "text_description";
const HTML_DESCRIPTION: &str = "html_description";
const ATTACHMENT: &str = "attachment";

const TITLE: &str = "title";
const REFERENCE_ID: &str = "reference_id";
const FEATURE: &str = "feature";
const SEVERITY: &str = "severity";
const TAGS: &str = "tags";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub file_encoding: String,
    pub file_data: String,
    pub file_content_type: Option<String>,
}

impl Writeable for Attachment {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.file_name)?;
        out.write_string(&self.file_encoding)?;
        out.write_string(&self.file_data)?;
        out.write_optional_string(self.file_content_type.as_deref())
    }
}

impl Readable for Attachment {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            file_name: input.read_string()?,
            file_encoding: input.read_string()?,
            file_data: input.read_string()?,
            file_content_type: input.read_optional_string()?,
        })
    }
}

impl ToText for Attachment {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(FILE_NAME, self.file_name.as_str())
            .field(FILE_ENCODING, self.file_encoding.as_str())
            .field(FILE_DATA, self.file_data.as_str())
            .field_if_some(FILE_CONTENT_TYPE, self.file_content_type.as_deref())
            .finish())
    }
}

impl FromText for Attachment {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut file_name, mut file_encoding, mut file_data, mut file_content_type) =
            (None, None, None, None);
        for (name, v) in obj.fields() {
            match name {
                FILE_NAME => file_name = Some(text::string(name, v)?),
                FILE_ENCODING => file_encoding = Some(text::string(name, v)?),
                FILE_DATA => file_data = Some(text::string(name, v)?),
                FILE_CONTENT_TYPE => file_content_type = text::string_or_null(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            file_name: text::required(file_name, FILE_NAME)?,
            file_encoding: text::required(file_encoding, FILE_ENCODING)?,
            file_data: text::required(file_data, FILE_DATA)?,
            file_content_type,
        })
    }
}

impl Message for Attachment {
    const NAME: &'static str = "Attachment";
}

/// Body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub text_description: String,
    pub html_description: Option<String>,
    pub attachment: Option<Attachment>,
}

impl ChannelMessage {
    pub fn text(text_description: impl Into<String>) -> Self {
        Self {
            text_description: text_description.into(),
            html_description: None,
            attachment: None,
        }
    }
}

impl Writeable for ChannelMessage {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.text_description)?;
        out.write_optional_string(self.html_description.as_deref())?;
        out.write_optional_message(self.attachment.as_ref())
    }
}

impl Readable for ChannelMessage {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            text_description: input.read_string()?,
            html_description: input.read_optional_string()?,
            attachment: input.read_optional_message()?,
        })
    }
}

impl ToText for ChannelMessage {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(TEXT_DESCRIPTION, self.text_description.as_str())
            .field_if_some(HTML_DESCRIPTION, self.html_description.as_deref())
            .message_if_some(ATTACHMENT, self.attachment.as_ref(), cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for ChannelMessage {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut text_description, mut html_description, mut attachment) = (None, None, None);
        for (name, v) in obj.fields() {
            match name {
                TEXT_DESCRIPTION => text_description = Some(text::string(name, v)?),
                HTML_DESCRIPTION => html_description = text::string_or_null(name, v)?,
                ATTACHMENT if v.is_null() => attachment = None,
                ATTACHMENT => attachment = Some(text::message(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            text_description: text::required(text_description, TEXT_DESCRIPTION)?,
            html_description,
            attachment,
        })
    }
}

impl Message for ChannelMessage {
    const NAME: &'static str = "ChannelMessage";
}

impl Validate for ChannelMessage {
    fn validate(&self) -> Result<()> {
        validate::non_empty(TEXT_DESCRIPTION, &self.text_description)
    }
}

/// Origin of a notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSource {
    pub title: String,
    pub reference_id: String,
    pub feature: String,
    pub severity: SeverityType,
    pub tags: Vec<String>,
}

impl EventSource {
    pub fn new(
        title: impl Into<String>,
        reference_id: impl Into<String>,
        feature: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            reference_id: reference_id.into(),
            feature: feature.into(),
            severity: SeverityType::Info,
            tags: Vec::new(),
        }
    }
}

impl Writeable for EventSource {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.title)?;
        out.write_string(&self.reference_id)?;
        out.write_string(&self.feature)?;
        out.write_enum(self.severity);
        out.write_string_list(&self.tags)
    }
}

impl Readable for EventSource {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            title: input.read_string()?,
            reference_id: input.read_string()?,
            feature: input.read_string()?,
            severity: input.read_enum()?,
            tags: input.read_string_list()?,
        })
    }
}

impl ToText for EventSource {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(TITLE, self.title.as_str())
            .field(REFERENCE_ID, self.reference_id.as_str())
            .field(FEATURE, self.feature.as_str())
            .enum_tag(SEVERITY, self.severity)
            .field(TAGS, self.tags.clone())
            .finish())
    }
}

impl FromText for EventSource {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut title, mut reference_id, mut feature) = (None, None, None);
        let mut severity = SeverityType::Info;
        let mut tags = Vec::new();
        for (name, v) in obj.fields() {
            match name {
                TITLE => title = Some(text::string(name, v)?),
                REFERENCE_ID => reference_id = Some(text::string(name, v)?),
                FEATURE => feature = Some(text::string(name, v)?),
                SEVERITY => severity = text::enum_tag(name, v)?,
                TAGS => tags = text::string_list(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            title: text::required(title, TITLE)?,
            reference_id: text::required(reference_id, REFERENCE_ID)?,
            feature: text::required(feature, FEATURE)?,
            severity,
            tags,
        })
    }
}

impl Message for EventSource {
    const NAME: &'static str = "EventSource";
}

impl Validate for EventSource {
    fn validate(&self) -> Result<()> {
        validate::non_empty(TITLE, &self.title)
    }
}
