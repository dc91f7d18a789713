//! Notification action requests and responses.
//!
//! Requests are validated by the caller before dispatch; handlers see them
//! only through an opaque handle and rebuild them locally.

use std::collections::BTreeMap;

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, Validate, WireError,
    Writeable,
};

use crate::notifications::config::NotificationConfig;
use crate::notifications::event::{ChannelMessage, EventSource};
use crate::validate;

/// Action name: create a notification config.
pub const CREATE_NOTIFICATION_CONFIG: &str = "notifications/configs/create";
/// Action name: replace an existing notification config.
pub const UPDATE_NOTIFICATION_CONFIG: &str = "notifications/configs/update";
/// Action name: read notification configs back.
pub const GET_NOTIFICATION_CONFIG: &str = "notifications/configs/get";
/// Action name: delete notification configs.
pub const DELETE_NOTIFICATION_CONFIG: &str = "notifications/configs/delete";
/// Action name: send a notification to channels.
pub const SEND_NOTIFICATION: &str = "notifications/feature/send";

const CONFIG_ID: &str = "config_id";
const CONFIG: &str = "config";
const CONFIG_ID_LIST: &str = "config_id_list";
const CONFIG_ID_TO_STATUS: &str = "config_id_to_status";
const CONFIG_LIST: &str = "config_list";
const FROM_INDEX: &str = "from_index";
const MAX_ITEMS: &str = "max_items";
const START_INDEX: &str = "start_index";
const TOTAL_HITS: &str = "total_hits";
const EVENT_SOURCE: &str = "event_source";
const CHANNEL_MESSAGE: &str = "channel_message";
const CHANNEL_ID_LIST: &str = "channel_id_list";
const THREAD_CONTEXT: &str = "thread_context";
const EVENT_ID: &str = "event_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNotificationConfigRequest {
    /// Caller-chosen id; the node generates one when absent.
    pub config_id: Option<String>,
    pub config: NotificationConfig,
}

impl Writeable for CreateNotificationConfigRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_optional_string(self.config_id.as_deref())?;
        out.write_message(&self.config)
    }
}

impl Readable for CreateNotificationConfigRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id: input.read_optional_string()?,
            config: input.read_message()?,
        })
    }
}

impl ToText for CreateNotificationConfigRequest {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field_if_some(CONFIG_ID, self.config_id.as_deref())
            .message(CONFIG, &self.config, cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for CreateNotificationConfigRequest {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut config_id, mut config) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID => config_id = text::string_or_null(name, v)?,
                CONFIG => config = Some(text::message(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id,
            config: text::required(config, CONFIG)?,
        })
    }
}

impl Message for CreateNotificationConfigRequest {
    const NAME: &'static str = "CreateNotificationConfigRequest";
}

impl Validate for CreateNotificationConfigRequest {
    fn validate(&self) -> Result<()> {
        if let Some(id) = &self.config_id {
            validate::config_id(id)?;
        }
        self.config.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNotificationConfigResponse {
    pub config_id: String,
}

impl Writeable for CreateNotificationConfigResponse {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.config_id)
    }
}

impl Readable for CreateNotificationConfigResponse {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id: input.read_string()?,
        })
    }
}

impl ToText for CreateNotificationConfigResponse {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(CONFIG_ID, self.config_id.as_str())
            .finish())
    }
}

impl FromText for CreateNotificationConfigResponse {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut config_id = None;
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID => config_id = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id: text::required(config_id, CONFIG_ID)?,
        })
    }
}

impl Message for CreateNotificationConfigResponse {
    const NAME: &'static str = "CreateNotificationConfigResponse";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotificationConfigRequest {
    pub config_id: String,
    pub config: NotificationConfig,
}

impl Writeable for UpdateNotificationConfigRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.config_id)?;
        out.write_message(&self.config)
    }
}

impl Readable for UpdateNotificationConfigRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id: input.read_string()?,
            config: input.read_message()?,
        })
    }
}

impl ToText for UpdateNotificationConfigRequest {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(CONFIG_ID, self.config_id.as_str())
            .message(CONFIG, &self.config, cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for UpdateNotificationConfigRequest {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut config_id, mut config) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID => config_id = Some(text::string(name, v)?),
                CONFIG => config = Some(text::message(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id: text::required(config_id, CONFIG_ID)?,
            config: text::required(config, CONFIG)?,
        })
    }
}

impl Message for UpdateNotificationConfigRequest {
    const NAME: &'static str = "UpdateNotificationConfigRequest";
}

impl Validate for UpdateNotificationConfigRequest {
    fn validate(&self) -> Result<()> {
        validate::config_id(&self.config_id)?;
        self.config.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotificationConfigResponse {
    pub config_id: String,
}

impl Writeable for UpdateNotificationConfigResponse {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.config_id)
    }
}

impl Readable for UpdateNotificationConfigResponse {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id: input.read_string()?,
        })
    }
}

impl ToText for UpdateNotificationConfigResponse {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(CONFIG_ID, self.config_id.as_str())
            .finish())
    }
}

impl FromText for UpdateNotificationConfigResponse {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut config_id = None;
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID => config_id = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id: text::required(config_id, CONFIG_ID)?,
        })
    }
}

impl Message for UpdateNotificationConfigResponse {
    const NAME: &'static str = "UpdateNotificationConfigResponse";
}

/// Page size used when a get request does not name one.
pub const DEFAULT_MAX_ITEMS: i32 = 100;

/// Reads configs by id; an empty id list pages through every stored config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNotificationConfigRequest {
    pub config_id_list: Vec<String>,
    pub from_index: i32,
    pub max_items: i32,
}

impl GetNotificationConfigRequest {
    pub fn by_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            config_id_list: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for GetNotificationConfigRequest {
    fn default() -> Self {
        Self {
            config_id_list: Vec::new(),
            from_index: 0,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl Writeable for GetNotificationConfigRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string_list(&self.config_id_list)?;
        out.write_i32(self.from_index);
        out.write_i32(self.max_items);
        Ok(())
    }
}

impl Readable for GetNotificationConfigRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id_list: input.read_string_list()?,
            from_index: input.read_i32()?,
            max_items: input.read_i32()?,
        })
    }
}

impl ToText for GetNotificationConfigRequest {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(CONFIG_ID_LIST, self.config_id_list.clone())
            .field(FROM_INDEX, self.from_index)
            .field(MAX_ITEMS, self.max_items)
            .finish())
    }
}

impl FromText for GetNotificationConfigRequest {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut req = Self::default();
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID_LIST => req.config_id_list = text::string_list(name, v)?,
                FROM_INDEX => req.from_index = text::int(name, v)?,
                MAX_ITEMS => req.max_items = text::int(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(req)
    }
}

impl Message for GetNotificationConfigRequest {
    const NAME: &'static str = "GetNotificationConfigRequest";
}

impl Validate for GetNotificationConfigRequest {
    fn validate(&self) -> Result<()> {
        if self.from_index < 0 {
            return Err(WireError::InvalidValue(format!(
                "{FROM_INDEX} must not be negative"
            )));
        }
        if self.max_items <= 0 {
            return Err(WireError::InvalidValue(format!("{MAX_ITEMS} must be positive")));
        }
        self.config_id_list
            .iter()
            .try_for_each(|id| validate::config_id(id))
    }
}

/// One stored config and the id it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfigInfo {
    pub config_id: String,
    pub config: NotificationConfig,
}

impl Writeable for NotificationConfigInfo {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.config_id)?;
        out.write_message(&self.config)
    }
}

impl Readable for NotificationConfigInfo {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id: input.read_string()?,
            config: input.read_message()?,
        })
    }
}

impl ToText for NotificationConfigInfo {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(CONFIG_ID, self.config_id.as_str())
            .message(CONFIG, &self.config, cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for NotificationConfigInfo {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut config_id, mut config) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID => config_id = Some(text::string(name, v)?),
                CONFIG => config = Some(text::message(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id: text::required(config_id, CONFIG_ID)?,
            config: text::required(config, CONFIG)?,
        })
    }
}

impl Message for NotificationConfigInfo {
    const NAME: &'static str = "NotificationConfigInfo";
}

/// A page of stored configs. `total_hits` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNotificationConfigResponse {
    pub start_index: i64,
    pub total_hits: i64,
    pub config_list: Vec<NotificationConfigInfo>,
}

impl Writeable for GetNotificationConfigResponse {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_i64(self.start_index);
        out.write_i64(self.total_hits);
        out.write_message_list(&self.config_list)
    }
}

impl Readable for GetNotificationConfigResponse {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            start_index: input.read_i64()?,
            total_hits: input.read_i64()?,
            config_list: input.read_message_list()?,
        })
    }
}

impl ToText for GetNotificationConfigResponse {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(START_INDEX, self.start_index)
            .field(TOTAL_HITS, self.total_hits)
            .message_list(CONFIG_LIST, &self.config_list, cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for GetNotificationConfigResponse {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut start_index, mut total_hits, mut config_list) = (0, None, None);
        for (name, v) in obj.fields() {
            match name {
                START_INDEX => start_index = text::long(name, v)?,
                TOTAL_HITS => total_hits = Some(text::long(name, v)?),
                CONFIG_LIST => config_list = Some(text::message_list(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            start_index,
            total_hits: text::required(total_hits, TOTAL_HITS)?,
            config_list: text::required(config_list, CONFIG_LIST)?,
        })
    }
}

impl Message for GetNotificationConfigResponse {
    const NAME: &'static str = "GetNotificationConfigResponse";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNotificationConfigRequest {
    pub config_id_list: Vec<String>,
}

impl Writeable for DeleteNotificationConfigRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string_list(&self.config_id_list)
    }
}

impl Readable for DeleteNotificationConfigRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id_list: input.read_string_list()?,
        })
    }
}

impl ToText for DeleteNotificationConfigRequest {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(CONFIG_ID_LIST, self.config_id_list.clone())
            .finish())
    }
}

impl FromText for DeleteNotificationConfigRequest {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut config_id_list = None;
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID_LIST => config_id_list = Some(text::string_list(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id_list: text::required(config_id_list, CONFIG_ID_LIST)?,
        })
    }
}

impl Message for DeleteNotificationConfigRequest {
    const NAME: &'static str = "DeleteNotificationConfigRequest";
}

impl Validate for DeleteNotificationConfigRequest {
    fn validate(&self) -> Result<()> {
        if self.config_id_list.is_empty() {
            return Err(WireError::InvalidValue(format!(
                "{CONFIG_ID_LIST} must not be empty"
            )));
        }
        self.config_id_list
            .iter()
            .try_for_each(|id| validate::config_id(id))
    }
}

/// Per-id outcome, e.g. `OK` or `NOT_FOUND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNotificationConfigResponse {
    pub config_id_to_status: BTreeMap<String, String>,
}

impl Writeable for DeleteNotificationConfigResponse {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string_map(&self.config_id_to_status)
    }
}

impl Readable for DeleteNotificationConfigResponse {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            config_id_to_status: input.read_string_map()?,
        })
    }
}

impl ToText for DeleteNotificationConfigResponse {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .string_map(CONFIG_ID_TO_STATUS, &self.config_id_to_status)
            .finish())
    }
}

impl FromText for DeleteNotificationConfigResponse {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut config_id_to_status = None;
        for (name, v) in obj.fields() {
            match name {
                CONFIG_ID_TO_STATUS => config_id_to_status = Some(text::string_map(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            config_id_to_status: text::required(config_id_to_status, CONFIG_ID_TO_STATUS)?,
        })
    }
}

impl Message for DeleteNotificationConfigResponse {
    const NAME: &'static str = "DeleteNotificationConfigResponse";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendNotificationRequest {
    pub event_source: EventSource,
    pub channel_message: ChannelMessage,
    pub channel_id_list: Vec<String>,
    pub thread_context: Option<String>,
}

impl Writeable for SendNotificationRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_message(&self.event_source)?;
        out.write_message(&self.channel_message)?;
        out.write_string_list(&self.channel_id_list)?;
        out.write_optional_string(self.thread_context.as_deref())
    }
}

impl Readable for SendNotificationRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            event_source: input.read_message()?,
            channel_message: input.read_message()?,
            channel_id_list: input.read_string_list()?,
            thread_context: input.read_optional_string()?,
        })
    }
}

impl ToText for SendNotificationRequest {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .message(EVENT_SOURCE, &self.event_source, cx)?
            .message(CHANNEL_MESSAGE, &self.channel_message, cx)?
            .field(CHANNEL_ID_LIST, self.channel_id_list.clone())
            .field_if_some(THREAD_CONTEXT, self.thread_context.as_deref())
            .finish())
    }
}

impl FromText for SendNotificationRequest {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut event_source, mut channel_message, mut channel_id_list) = (None, None, None);
        let mut thread_context = None;
        for (name, v) in obj.fields() {
            match name {
                EVENT_SOURCE => event_source = Some(text::message(name, v, cx)?),
                CHANNEL_MESSAGE => channel_message = Some(text::message(name, v, cx)?),
                CHANNEL_ID_LIST => channel_id_list = Some(text::string_list(name, v)?),
                THREAD_CONTEXT => thread_context = text::string_or_null(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            event_source: text::required(event_source, EVENT_SOURCE)?,
            channel_message: text::required(channel_message, CHANNEL_MESSAGE)?,
            channel_id_list: text::required(channel_id_list, CHANNEL_ID_LIST)?,
            thread_context,
        })
    }
}

impl Message for SendNotificationRequest {
    const NAME: &'static str = "SendNotificationRequest";
}

impl Validate for SendNotificationRequest {
    fn validate(&self) -> Result<()> {
        self.event_source.validate()?;
        self.channel_message.validate()?;
        if self.channel_id_list.is_empty() {
            return Err(WireError::InvalidValue(format!(
                "{CHANNEL_ID_LIST} must not be empty"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendNotificationResponse {
    pub event_id: String,
}

impl Writeable for SendNotificationResponse {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.event_id)
    }
}

impl Readable for SendNotificationResponse {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            event_id: input.read_string()?,
        })
    }
}

impl ToText for SendNotificationResponse {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(EVENT_ID, self.event_id.as_str())
            .finish())
    }
}

impl FromText for SendNotificationResponse {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut event_id = None;
        for (name, v) in obj.fields() {
            match name {
                EVENT_ID => event_id = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            event_id: text::required(event_id, EVENT_ID)?,
        })
    }
}

impl Message for SendNotificationResponse {
    const NAME: &'static str = "SendNotificationResponse";
}
