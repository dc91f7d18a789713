//! Notification messages: channel configs, events, and the actions that
//! create, read, update, delete and send through them.

pub mod action;
pub mod channel;
pub mod config;
pub mod event;
pub mod types;

pub use action::{
    CreateNotificationConfigRequest, CreateNotificationConfigResponse,
    DeleteNotificationConfigRequest, DeleteNotificationConfigResponse,
    GetNotificationConfigRequest, GetNotificationConfigResponse, NotificationConfigInfo,
    SendNotificationRequest, SendNotificationResponse, UpdateNotificationConfigRequest,
    UpdateNotificationConfigResponse,
};
pub use channel::{ChannelConfig, Chime, Email, EmailRecipient, MicrosoftTeams, Slack, Sns, Webhook};
pub use config::NotificationConfig;
pub use event::{Attachment, ChannelMessage, EventSource};
pub use types::{ConfigType, HttpMethodType, SeverityType};
