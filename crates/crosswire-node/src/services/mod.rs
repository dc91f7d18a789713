//! Built-in notification services.

pub mod config_store;
pub mod send;

pub use config_store::{
    ConfigStore, CreateConfigService, DeleteConfigService, GetConfigService, UpdateConfigService,
};
pub use send::SendNotificationService;
