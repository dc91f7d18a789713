//! Shared node state: config, registries, dispatcher and built-in services.

use std::sync::Arc;

use crosswire_core::{Codec, Registries, Result};
use crosswire_messages::{CHANNEL_TAGS, TRIGGER_TAGS};

use crate::client::NodeClient;
use crate::config::NodeConfig;
use crate::dispatch::{ActionCtx, Dispatcher};
use crate::services::{
    ConfigStore, CreateConfigService, DeleteConfigService, GetConfigService,
    SendNotificationService, UpdateConfigService,
};

#[derive(Clone)]
pub struct NodeState {
    inner: Arc<NodeStateInner>,
    registries: Arc<Registries>,
    dispatcher: Arc<Dispatcher>,
    store: Arc<ConfigStore>,
}

struct NodeStateInner {
    cfg: NodeConfig,
}

impl NodeState {
    /// Build node state. Registry and config problems are returned, not panicked on.
    pub fn new(cfg: NodeConfig) -> Result<Self> {
        // 1) Registries for the tags this node knows
        let registries = Arc::new(cfg.registry.build()?);

        // 2) Built-in services
        let store = Arc::new(ConfigStore::new());
        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(CreateConfigService::new(Arc::clone(&store))));
        dispatcher.register(Arc::new(UpdateConfigService::new(Arc::clone(&store))));
        dispatcher.register(Arc::new(GetConfigService::new(Arc::clone(&store))));
        dispatcher.register(Arc::new(DeleteConfigService::new(Arc::clone(&store))));
        dispatcher.register(Arc::new(SendNotificationService::new(Arc::clone(&store))));

        // registry <-> binary sanity check
        let (channels, triggers) = (cfg.registry.channel_tags(), cfg.registry.trigger_tags());
        let missing_channels: Vec<_> = CHANNEL_TAGS
            .iter()
            .filter(|t| !channels.contains(*t))
            .collect();
        let missing_triggers: Vec<_> = TRIGGER_TAGS
            .iter()
            .filter(|t| !triggers.contains(*t))
            .collect();
        if !missing_channels.is_empty() || !missing_triggers.is_empty() {
            tracing::warn!(
                node = %cfg.node.name,
                channels = ?missing_channels,
                triggers = ?missing_triggers,
                "node registers fewer variant tags than this binary supports"
            );
        }

        tracing::info!(
            node = %cfg.node.name,
            actions = ?dispatcher.registered_actions(),
            families = ?registries.families(),
            "node state built"
        );

        Ok(Self {
            inner: Arc::new(NodeStateInner { cfg }),
            registries,
            dispatcher: Arc::new(dispatcher),
            store,
        })
    }

    pub fn cfg(&self) -> &NodeConfig {
        &self.inner.cfg
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn store(&self) -> Arc<ConfigStore> {
        Arc::clone(&self.store)
    }

    pub fn ctx(&self) -> ActionCtx {
        ActionCtx::new(self.inner.cfg.node.name.as_str(), Arc::clone(&self.registries))
    }

    pub fn client(&self) -> NodeClient {
        NodeClient::new(self.dispatcher(), self.ctx())
    }

    /// Codec bound to this node's limits and registries.
    pub fn codec(&self) -> Codec<'_> {
        Codec::new()
            .with_limits(self.inner.cfg.codec)
            .with_registries(&self.registries)
    }
}
