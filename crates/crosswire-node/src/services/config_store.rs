use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crosswire_core::{OpaqueHandle, Result, Validate, WireError};
use crosswire_messages::notifications::action::{
    CREATE_NOTIFICATION_CONFIG, DELETE_NOTIFICATION_CONFIG, GET_NOTIFICATION_CONFIG,
    UPDATE_NOTIFICATION_CONFIG,
};
use crosswire_messages::notifications::{
    CreateNotificationConfigRequest, CreateNotificationConfigResponse,
    DeleteNotificationConfigRequest, DeleteNotificationConfigResponse,
    GetNotificationConfigRequest, GetNotificationConfigResponse, NotificationConfig,
    NotificationConfigInfo, UpdateNotificationConfigRequest, UpdateNotificationConfigResponse,
};

use crate::dispatch::{ActionCtx, ActionHandler};

pub const STATUS_OK: &str = "OK";
pub const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// In-memory notification configs keyed by config id.
#[derive(Default)]
pub struct ConfigStore {
    configs: DashMap<String, NotificationConfig>,
    next_id: AtomicU64,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config` under `id`, or under a generated `config-<n>` id.
    pub fn insert(&self, id: Option<String>, config: NotificationConfig) -> Result<String> {
        match id {
            Some(id) => match self.configs.entry(id) {
                Entry::Occupied(e) => Err(WireError::InvalidValue(format!(
                    "config id `{}` already exists",
                    e.key()
                ))),
                Entry::Vacant(e) => {
                    let id = e.key().clone();
                    e.insert(config);
                    Ok(id)
                }
            },
            None => loop {
                let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                if let Entry::Vacant(e) = self.configs.entry(format!("config-{n}")) {
                    let id = e.key().clone();
                    e.insert(config);
                    break Ok(id);
                }
            },
        }
    }

    /// Replace the config stored under `id`; unknown ids are an error.
    pub fn update(&self, id: &str, config: NotificationConfig) -> Result<()> {
        match self.configs.get_mut(id) {
            Some(mut slot) => {
                *slot = config;
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }

    /// Configs for `ids` in request order, or every config sorted by id when
    /// `ids` is empty. Returns the total match count and the requested page.
    pub fn page(
        &self,
        ids: &[String],
        from: usize,
        max: usize,
    ) -> Result<(usize, Vec<NotificationConfigInfo>)> {
        let matched: Vec<NotificationConfigInfo> = if ids.is_empty() {
            let mut all: Vec<_> = self
                .configs
                .iter()
                .map(|e| NotificationConfigInfo {
                    config_id: e.key().clone(),
                    config: e.value().clone(),
                })
                .collect();
            all.sort_by(|a, b| a.config_id.cmp(&b.config_id));
            all
        } else {
            ids.iter()
                .map(|id| {
                    self.get(id)
                        .map(|config| NotificationConfigInfo {
                            config_id: id.clone(),
                            config,
                        })
                        .ok_or_else(|| not_found(id))
                })
                .collect::<Result<_>>()?
        };
        let total = matched.len();
        Ok((total, matched.into_iter().skip(from).take(max).collect()))
    }

    pub fn get(&self, id: &str) -> Option<NotificationConfig> {
        self.configs.get(id).map(|c| c.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.configs.contains_key(id)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.configs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

fn not_found(id: &str) -> WireError {
    WireError::InvalidValue(format!("config id `{id}` not found"))
}

pub struct CreateConfigService {
    store: Arc<ConfigStore>,
}

impl CreateConfigService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActionHandler for CreateConfigService {
    fn action(&self) -> &'static str {
        CREATE_NOTIFICATION_CONFIG
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: CreateNotificationConfigRequest = ctx.reconstruct(request)?;
        req.validate()?;
        let config_type = req.config.config_type;
        let config_id = self.store.insert(req.config_id, req.config)?;
        tracing::info!(
            node = ctx.node_name(),
            %config_id,
            config_type = ?config_type,
            "notification config created"
        );
        Ok(OpaqueHandle::new(CreateNotificationConfigResponse { config_id }))
    }
}

pub struct DeleteConfigService {
    store: Arc<ConfigStore>,
}

impl DeleteConfigService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActionHandler for DeleteConfigService {
    fn action(&self) -> &'static str {
        DELETE_NOTIFICATION_CONFIG
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: DeleteNotificationConfigRequest = ctx.reconstruct(request)?;
        req.validate()?;
        let config_id_to_status = req
            .config_id_list
            .into_iter()
            .map(|id| {
                let status = if self.store.remove(&id) {
                    STATUS_OK
                } else {
                    STATUS_NOT_FOUND
                };
                (id, status.to_string())
            })
            .collect();
        Ok(OpaqueHandle::new(DeleteNotificationConfigResponse {
            config_id_to_status,
        }))
    }
}

pub struct UpdateConfigService {
    store: Arc<ConfigStore>,
}

impl UpdateConfigService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActionHandler for UpdateConfigService {
    fn action(&self) -> &'static str {
        UPDATE_NOTIFICATION_CONFIG
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: UpdateNotificationConfigRequest = ctx.reconstruct(request)?;
        req.validate()?;
        self.store.update(&req.config_id, req.config)?;
        tracing::info!(
            node = ctx.node_name(),
            config_id = %req.config_id,
            "notification config updated"
        );
        Ok(OpaqueHandle::new(UpdateNotificationConfigResponse {
            config_id: req.config_id,
        }))
    }
}

pub struct GetConfigService {
    store: Arc<ConfigStore>,
}

impl GetConfigService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ActionHandler for GetConfigService {
    fn action(&self) -> &'static str {
        GET_NOTIFICATION_CONFIG
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: GetNotificationConfigRequest = ctx.reconstruct(request)?;
        req.validate()?;
        // validate() rules out negative values
        let from = usize::try_from(req.from_index).unwrap_or(0);
        let max = usize::try_from(req.max_items).unwrap_or(0);
        let (total, config_list) = self.store.page(&req.config_id_list, from, max)?;
        tracing::debug!(
            node = ctx.node_name(),
            total,
            returned = config_list.len(),
            "notification configs read"
        );
        Ok(OpaqueHandle::new(GetNotificationConfigResponse {
            start_index: i64::from(req.from_index),
            total_hits: i64::try_from(total).unwrap_or(i64::MAX),
            config_list,
        }))
    }
}
