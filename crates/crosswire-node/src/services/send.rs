use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crosswire_core::{OpaqueHandle, Result, Validate, WireError};
use crosswire_messages::notifications::action::SEND_NOTIFICATION;
use crosswire_messages::notifications::{SendNotificationRequest, SendNotificationResponse};

use crate::dispatch::{ActionCtx, ActionHandler};
use crate::services::ConfigStore;

/// Resolves the target channels and issues an event id. Delivery itself
/// happens outside this node.
pub struct SendNotificationService {
    store: Arc<ConfigStore>,
    next_event: AtomicU64,
}

impl SendNotificationService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            next_event: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ActionHandler for SendNotificationService {
    fn action(&self) -> &'static str {
        SEND_NOTIFICATION
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: SendNotificationRequest = ctx.reconstruct(request)?;
        req.validate()?;

        let mut targets = Vec::with_capacity(req.channel_id_list.len());
        for id in &req.channel_id_list {
            let config = self
                .store
                .get(id)
                .ok_or_else(|| WireError::InvalidValue(format!("unknown channel id `{id}`")))?;
            if config.is_enabled {
                targets.push(id.as_str());
            } else {
                tracing::info!(channel_id = %id, "skipping disabled channel");
            }
        }

        let n = self.next_event.fetch_add(1, Ordering::Relaxed) + 1;
        let event_id = format!("event-{n}");
        tracing::info!(
            node = ctx.node_name(),
            %event_id,
            reference_id = %req.event_source.reference_id,
            channels = ?targets,
            "notification accepted"
        );
        Ok(OpaqueHandle::new(SendNotificationResponse { event_id }))
    }
}
