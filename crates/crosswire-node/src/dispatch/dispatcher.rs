use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crosswire_core::{OpaqueHandle, Readable, Registries, Result, WireError};

/// Per-call context handed to handlers.
#[derive(Clone)]
pub struct ActionCtx {
    node_name: Arc<str>,
    registries: Arc<Registries>,
}

impl ActionCtx {
    pub fn new(node_name: impl Into<Arc<str>>, registries: Arc<Registries>) -> Self {
        Self {
            node_name: node_name.into(),
            registries,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Rebuild an opaque value as the local type `T` using this node's registries.
    pub fn reconstruct<T: Readable>(&self, handle: OpaqueHandle) -> Result<T> {
        handle.reconstruct_with(&self.registries)
    }
}

/// A named action. Handlers must rebuild their request through
/// [`ActionCtx::reconstruct`]; the handle's concrete type is never trusted.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn action(&self) -> &'static str;
    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle>;
}

/// Action name → handler.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<&'static str, Arc<dyn ActionHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn ActionHandler>) {
        let action = handler.action();
        if self.handlers.insert(action, handler).is_some() {
            tracing::warn!(action, "action handler replaced");
        }
    }

    /// Registered action names, sorted.
    pub fn registered_actions(&self) -> Vec<&'static str> {
        let mut actions: Vec<_> = self.handlers.iter().map(|e| *e.key()).collect();
        actions.sort_unstable();
        actions
    }

    pub async fn dispatch(
        &self,
        ctx: ActionCtx,
        action: &str,
        request: OpaqueHandle,
    ) -> Result<OpaqueHandle> {
        let handler = self
            .handlers
            .get(action)
            .ok_or_else(|| WireError::UnknownAction(action.to_string()))?
            .value()
            .clone();
        tracing::debug!(action, request_type = request.type_name(), "dispatching");
        handler.handle(ctx, request).await
    }
}
