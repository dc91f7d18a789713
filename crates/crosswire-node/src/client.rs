//! In-process client: typed requests in, locally reconstructed responses out.

use std::sync::Arc;

use crosswire_core::{OpaqueHandle, Readable, Result, Validate, Writeable};
use crosswire_messages::notifications::action::{
    CREATE_NOTIFICATION_CONFIG, DELETE_NOTIFICATION_CONFIG, GET_NOTIFICATION_CONFIG,
    SEND_NOTIFICATION, UPDATE_NOTIFICATION_CONFIG,
};
use crosswire_messages::notifications::{
    CreateNotificationConfigRequest, CreateNotificationConfigResponse,
    DeleteNotificationConfigRequest, DeleteNotificationConfigResponse,
    GetNotificationConfigRequest, GetNotificationConfigResponse, SendNotificationRequest,
    SendNotificationResponse, UpdateNotificationConfigRequest, UpdateNotificationConfigResponse,
};

use crate::dispatch::{ActionCtx, Dispatcher};

#[derive(Clone)]
pub struct NodeClient {
    dispatcher: Arc<Dispatcher>,
    ctx: ActionCtx,
}

impl NodeClient {
    pub fn new(dispatcher: Arc<Dispatcher>, ctx: ActionCtx) -> Self {
        Self { dispatcher, ctx }
    }

    /// Validate `request`, dispatch it as an opaque handle and rebuild the
    /// response as the caller's own `Resp`.
    pub async fn execute<Req, Resp>(&self, action: &str, request: Req) -> Result<Resp>
    where
        Req: Writeable + Validate + Send + Sync + 'static,
        Resp: Readable,
    {
        request.validate()?;
        let response = self
            .dispatcher
            .dispatch(self.ctx.clone(), action, OpaqueHandle::new(request))
            .await?;
        self.ctx.reconstruct(response)
    }

    pub async fn create_notification_config(
        &self,
        request: CreateNotificationConfigRequest,
    ) -> Result<CreateNotificationConfigResponse> {
        self.execute(CREATE_NOTIFICATION_CONFIG, request).await
    }

    pub async fn update_notification_config(
        &self,
        request: UpdateNotificationConfigRequest,
    ) -> Result<UpdateNotificationConfigResponse> {
        self.execute(UPDATE_NOTIFICATION_CONFIG, request).await
    }

    pub async fn get_notification_config(
        &self,
        request: GetNotificationConfigRequest,
    ) -> Result<GetNotificationConfigResponse> {
        self.execute(GET_NOTIFICATION_CONFIG, request).await
    }

    pub async fn delete_notification_config(
        &self,
        request: DeleteNotificationConfigRequest,
    ) -> Result<DeleteNotificationConfigResponse> {
        self.execute(DELETE_NOTIFICATION_CONFIG, request).await
    }

    pub async fn send_notification(
        &self,
        request: SendNotificationRequest,
    ) -> Result<SendNotificationResponse> {
        self.execute(SEND_NOTIFICATION, request).await
    }
}
