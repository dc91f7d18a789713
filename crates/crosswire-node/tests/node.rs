#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;

use crosswire_core::{
    OpaqueHandle, Readable, Result, StreamInput, StreamOutput, Validate, Writeable,
};
use crosswire_messages::notifications::{
    ChannelConfig, ChannelMessage, CreateNotificationConfigRequest,
    CreateNotificationConfigResponse, DeleteNotificationConfigRequest, Email, EmailRecipient,
    EventSource, GetNotificationConfigRequest, NotificationConfig, SendNotificationRequest, Slack,
    Sns, UpdateNotificationConfigRequest,
};
use crosswire_node::{config, ActionCtx, ActionHandler, NodeState};

fn node(yaml: &str) -> NodeState {
    NodeState::new(config::load_from_str(yaml).unwrap()).unwrap()
}

fn slack_config(name: &str) -> NotificationConfig {
    NotificationConfig::new(name, ChannelConfig::Slack(Slack::new("https://hooks.slack.com/x")))
}

fn create(config_id: Option<&str>, config: NotificationConfig) -> CreateNotificationConfigRequest {
    CreateNotificationConfigRequest {
        config_id: config_id.map(str::to_string),
        config,
    }
}

fn send(channel_ids: &[&str]) -> SendNotificationRequest {
    SendNotificationRequest {
        event_source: EventSource::new("disk full", "alert-1", "alerting"),
        channel_message: ChannelMessage {
            text_description: "disk at 99%".into(),
            html_description: None,
            attachment: None,
        },
        channel_id_list: channel_ids.iter().map(|s| s.to_string()).collect(),
        thread_context: None,
    }
}

#[tokio::test]
async fn create_send_delete() {
    let state = node("version: 1\n");
    let client = state.client();

    let created = client
        .create_notification_config(create(None, slack_config("ops")))
        .await
        .unwrap();
    assert_eq!(created.config_id, "config-1");
    let named = client
        .create_notification_config(create(Some("pager"), slack_config("pager")))
        .await
        .unwrap();
    assert_eq!(named.config_id, "pager");
    assert_eq!(state.store().len(), 2);

    let sent = client.send_notification(send(&["config-1", "pager"])).await.unwrap();
    assert_eq!(sent.event_id, "event-1");

    let deleted = client
        .delete_notification_config(DeleteNotificationConfigRequest {
            config_id_list: vec!["pager".into(), "missing".into()],
        })
        .await
        .unwrap();
    assert_eq!(deleted.config_id_to_status["pager"], "OK");
    assert_eq!(deleted.config_id_to_status["missing"], "NOT_FOUND");
    assert!(!state.store().contains("pager"));
}

#[tokio::test]
async fn created_configs_read_back_with_their_channels() {
    let state = node("version: 1\n");
    let client = state.client();

    let sns = NotificationConfig::new(
        "sns",
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:012345678901:alerts".into(),
            role_arn: Some("arn:aws:iam::012345678901:role/notify".into()),
        }),
    );
    let email = NotificationConfig::new(
        "mail",
        ChannelConfig::Email(Email {
            email_account_id: "smtp-1".into(),
            recipient_list: vec![EmailRecipient::new("ops@example.com")],
            email_group_id_list: vec![],
        }),
    );
    client.create_notification_config(create(Some("s1"), sns.clone())).await.unwrap();
    client.create_notification_config(create(Some("e1"), email.clone())).await.unwrap();
    client.create_notification_config(create(None, slack_config("ops"))).await.unwrap();

    let got = client
        .get_notification_config(GetNotificationConfigRequest::by_ids(["s1", "e1"]))
        .await
        .unwrap();
    assert_eq!(got.total_hits, 2);
    assert_eq!(got.config_list[0].config_id, "s1");
    assert_eq!(got.config_list[0].config, sns);
    assert_eq!(got.config_list[1].config, email);

    let updated = client
        .update_notification_config(UpdateNotificationConfigRequest {
            config_id: "s1".into(),
            config: slack_config("moved to slack"),
        })
        .await
        .unwrap();
    assert_eq!(updated.config_id, "s1");

    let all = client
        .get_notification_config(GetNotificationConfigRequest::default())
        .await
        .unwrap();
    assert_eq!(all.total_hits, 3);
    let ids: Vec<_> = all.config_list.iter().map(|i| i.config_id.as_str()).collect();
    assert_eq!(ids, ["config-1", "e1", "s1"]);
    assert_eq!(all.config_list[2].config, slack_config("moved to slack"));

    let page = client
        .get_notification_config(GetNotificationConfigRequest {
            from_index: 2,
            max_items: 10,
            ..GetNotificationConfigRequest::default()
        })
        .await
        .unwrap();
    assert_eq!((page.start_index, page.total_hits, page.config_list.len()), (2, 3, 1));

    let missing = client
        .update_notification_config(UpdateNotificationConfigRequest {
            config_id: "nope".into(),
            config: slack_config("x"),
        })
        .await
        .unwrap_err();
    assert!(missing.to_string().contains("nope"));
    let missing = client
        .get_notification_config(GetNotificationConfigRequest::by_ids(["nope"]))
        .await
        .unwrap_err();
    assert_eq!(missing.code().as_str(), "INVALID_VALUE");
}

#[tokio::test]
async fn service_errors_surface_with_codes() {
    let state = node("version: 1\n");
    let client = state.client();

    client
        .create_notification_config(create(Some("a"), slack_config("a")))
        .await
        .unwrap();
    let dup = client
        .create_notification_config(create(Some("a"), slack_config("a")))
        .await
        .unwrap_err();
    assert_eq!(dup.code().as_str(), "INVALID_VALUE");

    let unknown = client.send_notification(send(&["nope"])).await.unwrap_err();
    assert!(unknown.to_string().contains("nope"));

    // rejected by the client before dispatch
    let empty = client.send_notification(send(&[])).await.unwrap_err();
    assert_eq!(empty.code().as_str(), "INVALID_VALUE");
}

#[tokio::test]
async fn unknown_action() {
    let state = node("version: 1\n");
    let err = state
        .client()
        .execute::<_, CreateNotificationConfigResponse>("nope/action", create(None, slack_config("x")))
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "UNKNOWN_ACTION");
}

#[tokio::test]
async fn older_node_cannot_rebuild_unknown_channel() {
    let state = node("version: 1\nregistry:\n  channels: [slack]\n");
    let sns = NotificationConfig::new(
        "sns",
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:012345678901:alerts".into(),
            role_arn: None,
        }),
    );
    let err = state
        .client()
        .create_notification_config(create(None, sns))
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "RECONSTRUCTION_ERROR");
    assert_eq!(err.root_cause().code().as_str(), "UNKNOWN_VARIANT");
    assert!(state.store().is_empty());
}

/// Response type owned by a different module: same wire layout, different type.
#[derive(Debug)]
struct ForeignCreated {
    id: String,
}

impl Writeable for ForeignCreated {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.id)
    }
}

struct ForeignCreate;

#[async_trait]
impl ActionHandler for ForeignCreate {
    fn action(&self) -> &'static str {
        "plugin/create"
    }

    async fn handle(&self, ctx: ActionCtx, request: OpaqueHandle) -> Result<OpaqueHandle> {
        let req: CreateNotificationConfigRequest = ctx.reconstruct(request)?;
        Ok(OpaqueHandle::new(ForeignCreated {
            id: format!("{}@{}", req.config.name, ctx.node_name()),
        }))
    }
}

#[tokio::test]
async fn responses_are_rebuilt_as_local_types() {
    let state = node("version: 1\nnode:\n  name: node-b\n");
    state.dispatcher().register(Arc::new(ForeignCreate));
    assert!(state.dispatcher().registered_actions().contains(&"plugin/create"));

    let resp: CreateNotificationConfigResponse = state
        .client()
        .execute("plugin/create", create(None, slack_config("ops")))
        .await
        .unwrap();
    assert_eq!(resp.config_id, "ops@node-b");
}

/// Local request type with an extra trailing field the handler's type lacks.
struct NewerRequest {
    inner: CreateNotificationConfigRequest,
    priority: i32,
}

impl Writeable for NewerRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        self.inner.write_to(out)?;
        out.write_i32(self.priority);
        Ok(())
    }
}

impl Validate for NewerRequest {
    fn validate(&self) -> Result<()> {
        self.inner.validate()
    }
}

#[tokio::test]
async fn newer_request_is_accepted_by_older_handler() {
    let state = node("version: 1\n");
    let resp: CreateNotificationConfigResponse = state
        .client()
        .execute(
            "notifications/configs/create",
            NewerRequest {
                inner: create(Some("n1"), slack_config("ops")),
                priority: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.config_id, "n1");
}

#[test]
fn node_codec_uses_configured_limits() {
    let state = node("version: 1\ncodec:\n  max_string_bytes: 4\n");
    let bytes = state.codec().encode(&slack_config("too long")).unwrap();
    let err = state.codec().decode::<NotificationConfig>(bytes).unwrap_err();
    assert_eq!(err.code().as_str(), "DECODE_ERROR");

    let mut input = StreamInput::new(state.codec().encode(&slack_config("ok")).unwrap())
        .with_registries(state.registries());
    assert_eq!(NotificationConfig::read_from(&mut input).unwrap().name, "ok");
}
