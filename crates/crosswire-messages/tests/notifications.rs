//! Notification messages across both lanes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use crosswire_core::{Codec, Validate};
use crosswire_messages::notifications::{
    Attachment, ChannelConfig, ChannelMessage, ConfigType, CreateNotificationConfigRequest,
    Chime, DeleteNotificationConfigResponse, Email, EmailRecipient, EventSource,
    GetNotificationConfigRequest, GetNotificationConfigResponse, HttpMethodType, MicrosoftTeams,
    NotificationConfig, NotificationConfigInfo, SendNotificationRequest, SeverityType, Slack,
    Sns, UpdateNotificationConfigRequest, Webhook,
};
use crosswire_messages::{registries_for, standard_registries, TRIGGER_TAGS};

fn channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::Slack(Slack::new("https://hooks.slack.com/x")),
        ChannelConfig::Chime(Chime::new("https://chime.aws/x")),
        ChannelConfig::MicrosoftTeams(MicrosoftTeams::new("https://teams.example/x")),
        ChannelConfig::Webhook(Webhook {
            url: "https://hook.example/x".into(),
            header_params: [("Content-Type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            method: HttpMethodType::Patch,
        }),
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:012345678901:alerts".into(),
            role_arn: Some("arn:aws:iam::012345678901:role/notify".into()),
        }),
        ChannelConfig::Email(Email {
            email_account_id: "smtp-1".into(),
            recipient_list: vec![EmailRecipient::new("ops@example.com")],
            email_group_id_list: vec!["group-1".into()],
        }),
    ]
}

#[test]
fn every_channel_round_trips_on_both_lanes() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    for channel in channels() {
        let config = NotificationConfig::new("cfg", channel);
        config.validate().unwrap();

        let bytes = codec.encode(&config).unwrap();
        assert_eq!(codec.decode::<NotificationConfig>(bytes).unwrap(), config);

        let s = codec.to_json(&config).unwrap();
        assert_eq!(codec.from_json::<NotificationConfig>(&s).unwrap(), config);
    }
}

#[test]
fn notification_config_json_layout() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let config = NotificationConfig::new("ops", ChannelConfig::Slack(Slack::new("https://x")));
    assert_eq!(
        codec.to_text(&config).unwrap(),
        json!({
            "name": "ops",
            "description": "",
            "config_type": "slack",
            "is_enabled": true,
            "config": {"slack": {"url": "https://x"}}
        })
    );
}

#[test]
fn text_defaults_and_unknown_fields() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let config: NotificationConfig = codec
        .from_json(
            r#"{"config":{"chime":{"url":"https://c"}},"name":"n","config_type":"chime","last_updated_time_ms":1}"#,
        )
        .unwrap();
    assert_eq!(config.description, "");
    assert!(config.is_enabled);
    assert_eq!(config.config_type, ConfigType::Chime);
}

#[test]
fn unknown_enum_tags_fall_back() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let config: NotificationConfig = codec
        .from_json(r#"{"name":"n","config_type":"pagerduty"}"#)
        .unwrap();
    assert_eq!(config.config_type, ConfigType::None);
    config.validate().unwrap();

    let source: EventSource = codec
        .from_json(r#"{"title":"t","reference_id":"r","feature":"alerting","severity":"sev0"}"#)
        .unwrap();
    assert_eq!(source.severity, SeverityType::None);

    let hook: Webhook = codec
        .from_json(r#"{"url":"https://h","method":"TRACE"}"#)
        .unwrap();
    assert_eq!(hook.method, HttpMethodType::Post);
}

#[test]
fn older_node_rejects_unknown_channel_tag() {
    let full = standard_registries().unwrap();
    let older = registries_for(&["slack", "chime", "webhook"], TRIGGER_TAGS).unwrap();
    let config = NotificationConfig::new(
        "sns",
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:012345678901:a".into(),
            role_arn: None,
        }),
    );
    let bytes = Codec::new().with_registries(&full).encode(&config).unwrap();
    let err = Codec::new()
        .with_registries(&older)
        .decode::<NotificationConfig>(bytes)
        .unwrap_err();
    assert_eq!(err.code().as_str(), "UNKNOWN_VARIANT");
    assert_eq!(err.to_string(), "unknown channel variant: sns");
}

#[test]
fn validation_runs_after_decode() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);

    // decodes fine, fails domain checks
    let config: NotificationConfig = codec
        .from_json(r#"{"name":"n","config_type":"webhook","config":{"slack":{"url":"https://x"}}}"#)
        .unwrap();
    assert_eq!(config.validate().unwrap_err().code().as_str(), "INVALID_VALUE");

    let bad_url = NotificationConfig::new("n", ChannelConfig::Slack(Slack::new("ftp://x")));
    assert!(bad_url.validate().is_err());

    let bad_arn = ChannelConfig::Sns(Sns {
        topic_arn: "arn:aws:sns:topic".into(),
        role_arn: None,
    });
    assert!(bad_arn.validate().is_err());

    let bad_email = ChannelConfig::Email(Email {
        email_account_id: "a".into(),
        recipient_list: vec![EmailRecipient::new("nobody")],
        email_group_id_list: vec![],
    });
    assert!(bad_email.validate().is_err());

    let missing_config = NotificationConfig {
        config: None,
        ..NotificationConfig::new("n", ChannelConfig::Slack(Slack::new("https://x")))
    };
    assert!(missing_config.validate().is_err());

    let bad_id = CreateNotificationConfigRequest {
        config_id: Some("no spaces".into()),
        config: NotificationConfig::new("n", ChannelConfig::Slack(Slack::new("https://x"))),
    };
    assert!(bad_id.validate().is_err());
}

#[test]
fn channel_fields_are_checked_against_their_formats() {
    let rejected = [
        ChannelConfig::Slack(Slack::new("https://hooks.sla ck.com/x")),
        ChannelConfig::Chime(Chime::new("https://chime.aws:70000/x")),
        ChannelConfig::Webhook(Webhook::new("https://hook.example:http/x")),
        ChannelConfig::Email(Email {
            email_account_id: "smtp-1".into(),
            recipient_list: vec![EmailRecipient::new("x y@@z")],
            email_group_id_list: vec![],
        }),
        ChannelConfig::Email(Email {
            email_account_id: "smtp-1".into(),
            recipient_list: vec![
                EmailRecipient::new("ops@example.com"),
                EmailRecipient::new("a@b@c"),
            ],
            email_group_id_list: vec![],
        }),
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:012345678901:alerts".into(),
            role_arn: Some("not-an-arn".into()),
        }),
        ChannelConfig::Sns(Sns {
            topic_arn: "arn:aws:sns:us-east-1:12345:alerts".into(),
            role_arn: None,
        }),
    ];
    for channel in rejected {
        let err = channel.validate().unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_VALUE", "{channel:?}");
    }

    let ok = CreateNotificationConfigRequest {
        config_id: Some("dGVzdA+/_-1".into()),
        config: NotificationConfig::new("n", ChannelConfig::Slack(Slack::new("https://x"))),
    };
    ok.validate().unwrap();
}

#[test]
fn get_and_update_messages_round_trip() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let resp = GetNotificationConfigResponse {
        start_index: 0,
        total_hits: 2,
        config_list: channels()
            .into_iter()
            .take(2)
            .enumerate()
            .map(|(i, channel)| NotificationConfigInfo {
                config_id: format!("c{i}"),
                config: NotificationConfig::new("n", channel),
            })
            .collect(),
    };
    let bytes = codec.encode(&resp).unwrap();
    assert_eq!(codec.decode::<GetNotificationConfigResponse>(bytes).unwrap(), resp);
    let text = codec.to_text(&resp).unwrap();
    assert_eq!(
        text["config_list"][1]["config"]["config"],
        json!({"chime": {"url": "https://chime.aws/x"}})
    );
    assert_eq!(codec.from_text::<GetNotificationConfigResponse>(&text).unwrap(), resp);

    let req: GetNotificationConfigRequest =
        codec.from_json(r#"{"config_id_list":["a"]}"#).unwrap();
    assert_eq!(req, GetNotificationConfigRequest::by_ids(["a"]));
    req.validate().unwrap();
    let bad_page = GetNotificationConfigRequest {
        max_items: 0,
        ..req
    };
    assert!(bad_page.validate().is_err());

    let update = UpdateNotificationConfigRequest {
        config_id: "c0".into(),
        config: NotificationConfig::new("n", channels().remove(4)),
    };
    update.validate().unwrap();
    let s = codec.to_json(&update).unwrap();
    assert_eq!(codec.from_json::<UpdateNotificationConfigRequest>(&s).unwrap(), update);
    let no_id = UpdateNotificationConfigRequest {
        config_id: String::new(),
        ..update
    };
    assert!(no_id.validate().is_err());
}

#[test]
fn send_request_round_trips() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let mut source = EventSource::new("disk full", "alert-1", "alerting");
    source.severity = SeverityType::Critical;
    source.tags = vec!["prod".into()];
    let req = SendNotificationRequest {
        event_source: source,
        channel_message: ChannelMessage {
            text_description: "disk at 99%".into(),
            html_description: Some("<b>disk at 99%</b>".into()),
            attachment: Some(Attachment {
                file_name: "report.csv".into(),
                file_encoding: "base64".into(),
                file_data: "YSxiCg==".into(),
                file_content_type: None,
            }),
        },
        channel_id_list: vec!["config-1".into()],
        thread_context: None,
    };
    req.validate().unwrap();
    let bytes = codec.encode(&req).unwrap();
    assert_eq!(codec.decode::<SendNotificationRequest>(bytes).unwrap(), req);
    let s = codec.to_json(&req).unwrap();
    assert!(!s.contains("thread_context"));
    assert_eq!(codec.from_json::<SendNotificationRequest>(&s).unwrap(), req);

    let empty = SendNotificationRequest {
        channel_id_list: vec![],
        ..req
    };
    assert!(empty.validate().is_err());
}

#[test]
fn delete_response_status_map() {
    let codec = Codec::new();
    let resp = DeleteNotificationConfigResponse {
        config_id_to_status: [("a", "OK"), ("b", "NOT_FOUND")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    assert_eq!(
        codec.to_text(&resp).unwrap(),
        json!({"config_id_to_status": {"a": "OK", "b": "NOT_FOUND"}})
    );
    let bytes = codec.encode(&resp).unwrap();
    assert_eq!(codec.decode::<DeleteNotificationConfigResponse>(bytes).unwrap(), resp);
}

#[test]
fn slack_config_bytes() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let config = NotificationConfig::new("n", ChannelConfig::Slack(Slack::new("https://x")));
    // name, description, config_type=1, enabled, present, "slack", url
    assert_eq!(
        hex::encode(codec.encode(&config).unwrap()),
        "016e00000000010101\
         05736c61636b0968747470733a2f2f78"
    );
}
