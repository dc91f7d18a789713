//! Monitor fan-out decoding across mixed-version nodes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use crosswire_core::{Codec, FieldStatus, Registries, Validate};
use crosswire_messages::alerting::{
    DocumentLevelTrigger, MonitorFanOutRequest, MonitorSummary, QueryLevelTrigger, ShardId,
    Trigger, TriggerHeader, WorkflowRunContext, FAILED_SERDE_ID,
};
use crosswire_messages::{registries_for, standard_registries, CHANNEL_TAGS};

fn header(id: &str) -> TriggerHeader {
    TriggerHeader {
        id: id.into(),
        name: format!("{id} trigger"),
        severity: "1".into(),
    }
}

fn request() -> MonitorFanOutRequest {
    MonitorFanOutRequest {
        monitor: MonitorSummary {
            id: "mon-1".into(),
            name: "error rate".into(),
            enabled: true,
            triggers: vec![Trigger::QueryLevel(QueryLevelTrigger {
                header: header("t1"),
                condition: "hits > 10".into(),
            })],
        },
        dry_run: true,
        execution_id: "exec-7".into(),
        shard_ids: vec![ShardId::new("logs", 0), ShardId::new("logs", 1)],
        concrete_indices: vec!["logs-2024.01".into()],
        workflow_run_context: Some(WorkflowRunContext {
            workflow_id: "wf-1".into(),
            chained_monitor_id: None,
        }),
    }
}

/// Byte length of the encoding up to and including the execution id, and
/// up to and including the shard ids.
fn offsets(codec: &Codec<'_>, req: &MonitorFanOutRequest) -> (usize, usize) {
    let mut out = codec.output();
    out.write_message(&req.monitor).unwrap();
    out.write_bool(req.dry_run);
    out.write_string(&req.execution_id).unwrap();
    let after_execution_id = out.len();
    out.write_message_list(&req.shard_ids).unwrap();
    (after_execution_id, out.len())
}

fn encoded(regs: &Registries) -> Bytes {
    Codec::new().with_registries(regs).encode(&request()).unwrap()
}

#[test]
fn full_request_decodes_clean() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let decoded = codec.decode_tolerant::<MonitorFanOutRequest>(encoded(&regs));
    assert!(!decoded.report.is_degraded());
    assert_eq!(decoded.report.trailing_bytes, 0);
    let req = decoded.accept().unwrap();
    assert_eq!(req, request());
    req.validate().unwrap();
}

#[test]
fn truncated_shard_ids_reject_the_request() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let bytes = encoded(&regs);
    let (after_execution_id, _) = offsets(&codec, &request());

    let decoded =
        codec.decode_tolerant::<MonitorFanOutRequest>(bytes.slice(..after_execution_id + 3));
    let report = &decoded.report;
    assert_eq!(report.status_of("monitor"), Some(&FieldStatus::Decoded));
    assert_eq!(report.status_of("execution_id"), Some(&FieldStatus::Decoded));
    assert_eq!(
        report.defaulted(),
        vec!["shard_ids", "concrete_indices", "workflow_run_context"]
    );
    assert_eq!(report.rejected_fields(), vec!["shard_ids"]);
    assert!(decoded.value.shard_ids.is_empty());
    assert_eq!(decoded.value.execution_id, "exec-7");

    let err = decoded.accept().unwrap_err();
    assert_eq!(err.code().as_str(), "MESSAGE_REJECTED");
}

#[test]
fn missing_tail_is_accepted_with_reduced_functionality() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let bytes = encoded(&regs);
    let (_, after_shard_ids) = offsets(&codec, &request());

    let decoded = codec.decode_tolerant::<MonitorFanOutRequest>(bytes.slice(..after_shard_ids));
    assert_eq!(
        decoded.report.defaulted(),
        vec!["concrete_indices", "workflow_run_context"]
    );
    let req = decoded.accept().unwrap();
    assert_eq!(req.shard_ids.len(), 2);
    assert!(req.concrete_indices.is_empty());
    assert_eq!(req.workflow_run_context, None);

    // strict decoding of the same bytes fails outright
    let err = codec
        .decode::<MonitorFanOutRequest>(bytes.slice(..after_shard_ids))
        .unwrap_err();
    assert_eq!(err.code().as_str(), "DECODE_ERROR");
}

#[test]
fn unknown_trigger_tag_yields_placeholder_monitor() {
    let newer = standard_registries().unwrap();
    let older = registries_for(CHANNEL_TAGS, &["query_level_trigger"]).unwrap();

    let mut req = request();
    req.monitor.triggers.push(Trigger::DocumentLevel(DocumentLevelTrigger {
        header: header("t2"),
        condition: "doc.level == 'ERROR'".into(),
    }));
    let bytes = Codec::new().with_registries(&newer).encode(&req).unwrap();

    let decoded = Codec::new()
        .with_registries(&older)
        .decode_tolerant::<MonitorFanOutRequest>(bytes);
    assert_eq!(decoded.value.monitor, MonitorSummary::placeholder());
    assert!(MonitorFanOutRequest::monitor_defaulted(&decoded.report));
    assert!(matches!(
        decoded.report.status_of("monitor"),
        Some(FieldStatus::DefaultedDueToSkew { reason }) if reason.contains("document_level_trigger")
    ));
    assert!(matches!(
        decoded.report.status_of("dry_run"),
        Some(FieldStatus::DefaultedDueToSkew { reason }) if reason.contains("`monitor`")
    ));
    assert!(decoded.report.trailing_bytes > 0);
    assert_eq!(
        decoded.report.rejected_fields(),
        vec!["monitor", "shard_ids"]
    );

    let err = decoded.accept().unwrap_err();
    assert_eq!(err.code().as_str(), "MESSAGE_REJECTED");
}

#[test]
fn monitor_named_like_the_sentinel_is_still_real_data() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let mut req = request();
    req.monitor.id = FAILED_SERDE_ID.into();
    req.validate().unwrap();

    let decoded = codec.decode_tolerant::<MonitorFanOutRequest>(codec.encode(&req).unwrap());
    assert!(!MonitorFanOutRequest::monitor_defaulted(&decoded.report));
    assert_eq!(decoded.report.status_of("monitor"), Some(&FieldStatus::Decoded));
    let accepted = decoded.accept().unwrap();
    accepted.validate().unwrap();
    assert_eq!(accepted.monitor.id, FAILED_SERDE_ID);
}

#[test]
fn appended_fields_are_ignored() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let mut out = codec.output();
    out.write_message(&request()).unwrap();
    out.write_string("field from a newer producer").unwrap();
    let decoded = codec.decode_tolerant::<MonitorFanOutRequest>(out.freeze());
    assert!(!decoded.report.is_degraded());
    assert!(decoded.report.trailing_bytes > 0);
    assert_eq!(decoded.accept().unwrap(), request());
}

#[test]
fn text_lane_round_trip_and_mandatory_fields() {
    let regs = standard_registries().unwrap();
    let codec = Codec::new().with_registries(&regs);
    let s = codec.to_json(&request()).unwrap();
    assert!(s.contains(r#""triggers":[{"query_level_trigger":"#));
    assert_eq!(codec.from_json::<MonitorFanOutRequest>(&s).unwrap(), request());

    let err = codec
        .from_json::<MonitorFanOutRequest>(
            r#"{"monitor":{"id":"m","name":"n"},"execution_id":"e"}"#,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "missing field: shard_ids");
}

#[test]
fn validate_requires_shards() {
    let mut req = request();
    req.shard_ids.clear();
    assert!(req.validate().is_err());
}
