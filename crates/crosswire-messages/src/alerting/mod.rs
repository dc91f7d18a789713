//! Alerting messages: triggers and the tolerant monitor fan-out request.

pub mod fanout;
pub mod monitor;
pub mod trigger;

pub use fanout::MonitorFanOutRequest;
pub use monitor::{MonitorSummary, ShardId, WorkflowRunContext, FAILED_SERDE_ID};
pub use trigger::{
    BucketLevelTrigger, DocumentLevelTrigger, QueryLevelTrigger, Trigger, TriggerHeader,
};
