//! Fan-out request sent from the coordinating node to shard workers.
//!
//! Coordinator and workers may run different versions during a rolling
//! upgrade, so the binary form is decoded tolerantly. Sentinels per field:
//!
//! | field | sentinel | policy |
//! |---|---|---|
//! | `monitor` | [`MonitorSummary::placeholder`] (`failed_serde`) | reject |
//! | `dry_run` | `false` | reduced |
//! | `execution_id` | `""` | reduced |
//! | `shard_ids` | `[]` | reject |
//! | `concrete_indices` | `[]` | reduced |
//! | `workflow_run_context` | absent | reduced |

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    DecodeReport, Decoded, FieldSpec, FromText, Message, Readable, ResilientDecoder, Result, SentinelPolicy,
    StreamInput, StreamOutput, ToText, TolerantReadable, Validate, WireError, Writeable,
};

use crate::alerting::monitor::{MonitorSummary, ShardId, WorkflowRunContext};

const MONITOR: &str = "monitor";
const DRY_RUN: &str = "dry_run";
const EXECUTION_ID: &str = "execution_id";
const SHARD_IDS: &str = "shard_ids";
const CONCRETE_INDICES: &str = "concrete_indices";
const WORKFLOW_RUN_CONTEXT: &str = "workflow_run_context";

pub const MONITOR_FIELD: FieldSpec<MonitorSummary> = FieldSpec {
    name: MONITOR,
    policy: SentinelPolicy::RejectMessage,
    sentinel: MonitorSummary::placeholder,
};
pub const DRY_RUN_FIELD: FieldSpec<bool> = FieldSpec {
    name: DRY_RUN,
    policy: SentinelPolicy::ReducedFunctionality,
    sentinel: not_dry_run,
};
pub const EXECUTION_ID_FIELD: FieldSpec<String> = FieldSpec {
    name: EXECUTION_ID,
    policy: SentinelPolicy::ReducedFunctionality,
    sentinel: String::new,
};
pub const SHARD_IDS_FIELD: FieldSpec<Vec<ShardId>> = FieldSpec {
    name: SHARD_IDS,
    policy: SentinelPolicy::RejectMessage,
    sentinel: Vec::new,
};
pub const CONCRETE_INDICES_FIELD: FieldSpec<Vec<String>> = FieldSpec {
    name: CONCRETE_INDICES,
    policy: SentinelPolicy::ReducedFunctionality,
    sentinel: Vec::new,
};
pub const WORKFLOW_RUN_CONTEXT_FIELD: FieldSpec<Option<WorkflowRunContext>> = FieldSpec {
    name: WORKFLOW_RUN_CONTEXT,
    policy: SentinelPolicy::ReducedFunctionality,
    sentinel: no_workflow,
};

fn not_dry_run() -> bool {
    false
}

fn no_workflow() -> Option<WorkflowRunContext> {
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorFanOutRequest {
    pub monitor: MonitorSummary,
    pub dry_run: bool,
    pub execution_id: String,
    pub shard_ids: Vec<ShardId>,
    pub concrete_indices: Vec<String>,
    pub workflow_run_context: Option<WorkflowRunContext>,
}

impl MonitorFanOutRequest {
    /// Whether a tolerant decode substituted the monitor sentinel. A monitor
    /// that genuinely carries the `failed_serde` id is not a sentinel.
    pub fn monitor_defaulted(report: &DecodeReport) -> bool {
        report.is_defaulted(MONITOR_FIELD.name)
    }
}

impl Writeable for MonitorFanOutRequest {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_message(&self.monitor)?;
        out.write_bool(self.dry_run);
        out.write_string(&self.execution_id)?;
        out.write_message_list(&self.shard_ids)?;
        out.write_string_list(&self.concrete_indices)?;
        out.write_optional_message(self.workflow_run_context.as_ref())
    }
}

impl Readable for MonitorFanOutRequest {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            monitor: input.read_message()?,
            dry_run: input.read_bool()?,
            execution_id: input.read_string()?,
            shard_ids: input.read_message_list()?,
            concrete_indices: input.read_string_list()?,
            workflow_run_context: input.read_optional_message()?,
        })
    }
}

impl TolerantReadable for MonitorFanOutRequest {
    fn read_tolerant(input: &mut StreamInput<'_>) -> Decoded<Self> {
        let mut d = ResilientDecoder::new(Self::NAME, input);
        let monitor = d.field(MONITOR_FIELD, |i| i.read_message());
        let dry_run = d.field(DRY_RUN_FIELD, |i| i.read_bool());
        let execution_id = d.field(EXECUTION_ID_FIELD, |i| i.read_string());
        let shard_ids = d.field(SHARD_IDS_FIELD, |i| i.read_message_list());
        let concrete_indices = d.field(CONCRETE_INDICES_FIELD, |i| i.read_string_list());
        let workflow_run_context =
            d.field(WORKFLOW_RUN_CONTEXT_FIELD, |i| i.read_optional_message());
        d.finish(Self {
            monitor,
            dry_run,
            execution_id,
            shard_ids,
            concrete_indices,
            workflow_run_context,
        })
    }
}

impl ToText for MonitorFanOutRequest {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .message(MONITOR, &self.monitor, cx)?
            .field(DRY_RUN, self.dry_run)
            .field(EXECUTION_ID, self.execution_id.as_str())
            .message_list(SHARD_IDS, &self.shard_ids, cx)?
            .field(CONCRETE_INDICES, self.concrete_indices.clone())
            .message_if_some(WORKFLOW_RUN_CONTEXT, self.workflow_run_context.as_ref(), cx)?
            .finish())
    }
}

impl FromText for MonitorFanOutRequest {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut monitor, mut execution_id, mut shard_ids) = (None, None, None);
        let mut dry_run = false;
        let mut concrete_indices = Vec::new();
        let mut workflow_run_context = None;
        for (name, v) in obj.fields() {
            match name {
                MONITOR => monitor = Some(text::message(name, v, cx)?),
                DRY_RUN => dry_run = text::boolean(name, v)?,
                EXECUTION_ID => execution_id = Some(text::string(name, v)?),
                SHARD_IDS => shard_ids = Some(text::message_list(name, v, cx)?),
                CONCRETE_INDICES => concrete_indices = text::string_list(name, v)?,
                WORKFLOW_RUN_CONTEXT if v.is_null() => workflow_run_context = None,
                WORKFLOW_RUN_CONTEXT => workflow_run_context = Some(text::message(name, v, cx)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            monitor: text::required(monitor, MONITOR)?,
            dry_run,
            execution_id: text::required(execution_id, EXECUTION_ID)?,
            shard_ids: text::required(shard_ids, SHARD_IDS)?,
            concrete_indices,
            workflow_run_context,
        })
    }
}

impl Message for MonitorFanOutRequest {
    const NAME: &'static str = "MonitorFanOutRequest";
}

impl Validate for MonitorFanOutRequest {
    fn validate(&self) -> Result<()> {
        if self.shard_ids.is_empty() {
            return Err(WireError::InvalidValue(format!("{SHARD_IDS} must not be empty")));
        }
        Ok(())
    }
}
