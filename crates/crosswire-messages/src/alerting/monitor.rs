//! Monitor-side payloads carried by the fan-out request.

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, Writeable,
};

use crate::alerting::trigger::Trigger;

const ID: &str = "id";
const MONITOR_NAME: &str = "name";
const ENABLED: &str = "enabled";
const TRIGGERS: &str = "triggers";
const INDEX: &str = "index";
const SHARD: &str = "shard";
const WORKFLOW_ID: &str = "workflow_id";
const CHAINED_MONITOR_ID: &str = "chained_monitor_id";

/// Monitor id substituted when the monitor could not be decoded.
pub const FAILED_SERDE_ID: &str = "failed_serde";

/// The parts of a monitor a fan-out worker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSummary {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub triggers: Vec<Trigger>,
}

impl MonitorSummary {
    /// Sentinel used when the monitor could not be decoded. Whether a monitor
    /// is the sentinel is recorded in the decode report, not in its id.
    pub fn placeholder() -> Self {
        Self {
            id: FAILED_SERDE_ID.to_string(),
            name: FAILED_SERDE_ID.to_string(),
            enabled: false,
            triggers: Vec::new(),
        }
    }
}

impl Writeable for MonitorSummary {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.id)?;
        out.write_string(&self.name)?;
        out.write_bool(self.enabled);
        out.write_variant_list(&self.triggers)
    }
}

impl Readable for MonitorSummary {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            id: input.read_string()?,
            name: input.read_string()?,
            enabled: input.read_bool()?,
            triggers: input.read_variant_list()?,
        })
    }
}

impl ToText for MonitorSummary {
    fn to_text(&self, cx: &TextContext<'_>) -> Result<Value> {
        ObjectWriter::new()
            .field(ID, self.id.as_str())
            .field(MONITOR_NAME, self.name.as_str())
            .field(ENABLED, self.enabled)
            .variant_list(TRIGGERS, &self.triggers, cx)
            .map(ObjectWriter::finish)
    }
}

impl FromText for MonitorSummary {
    fn from_text(value: &Value, cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut id, mut name) = (None, None);
        let mut enabled = true;
        let mut triggers = Vec::new();
        for (field, v) in obj.fields() {
            match field {
                ID => id = Some(text::string(field, v)?),
                MONITOR_NAME => name = Some(text::string(field, v)?),
                ENABLED => enabled = text::boolean(field, v)?,
                TRIGGERS => triggers = text::variant_list(field, v, cx)?,
                _ => obj.skip(field),
            }
        }
        Ok(Self {
            id: text::required(id, ID)?,
            name: text::required(name, MONITOR_NAME)?,
            enabled,
            triggers,
        })
    }
}

impl Message for MonitorSummary {
    const NAME: &'static str = "MonitorSummary";
}

/// Index shard addressed by a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardId {
    pub index: String,
    pub shard: i32,
}

impl ShardId {
    pub fn new(index: impl Into<String>, shard: i32) -> Self {
        Self {
            index: index.into(),
            shard,
        }
    }
}

impl Writeable for ShardId {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.index)?;
        out.write_i32(self.shard);
        Ok(())
    }
}

impl Readable for ShardId {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            index: input.read_string()?,
            shard: input.read_i32()?,
        })
    }
}

impl ToText for ShardId {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(INDEX, self.index.as_str())
            .field(SHARD, self.shard)
            .finish())
    }
}

impl FromText for ShardId {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut index, mut shard) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                INDEX => index = Some(text::string(name, v)?),
                SHARD => shard = Some(text::int(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            index: text::required(index, INDEX)?,
            shard: text::required(shard, SHARD)?,
        })
    }
}

impl Message for ShardId {
    const NAME: &'static str = "ShardId";
}

/// Set when the monitor runs as a step of a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRunContext {
    pub workflow_id: String,
    pub chained_monitor_id: Option<String>,
}

impl Writeable for WorkflowRunContext {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.workflow_id)?;
        out.write_optional_string(self.chained_monitor_id.as_deref())
    }
}

impl Readable for WorkflowRunContext {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            workflow_id: input.read_string()?,
            chained_monitor_id: input.read_optional_string()?,
        })
    }
}

impl ToText for WorkflowRunContext {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(ObjectWriter::new()
            .field(WORKFLOW_ID, self.workflow_id.as_str())
            .field_if_some(CHAINED_MONITOR_ID, self.chained_monitor_id.as_deref())
            .finish())
    }
}

impl FromText for WorkflowRunContext {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let (mut workflow_id, mut chained_monitor_id) = (None, None);
        for (name, v) in obj.fields() {
            match name {
                WORKFLOW_ID => workflow_id = Some(text::string(name, v)?),
                CHAINED_MONITOR_ID => chained_monitor_id = text::string_or_null(name, v)?,
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            workflow_id: text::required(workflow_id, WORKFLOW_ID)?,
            chained_monitor_id,
        })
    }
}

impl Message for WorkflowRunContext {
    const NAME: &'static str = "WorkflowRunContext";
}
