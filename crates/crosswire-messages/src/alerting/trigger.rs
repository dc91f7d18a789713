//! Alerting triggers (registry family `trigger`).

use serde_json::Value;

use crosswire_core::protocol::text::{self, ObjectReader, ObjectWriter, TextContext};
use crosswire_core::{
    FromText, Message, Readable, Result, StreamInput, StreamOutput, ToText, VariantFamily,
    Writeable,
};

pub const QUERY_LEVEL_TRIGGER: &str = "query_level_trigger";
pub const BUCKET_LEVEL_TRIGGER: &str = "bucket_level_trigger";
pub const DOCUMENT_LEVEL_TRIGGER: &str = "document_level_trigger";

const ID: &str = "id";
const TRIGGER_NAME: &str = "name";
const SEVERITY: &str = "severity";
const CONDITION: &str = "condition";
const PARENT_BUCKET_PATH: &str = "parent_bucket_path";

/// Fields shared by every trigger kind, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerHeader {
    pub id: String,
    pub name: String,
    /// Alerting severity ("1" highest .. "5").
    pub severity: String,
}

impl TriggerHeader {
    fn write(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        out.write_string(&self.id)?;
        out.write_string(&self.name)?;
        out.write_string(&self.severity)
    }

    fn read(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            id: input.read_string()?,
            name: input.read_string()?,
            severity: input.read_string()?,
        })
    }

    fn text(&self) -> ObjectWriter {
        ObjectWriter::new()
            .field(ID, self.id.as_str())
            .field(TRIGGER_NAME, self.name.as_str())
            .field(SEVERITY, self.severity.as_str())
    }
}

/// Collects header fields while walking a trigger object.
#[derive(Default)]
struct HeaderFields {
    id: Option<String>,
    name: Option<String>,
    severity: Option<String>,
}

impl HeaderFields {
    /// Returns false when `field` is not a header field.
    fn accept(&mut self, field: &str, v: &Value) -> Result<bool> {
        match field {
            ID => self.id = Some(text::string(field, v)?),
            TRIGGER_NAME => self.name = Some(text::string(field, v)?),
            SEVERITY => self.severity = Some(text::string(field, v)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<TriggerHeader> {
        Ok(TriggerHeader {
            id: text::required(self.id, ID)?,
            name: text::required(self.name, TRIGGER_NAME)?,
            severity: text::required(self.severity, SEVERITY)?,
        })
    }
}

/// Fires on a query result condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLevelTrigger {
    pub header: TriggerHeader,
    pub condition: String,
}

impl Writeable for QueryLevelTrigger {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        self.header.write(out)?;
        out.write_string(&self.condition)
    }
}

impl Readable for QueryLevelTrigger {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            header: TriggerHeader::read(input)?,
            condition: input.read_string()?,
        })
    }
}

impl ToText for QueryLevelTrigger {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(self
            .header
            .text()
            .field(CONDITION, self.condition.as_str())
            .finish())
    }
}

impl FromText for QueryLevelTrigger {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut header = HeaderFields::default();
        let mut condition = None;
        for (name, v) in obj.fields() {
            if header.accept(name, v)? {
                continue;
            }
            match name {
                CONDITION => condition = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            header: header.finish()?,
            condition: text::required(condition, CONDITION)?,
        })
    }
}

impl Message for QueryLevelTrigger {
    const NAME: &'static str = "QueryLevelTrigger";
}

/// Fires per aggregation bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLevelTrigger {
    pub header: TriggerHeader,
    pub parent_bucket_path: String,
    pub condition: String,
}

impl Writeable for BucketLevelTrigger {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        self.header.write(out)?;
        out.write_string(&self.parent_bucket_path)?;
        out.write_string(&self.condition)
    }
}

impl Readable for BucketLevelTrigger {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            header: TriggerHeader::read(input)?,
            parent_bucket_path: input.read_string()?,
            condition: input.read_string()?,
        })
    }
}

impl ToText for BucketLevelTrigger {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(self
            .header
            .text()
            .field(PARENT_BUCKET_PATH, self.parent_bucket_path.as_str())
            .field(CONDITION, self.condition.as_str())
            .finish())
    }
}

impl FromText for BucketLevelTrigger {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut header = HeaderFields::default();
        let (mut parent_bucket_path, mut condition) = (None, None);
        for (name, v) in obj.fields() {
            if header.accept(name, v)? {
                continue;
            }
            match name {
                PARENT_BUCKET_PATH => parent_bucket_path = Some(text::string(name, v)?),
                CONDITION => condition = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            header: header.finish()?,
            parent_bucket_path: text::required(parent_bucket_path, PARENT_BUCKET_PATH)?,
            condition: text::required(condition, CONDITION)?,
        })
    }
}

impl Message for BucketLevelTrigger {
    const NAME: &'static str = "BucketLevelTrigger";
}

/// Fires per matching document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLevelTrigger {
    pub header: TriggerHeader,
    pub condition: String,
}

impl Writeable for DocumentLevelTrigger {
    fn write_to(&self, out: &mut StreamOutput<'_>) -> Result<()> {
        self.header.write(out)?;
        out.write_string(&self.condition)
    }
}

impl Readable for DocumentLevelTrigger {
    fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
        Ok(Self {
            header: TriggerHeader::read(input)?,
            condition: input.read_string()?,
        })
    }
}

impl ToText for DocumentLevelTrigger {
    fn to_text(&self, _cx: &TextContext<'_>) -> Result<Value> {
        Ok(self
            .header
            .text()
            .field(CONDITION, self.condition.as_str())
            .finish())
    }
}

impl FromText for DocumentLevelTrigger {
    fn from_text(value: &Value, _cx: &TextContext<'_>) -> Result<Self> {
        let obj = ObjectReader::new(Self::NAME, value)?;
        let mut header = HeaderFields::default();
        let mut condition = None;
        for (name, v) in obj.fields() {
            if header.accept(name, v)? {
                continue;
            }
            match name {
                CONDITION => condition = Some(text::string(name, v)?),
                _ => obj.skip(name),
            }
        }
        Ok(Self {
            header: header.finish()?,
            condition: text::required(condition, CONDITION)?,
        })
    }
}

impl Message for DocumentLevelTrigger {
    const NAME: &'static str = "DocumentLevelTrigger";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    QueryLevel(QueryLevelTrigger),
    BucketLevel(BucketLevelTrigger),
    DocumentLevel(DocumentLevelTrigger),
}

impl Trigger {
    pub fn header(&self) -> &TriggerHeader {
        match self {
            Trigger::QueryLevel(t) => &t.header,
            Trigger::BucketLevel(t) => &t.header,
            Trigger::DocumentLevel(t) => &t.header,
        }
    }

    pub fn as_query_level(&self) -> Option<&QueryLevelTrigger> {
        match self {
            Trigger::QueryLevel(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bucket_level(&self) -> Option<&BucketLevelTrigger> {
        match self {
            Trigger::BucketLevel(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_document_level(&self) -> Option<&DocumentLevelTrigger> {
        match self {
            Trigger::DocumentLevel(t) => Some(t),
            _ => None,
        }
    }
}

impl VariantFamily for Trigger {
    const FAMILY: &'static str = "trigger";

    fn variant_tag(&self) -> &str {
        match self {
            Trigger::QueryLevel(_) => QUERY_LEVEL_TRIGGER,
            Trigger::BucketLevel(_) => BUCKET_LEVEL_TRIGGER,
            Trigger::DocumentLevel(_) => DOCUMENT_LEVEL_TRIGGER,
        }
    }
}
