//! Text lane: JSON objects with named fields.
//!
//! Decoding walks the object's fields in whatever order they appear; names
//! the reader does not recognize are skipped (and logged at debug). Mandatory
//! fields are checked once the whole object has been consumed.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{Result, WireError};
use crate::message::{FromText, ToText, WireEnum};
use crate::protocol::wire::family_registry;
use crate::registry::{Registries, VariantFamily};

/// Carries the registries needed to resolve variant fields.
#[derive(Clone, Copy, Default)]
pub struct TextContext<'r> {
    registries: Option<&'r Registries>,
}

impl TextContext<'static> {
    pub fn new() -> Self {
        Self { registries: None }
    }
}

impl<'r> TextContext<'r> {
    pub fn with_registries(registries: &'r Registries) -> Self {
        Self {
            registries: Some(registries),
        }
    }

    pub fn registries(&self) -> Option<&'r Registries> {
        self.registries
    }
}

/// Parse raw JSON text. Syntax errors map to `PARSE_ERROR`.
pub fn parse(s: &str) -> Result<Value> {
    serde_json::from_str(s).map_err(|e| WireError::Parse(e.to_string()))
}

/// Field iterator over one JSON object.
pub struct ObjectReader<'v> {
    message: &'static str,
    fields: &'v Map<String, Value>,
}

impl<'v> ObjectReader<'v> {
    pub fn new(message: &'static str, value: &'v Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { message, fields }),
            _ => Err(WireError::type_mismatch(message, "object")),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'v str, &'v Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record an unrecognized field and move on.
    pub fn skip(&self, name: &str) {
        tracing::debug!(message = self.message, field = name, "skipping unknown field");
    }
}

/// Resolve a mandatory field collected while walking an object.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| WireError::MissingField(field.to_string()))
}

pub fn string(field: &str, v: &Value) -> Result<String> {
    v.as_str()
        .map(str::to_owned)
        .ok_or_else(|| WireError::type_mismatch(field, "string"))
}

/// `null` reads as absent.
pub fn string_or_null(field: &str, v: &Value) -> Result<Option<String>> {
    match v {
        Value::Null => Ok(None),
        other => string(field, other).map(Some),
    }
}

pub fn boolean(field: &str, v: &Value) -> Result<bool> {
    v.as_bool()
        .ok_or_else(|| WireError::type_mismatch(field, "boolean"))
}

pub fn int(field: &str, v: &Value) -> Result<i32> {
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| WireError::type_mismatch(field, "32-bit integer"))
}

pub fn long(field: &str, v: &Value) -> Result<i64> {
    v.as_i64()
        .ok_or_else(|| WireError::type_mismatch(field, "64-bit integer"))
}

fn array<'v>(field: &str, v: &'v Value) -> Result<&'v Vec<Value>> {
    v.as_array()
        .ok_or_else(|| WireError::type_mismatch(field, "array"))
}

pub fn string_list(field: &str, v: &Value) -> Result<Vec<String>> {
    array(field, v)?.iter().map(|item| string(field, item)).collect()
}

pub fn string_map(field: &str, v: &Value) -> Result<BTreeMap<String, String>> {
    let obj = v
        .as_object()
        .ok_or_else(|| WireError::type_mismatch(field, "object"))?;
    obj.iter()
        .map(|(k, item)| Ok((k.clone(), string(field, item)?)))
        .collect()
}

/// Enum tag string. Unrecognized tags fall back when the enum declares one.
pub fn enum_tag<E: WireEnum>(field: &str, v: &Value) -> Result<E> {
    let tag = v
        .as_str()
        .ok_or_else(|| WireError::type_mismatch(field, "enum tag string"))?;
    if let Some(e) = E::from_tag(tag) {
        return Ok(e);
    }
    match E::fallback() {
        Some(e) => {
            tracing::debug!(enum_name = E::NAME, tag, fallback = e.tag(), "unknown enum tag");
            Ok(e)
        }
        None => Err(WireError::InvalidValue(format!(
            "{field}: unknown {} tag `{tag}`",
            E::NAME
        ))),
    }
}

pub fn message<T: FromText>(field: &str, v: &Value, cx: &TextContext<'_>) -> Result<T> {
    if !v.is_object() {
        return Err(WireError::type_mismatch(field, "object"));
    }
    T::from_text(v, cx)
}

pub fn message_list<T: FromText>(field: &str, v: &Value, cx: &TextContext<'_>) -> Result<Vec<T>> {
    array(field, v)?
        .iter()
        .map(|item| message(field, item, cx))
        .collect()
}

/// Single-key object `{"<tag>": {...}}` resolved via the family registry.
pub fn variant<F: VariantFamily>(field: &str, v: &Value, cx: &TextContext<'_>) -> Result<F> {
    let Some((tag, payload)) = v
        .as_object()
        .filter(|obj| obj.len() == 1)
        .and_then(|obj| obj.iter().next())
    else {
        return Err(WireError::type_mismatch(field, "single-key variant object"));
    };
    family_registry::<F>(cx.registries, tag)?.decode_text(tag, payload, cx)
}

pub fn variant_list<F: VariantFamily>(
    field: &str,
    v: &Value,
    cx: &TextContext<'_>,
) -> Result<Vec<F>> {
    array(field, v)?
        .iter()
        .map(|item| variant(field, item, cx))
        .collect()
}

/// Encode a variant as `{"<tag>": {...}}`.
pub fn variant_value<F: VariantFamily>(value: &F, cx: &TextContext<'_>) -> Result<Value> {
    let registry = family_registry::<F>(cx.registries, value.variant_tag())?;
    let (tag, payload) = registry.encode_text(value, cx)?;
    let mut obj = Map::with_capacity(1);
    obj.insert(tag.to_string(), payload);
    Ok(Value::Object(obj))
}

/// Builder for an encoded object. Fields keep insertion order.
#[derive(Default)]
pub struct ObjectWriter {
    fields: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Absent optionals are omitted.
    pub fn field_if_some<T: Into<Value>>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    pub fn enum_tag<E: WireEnum>(self, name: &str, value: E) -> Self {
        self.field(name, value.tag())
    }

    pub fn string_map(self, name: &str, map: &BTreeMap<String, String>) -> Self {
        let obj: Map<String, Value> = map
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        self.field(name, Value::Object(obj))
    }

    pub fn message<T: ToText + ?Sized>(
        self,
        name: &str,
        value: &T,
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        let v = value.to_text(cx)?;
        Ok(self.field(name, v))
    }

    pub fn message_if_some<T: ToText>(
        self,
        name: &str,
        value: Option<&T>,
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        match value {
            Some(v) => self.message(name, v, cx),
            None => Ok(self),
        }
    }

    pub fn message_list<T: ToText>(
        self,
        name: &str,
        items: &[T],
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        let values = items
            .iter()
            .map(|item| item.to_text(cx))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.field(name, Value::Array(values)))
    }

    pub fn variant<F: VariantFamily>(
        self,
        name: &str,
        value: &F,
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        let v = variant_value(value, cx)?;
        Ok(self.field(name, v))
    }

    pub fn variant_if_some<F: VariantFamily>(
        self,
        name: &str,
        value: Option<&F>,
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        match value {
            Some(v) => self.variant(name, v, cx),
            None => Ok(self),
        }
    }

    pub fn variant_list<F: VariantFamily>(
        self,
        name: &str,
        items: &[F],
        cx: &TextContext<'_>,
    ) -> Result<Self> {
        let values = items
            .iter()
            .map(|item| variant_value(item, cx))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.field(name, Value::Array(values)))
    }

    pub fn finish(self) -> Value {
        Value::Object(self.fields)
    }
}
