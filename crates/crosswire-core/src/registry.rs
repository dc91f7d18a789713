//! Type registry: tag-keyed codecs for polymorphic families.
//!
//! One [`TypeRegistry`] exists per family; [`Registries`] bundles them for a
//! decode session. Both are built once through builders and are read-only
//! afterwards, so they can be shared across threads without locking.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::{Result, WireError};
use crate::message::Message;
use crate::protocol::text::TextContext;
use crate::protocol::wire::{StreamInput, StreamOutput};

/// A closed-at-runtime set of variants sharing one abstract type.
pub trait VariantFamily: Sized + Send + Sync + 'static {
    /// Family name used in errors and logs (e.g. `channel`).
    const FAMILY: &'static str;

    /// Tag of the concrete variant this value holds.
    fn variant_tag(&self) -> &str;
}

type ReadBinary<F> = Box<dyn Fn(&mut StreamInput<'_>) -> Result<F> + Send + Sync>;
type WriteBinary<F> = Box<dyn Fn(&F, &mut StreamOutput<'_>) -> Result<()> + Send + Sync>;
type ReadText<F> = Box<dyn Fn(&Value, &TextContext<'_>) -> Result<F> + Send + Sync>;
type WriteText<F> = Box<dyn Fn(&F, &TextContext<'_>) -> Result<Value> + Send + Sync>;

/// Both lanes' encode/decode pair for one variant.
pub struct VariantCodec<F> {
    pub read_binary: ReadBinary<F>,
    pub write_binary: WriteBinary<F>,
    pub read_text: ReadText<F>,
    pub write_text: WriteText<F>,
}

impl<F: VariantFamily> VariantCodec<F> {
    /// Codec for a payload message `V` stored in the family via `wrap`.
    pub fn of<V: Message + 'static>(wrap: fn(V) -> F, unwrap: fn(&F) -> Option<&V>) -> Self {
        Self {
            read_binary: Box::new(move |input: &mut StreamInput<'_>| V::read_from(input).map(wrap)),
            write_binary: Box::new(move |value: &F, out: &mut StreamOutput<'_>| match unwrap(value) {
                Some(v) => v.write_to(out),
                None => Err(payload_mismatch(value, V::NAME)),
            }),
            read_text: Box::new(move |v: &Value, cx: &TextContext<'_>| V::from_text(v, cx).map(wrap)),
            write_text: Box::new(move |value: &F, cx: &TextContext<'_>| match unwrap(value) {
                Some(v) => v.to_text(cx),
                None => Err(payload_mismatch(value, V::NAME)),
            }),
        }
    }
}

fn payload_mismatch<F: VariantFamily>(value: &F, expected: &str) -> WireError {
    WireError::Encode(format!(
        "{} variant `{}` does not carry a {expected}",
        F::FAMILY,
        value.variant_tag()
    ))
}

/// Accumulates tag registrations; duplicates surface at `build`.
pub struct TypeRegistryBuilder<F> {
    entries: HashMap<&'static str, VariantCodec<F>>,
    duplicates: Vec<&'static str>,
}

impl<F: VariantFamily> TypeRegistryBuilder<F> {
    pub fn register_codec(mut self, tag: &'static str, codec: VariantCodec<F>) -> Self {
        if self.entries.insert(tag, codec).is_some() {
            self.duplicates.push(tag);
        }
        self
    }

    pub fn register<V: Message + 'static>(
        self,
        tag: &'static str,
        wrap: fn(V) -> F,
        unwrap: fn(&F) -> Option<&V>,
    ) -> Self {
        self.register_codec(tag, VariantCodec::of(wrap, unwrap))
    }

    pub fn build(self) -> Result<TypeRegistry<F>> {
        if !self.duplicates.is_empty() {
            return Err(WireError::Config(format!(
                "duplicate {} tags registered: {:?}",
                F::FAMILY,
                self.duplicates
            )));
        }
        tracing::debug!(family = F::FAMILY, variants = self.entries.len(), "type registry built");
        Ok(TypeRegistry {
            entries: self.entries,
        })
    }
}

/// Immutable tag → codec table for family `F`.
pub struct TypeRegistry<F> {
    entries: HashMap<&'static str, VariantCodec<F>>,
}

impl<F: VariantFamily> TypeRegistry<F> {
    pub fn builder() -> TypeRegistryBuilder<F> {
        TypeRegistryBuilder {
            entries: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    fn entry(&self, tag: &str) -> Result<(&'static str, &VariantCodec<F>)> {
        self.entries
            .get_key_value(tag)
            .map(|(k, codec)| (*k, codec))
            .ok_or_else(|| WireError::UnknownVariant {
                family: F::FAMILY,
                tag: tag.to_string(),
            })
    }

    /// Canonical tag for `value`, if its variant is registered.
    pub fn registered_tag(&self, value: &F) -> Result<&'static str> {
        self.entry(value.variant_tag()).map(|(tag, _)| tag)
    }

    /// Decode the payload that follows `tag` on the binary lane.
    pub fn decode_binary(&self, tag: &str, input: &mut StreamInput<'_>) -> Result<F> {
        let (_, codec) = self.entry(tag)?;
        (codec.read_binary)(input)
    }

    /// Write `value`'s payload (without its tag); returns the tag.
    pub fn encode_binary(&self, value: &F, out: &mut StreamOutput<'_>) -> Result<&'static str> {
        let (tag, codec) = self.entry(value.variant_tag())?;
        (codec.write_binary)(value, out)?;
        Ok(tag)
    }

    pub fn decode_text(&self, tag: &str, payload: &Value, cx: &TextContext<'_>) -> Result<F> {
        let (_, codec) = self.entry(tag)?;
        (codec.read_text)(payload, cx)
    }

    pub fn encode_text(&self, value: &F, cx: &TextContext<'_>) -> Result<(&'static str, Value)> {
        let (tag, codec) = self.entry(value.variant_tag())?;
        Ok((tag, (codec.write_text)(value, cx)?))
    }
}

impl<F: VariantFamily> fmt::Debug for TypeRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("family", &F::FAMILY)
            .field("tags", &self.tags())
            .finish()
    }
}

/// All family registries for one decode session.
#[derive(Default)]
pub struct Registries {
    families: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl Registries {
    pub fn builder() -> RegistriesBuilder {
        RegistriesBuilder::default()
    }

    pub fn get<F: VariantFamily>(&self) -> Option<&TypeRegistry<F>> {
        self.families
            .get(&TypeId::of::<F>())
            .and_then(|r| r.downcast_ref::<TypeRegistry<F>>())
    }

    /// Family names in registration order.
    pub fn families(&self) -> &[&'static str] {
        &self.names
    }
}

impl fmt::Debug for Registries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registries")
            .field("families", &self.names)
            .finish()
    }
}

#[derive(Default)]
pub struct RegistriesBuilder {
    families: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
    duplicates: Vec<&'static str>,
}

impl RegistriesBuilder {
    pub fn family<F: VariantFamily>(mut self, registry: TypeRegistry<F>) -> Self {
        if self
            .families
            .insert(TypeId::of::<F>(), Box::new(registry))
            .is_some()
        {
            self.duplicates.push(F::FAMILY);
        } else {
            self.names.push(F::FAMILY);
        }
        self
    }

    pub fn build(self) -> Result<Registries> {
        if !self.duplicates.is_empty() {
            return Err(WireError::Config(format!(
                "family registered twice: {:?}",
                self.duplicates
            )));
        }
        Ok(Registries {
            families: self.families,
            names: self.names,
        })
    }
}
