//! Mapped instances and field identity.
//!
//! This module contains the data structures the engine produces:
//!
//! - [`MappedInstance`] - a populated instance of a registered target type
//! - [`FieldValue`] - a single field slot (raw value, nested instance, or
//!   array of nested instances)
//! - [`FieldIdentity`] - owning type + field name, for diagnostics
//!
//! Instances of types that opt into mapped-field tracking additionally
//! record which fields the engine actually populated, queryable through
//! [`MappedInstance::is_mapped`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde_json::Value;

/// Reserved name of the internal tracking store. Never recordable as
/// "mapped" through the public tracking API.
pub const MAPPED_STORE_FIELD: &str = "_mapped";

// =============================================================================
// Field Identity
// =============================================================================

/// Identifies a field by owning-type name and field name.
///
/// Printable as `Owner::field`; used only for diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldIdentity {
    owner: String,
    field: String,
}

impl FieldIdentity {
    pub fn new(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
        }
    }

    /// Name of the owning target type.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Field name within the owning type.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for FieldIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.field)
    }
}

// =============================================================================
// Field Values
// =============================================================================

/// The content of a single field slot on a mapped instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar, scalar array, or blind-copied raw value.
    Value(Value),
    /// A recursively mapped nested object.
    Instance(MappedInstance),
    /// A recursively mapped object array.
    Instances(Vec<MappedInstance>),
}

impl FieldValue {
    /// The raw value, if this slot holds one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The nested instance, if this slot holds one.
    pub fn as_instance(&self) -> Option<&MappedInstance> {
        match self {
            FieldValue::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// The nested instances, if this slot holds an object array.
    pub fn as_instances(&self) -> Option<&[MappedInstance]> {
        match self {
            FieldValue::Instances(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// Mapped Instance
// =============================================================================

/// A populated instance of a registered target type.
///
/// Fields the engine never assigned are absent: [`MappedInstance::get`]
/// returns `None` for them (the "zero value" of the dynamic model).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedInstance {
    type_name: String,
    fields: HashMap<String, FieldValue>,
    /// Created lazily on the first successful `mark_mapped`.
    mapped: Option<HashSet<String>>,
}

impl MappedInstance {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: HashMap::new(),
            mapped: None,
        }
    }

    /// Name of the target type this instance was mapped into.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The value assigned to `field`, or `None` if the field was left
    /// at its zero value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Iterate over the assigned fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Record that `field` was populated by the engine.
    ///
    /// Returns `false` (and records nothing) when `field` is the reserved
    /// tracking-store name, guarding against a source object injecting the
    /// store itself as ordinary data.
    pub fn mark_mapped(&mut self, field: &str) -> bool {
        if field == MAPPED_STORE_FIELD {
            return false;
        }

        self.mapped
            .get_or_insert_with(HashSet::new)
            .insert(field.to_string());

        true
    }

    /// Whether `field` was recorded as populated by the engine.
    ///
    /// Always `false` before anything has been recorded.
    pub fn is_mapped(&self, field: &str) -> bool {
        match &self.mapped {
            Some(mapped) => mapped.contains(field),
            None => false,
        }
    }
}
