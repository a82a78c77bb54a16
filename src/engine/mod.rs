//! The recursive mapping engine.
//!
//! [`Transmapper`] walks a registered target type's declared fields,
//! consults the injected descriptor lookup, validates the corresponding
//! source value, copies or coerces it onto a fresh [`MappedInstance`], and
//! recurses into nested object and array fields. The first validation
//! failure aborts the whole call; a partially populated instance is never
//! returned.
//!
//! The engine holds no state across calls apart from the two injected,
//! read-only collaborators, so one engine can serve concurrent mappings.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::descriptor::overrides::Overrides;
use crate::descriptor::{Descriptor, DescriptorLookup, ScalarKind, TypeSpec};
use crate::error::{MapError, MapResult, ValidationError, ViolationKind};
use crate::model::{FieldIdentity, FieldValue, MappedInstance};
use crate::schema::TypeRegistry;
use crate::value::ValueKind;

/// Maps untyped source objects into validated instances of registered
/// target types.
pub struct Transmapper<'a> {
    types: &'a TypeRegistry,
    descriptors: &'a dyn DescriptorLookup,
}

impl<'a> Transmapper<'a> {
    pub fn new(types: &'a TypeRegistry, descriptors: &'a dyn DescriptorLookup) -> Transmapper<'a> {
        Transmapper { types, descriptors }
    }

    /// Map `source` into an instance of the registered type `target`.
    ///
    /// Fails with the first validation violation encountered, or with a
    /// structural error when `source` is not an object or `target` (or a
    /// type reached through a descriptor) is not registered.
    pub fn map(&self, source: &Value, target: &str) -> MapResult<MappedInstance> {
        self.map_with_overrides(source, target, &Overrides::new())
    }

    /// Like [`Transmapper::map`], with per-call descriptor overrides
    /// addressed by dot path from the mapping root (`"inner.field"`).
    ///
    /// Object-array elements recurse under the *element type name*, not an
    /// index: a field inside elements of a `Creator[]` array is addressed
    /// as `"Creator[].field"`. Two elements of the same array therefore
    /// cannot be overridden independently.
    ///
    /// Overrides apply to per-call copies of the descriptors; the shared
    /// lookup state is never mutated.
    pub fn map_with_overrides(
        &self,
        source: &Value,
        target: &str,
        overrides: &Overrides,
    ) -> MapResult<MappedInstance> {
        let object = source
            .as_object()
            .ok_or_else(|| MapError::NonObjectSource(ValueKind::of(source)))?;

        self.map_at(object, target, "", overrides)
    }

    fn map_at(
        &self,
        source: &Map<String, Value>,
        target: &str,
        prefix: &str,
        overrides: &Overrides,
    ) -> MapResult<MappedInstance> {
        let def = self
            .types
            .get(target)
            .ok_or_else(|| MapError::UnknownType(target.to_string()))?;

        let tracks = def.tracks_mapping();
        let mut instance = MappedInstance::new(target);

        for field in def.fields() {
            let path = qualify(prefix, field);
            let descriptor = self.resolve(target, field, &path, overrides)?;

            let Some(value) = source.get(field) else {
                if let Some(descriptor) = &descriptor {
                    if descriptor.is_mandatory() {
                        return Err(missing_mandatory(descriptor, target, field, &path).into());
                    }
                }
                // Absent and not mandatory: leave the field at its zero value.
                continue;
            };

            let Some(descriptor) = descriptor else {
                // Blind mapping: no rule, copy the value verbatim.
                assign(&mut instance, tracks, field, FieldValue::Value(value.clone()));
                continue;
            };

            if !check_type(descriptor.spec(), descriptor.is_nullable(), value) {
                return Err(wrong_type(
                    &descriptor,
                    target,
                    field,
                    &path,
                    ValueKind::of(value),
                    descriptor.expected_type(),
                )
                .into());
            }

            if let (Some(regex), Value::String(s)) = (descriptor.regex(), value) {
                if !regex.is_match(s) {
                    return Err(
                        regex_failed(&descriptor, target, field, &path, s, regex.as_str()).into(),
                    );
                }
            }

            let mapped = self.map_field(&descriptor, target, field, &path, prefix, value, overrides)?;
            assign(&mut instance, tracks, field, mapped);
        }

        Ok(instance)
    }

    /// Resolve the field's descriptor and apply any override registered
    /// for its fully-qualified path onto a per-call copy.
    fn resolve(
        &self,
        owner: &str,
        field: &str,
        path: &str,
        overrides: &Overrides,
    ) -> MapResult<Option<Cow<'a, Descriptor>>> {
        let Some(descriptor) = self.descriptors.lookup(owner, field) else {
            return Ok(None);
        };

        match overrides.get(path) {
            Some(patch) => Ok(Some(Cow::Owned(patch.apply(descriptor)?))),
            None => Ok(Some(Cow::Borrowed(descriptor))),
        }
    }

    /// Assignment stage: the value has already passed the presence, type
    /// and regex checks.
    #[allow(clippy::too_many_arguments)]
    fn map_field(
        &self,
        descriptor: &Descriptor,
        owner: &str,
        field: &str,
        path: &str,
        prefix: &str,
        value: &Value,
        overrides: &Overrides,
    ) -> MapResult<FieldValue> {
        // A null that passed the type check (nullable field) assigns null,
        // whatever the expected type.
        if value.is_null() {
            return Ok(FieldValue::Value(Value::Null));
        }

        match descriptor.spec() {
            TypeSpec::Scalar(kind) => Ok(FieldValue::Value(coerce_scalar(*kind, value))),

            TypeSpec::Object(name) => match value {
                Value::Object(object) => {
                    let nested = self.map_at(object, name, path, overrides)?;
                    Ok(FieldValue::Instance(nested))
                }
                other => {
                    Err(wrong_type(descriptor, owner, field, path, ValueKind::of(other), name).into())
                }
            },

            TypeSpec::ScalarArray(kind) => {
                let items = as_array(descriptor, owner, field, path, value)?;
                let element_type = element_type_name(descriptor);

                let mut mapped = Vec::with_capacity(items.len());
                for item in items {
                    // Array elements may not be null even when the field
                    // itself is nullable.
                    if !check_type(&TypeSpec::Scalar(*kind), false, item) {
                        return Err(wrong_type(
                            descriptor,
                            owner,
                            field,
                            path,
                            ValueKind::of(item),
                            element_type,
                        )
                        .into());
                    }
                    mapped.push(coerce_scalar(*kind, item));
                }

                Ok(FieldValue::Value(Value::Array(mapped)))
            }

            TypeSpec::ObjectArray(name) => {
                let items = as_array(descriptor, owner, field, path, value)?;
                // Element recursion is keyed by the element type name, so
                // overrides address all elements of the array at once.
                let element_prefix = qualify(prefix, &format!("{name}[]"));

                let mut mapped = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(object) => {
                            mapped.push(self.map_at(object, name, &element_prefix, overrides)?);
                        }
                        other => {
                            return Err(wrong_type(
                                descriptor,
                                owner,
                                field,
                                path,
                                ValueKind::of(other),
                                name,
                            )
                            .into());
                        }
                    }
                }

                Ok(FieldValue::Instances(mapped))
            }
        }
    }
}

// =============================================================================
// Checks and Coercion
// =============================================================================

/// Structural type check.
///
/// Null passes iff `nullable`. Arrays only require the value to be a
/// sequence here; elements are re-checked one by one at assignment.
/// Integers are accepted where a float is expected (coerced on assignment).
fn check_type(spec: &TypeSpec, nullable: bool, value: &Value) -> bool {
    if value.is_null() {
        return nullable;
    }

    match spec {
        TypeSpec::ScalarArray(_) | TypeSpec::ObjectArray(_) => value.is_array(),
        TypeSpec::Scalar(kind) => scalar_matches(*kind, value),
        TypeSpec::Object(_) => value.is_object(),
    }
}

fn scalar_matches(kind: ScalarKind, value: &Value) -> bool {
    matches!(
        (kind, ValueKind::of(value)),
        (ScalarKind::Bool, ValueKind::Bool)
            | (ScalarKind::Int, ValueKind::Int)
            | (ScalarKind::Float, ValueKind::Float | ValueKind::Int)
            | (ScalarKind::String, ValueKind::String)
    )
}

/// Copy a scalar, promoting integers to float where float is expected.
fn coerce_scalar(kind: ScalarKind, value: &Value) -> Value {
    if kind == ScalarKind::Float {
        if let Some(f) = value.as_f64() {
            return Value::from(f);
        }
    }
    value.clone()
}

fn as_array<'v>(
    descriptor: &Descriptor,
    owner: &str,
    field: &str,
    path: &str,
    value: &'v Value,
) -> MapResult<&'v Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(wrong_type(
            descriptor,
            owner,
            field,
            path,
            ValueKind::of(other),
            descriptor.expected_type(),
        )
        .into()),
    }
}

fn element_type_name(descriptor: &Descriptor) -> &str {
    descriptor
        .expected_type()
        .strip_suffix("[]")
        .unwrap_or(descriptor.expected_type())
}

fn qualify(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Record the field as mapped (for tracking targets) and assign.
///
/// A rejected recording means the source tried to supply the reserved
/// tracking-store name as ordinary data; the assignment is skipped.
fn assign(instance: &mut MappedInstance, tracks: bool, field: &str, value: FieldValue) {
    if tracks && !instance.mark_mapped(field) {
        return;
    }
    instance.set(field, value);
}

// =============================================================================
// Violation Constructors
// =============================================================================

fn missing_mandatory(
    descriptor: &Descriptor,
    owner: &str,
    field: &str,
    path: &str,
) -> ValidationError {
    let profile = descriptor.mandatory_profile();
    ValidationError {
        kind: ViolationKind::MissingMandatoryField,
        class: profile.class.clone(),
        code: profile.code,
        message: profile.render(&[("attribute", path)]),
        field: FieldIdentity::new(owner, field),
        path: path.to_string(),
    }
}

fn wrong_type(
    descriptor: &Descriptor,
    owner: &str,
    field: &str,
    path: &str,
    found: ValueKind,
    expected: &str,
) -> ValidationError {
    let profile = descriptor.type_profile();
    ValidationError {
        kind: ViolationKind::WrongType,
        class: profile.class.clone(),
        code: profile.code,
        message: profile.render(&[("found", found.name()), ("expected", expected)]),
        field: FieldIdentity::new(owner, field),
        path: path.to_string(),
    }
}

fn regex_failed(
    descriptor: &Descriptor,
    owner: &str,
    field: &str,
    path: &str,
    value: &str,
    pattern: &str,
) -> ValidationError {
    let profile = descriptor.regex_profile();
    ValidationError {
        kind: ViolationKind::RegexConstraintFailed,
        class: profile.class.clone(),
        code: profile.code,
        message: profile.render(&[("value", value), ("pattern", pattern)]),
        field: FieldIdentity::new(owner, field),
        path: path.to_string(),
    }
}
