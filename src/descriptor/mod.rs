//! Per-field validation rules.
//!
//! This module contains the rule configuration attached to target-type
//! fields:
//!
//! - [`TypeSpec`] - parsed expected type (scalar kind, object name, or a
//!   single-level array of either)
//! - [`ErrorProfile`] - class tag, message template and code for one
//!   violation kind
//! - [`DescriptorConfig`] - the raw configuration record
//! - [`Descriptor`] - the immutable per-field rule
//! - [`DescriptorLookup`] / [`DescriptorRegistry`] - descriptor discovery
//!
//! Descriptors are immutable after construction except for the narrow
//! `{mandatory, nullable, regex}` surface, which exists so per-call
//! overrides can adjust validation strictness without redefining the
//! target type (see [`overrides`]).

pub mod overrides;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult, ViolationKind};

/// Default routing class tag for all violation kinds.
pub const DEFAULT_CLASS: &str = "validation";

/// Default message template for wrong-type violations.
/// Placeholders: `{found}`, `{expected}`.
pub const DEFAULT_TYPE_MESSAGE: &str = r#"invalid type "{found}" (expected "{expected}")"#;

/// Default message template for missing-mandatory violations.
/// Placeholder: `{attribute}` (the dot-qualified field path).
pub const DEFAULT_MANDATORY_MESSAGE: &str = "attribute {attribute} is mandatory";

/// Default message template for regex violations.
/// Placeholders: `{value}`, `{pattern}`.
pub const DEFAULT_REGEX_MESSAGE: &str =
    r#"regex constraint failed ("{value}" does not match "{pattern}")"#;

static TYPE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid type-name pattern"));

// =============================================================================
// Expected Types
// =============================================================================

/// The four scalar kinds a descriptor can expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    String,
}

impl ScalarKind {
    /// Parse a scalar kind name. Alias spellings `boolean`, `integer` and
    /// `double` are accepted.
    pub fn parse(name: &str) -> Option<ScalarKind> {
        match name {
            "bool" | "boolean" => Some(ScalarKind::Bool),
            "int" | "integer" => Some(ScalarKind::Int),
            "float" | "double" => Some(ScalarKind::Float),
            "string" => Some(ScalarKind::String),
            _ => None,
        }
    }
}

/// A parsed expected type.
///
/// Exactly one level of array nesting is supported; the type string carries
/// an explicit `[]` suffix to denote "array of".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// A single scalar value.
    Scalar(ScalarKind),
    /// A nested object of the named registered type.
    Object(String),
    /// An array of scalars.
    ScalarArray(ScalarKind),
    /// An array of nested objects of the named registered type.
    ObjectArray(String),
}

impl TypeSpec {
    /// Parse a declared type string (`"int"`, `"Work"`, `"float[]"`,
    /// `"Creator[]"`, ...).
    pub fn parse(raw: &str) -> ConfigResult<TypeSpec> {
        if raw.is_empty() {
            return Err(ConfigError::MissingType);
        }

        if let Some(element) = raw.strip_suffix("[]") {
            if element.is_empty() || element.ends_with("[]") {
                return Err(ConfigError::InvalidType(raw.to_string()));
            }
            return match ScalarKind::parse(element) {
                Some(kind) => Ok(TypeSpec::ScalarArray(kind)),
                None if TYPE_NAME_RE.is_match(element) => {
                    Ok(TypeSpec::ObjectArray(element.to_string()))
                }
                None => Err(ConfigError::InvalidType(raw.to_string())),
            };
        }

        match ScalarKind::parse(raw) {
            Some(kind) => Ok(TypeSpec::Scalar(kind)),
            None if TYPE_NAME_RE.is_match(raw) => Ok(TypeSpec::Object(raw.to_string())),
            None => Err(ConfigError::InvalidType(raw.to_string())),
        }
    }

    /// Whether this type is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, TypeSpec::ScalarArray(_) | TypeSpec::ObjectArray(_))
    }
}

// =============================================================================
// Error Profiles
// =============================================================================

/// Routing class tag, message template and code for one violation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorProfile {
    /// Routing tag matched by the embedding application.
    pub class: String,
    /// Message template with named `{placeholder}` slots.
    pub message: String,
    /// Numeric code.
    pub code: i64,
}

impl ErrorProfile {
    fn from_parts(
        class: Option<String>,
        message: Option<String>,
        code: Option<i64>,
        kind: ViolationKind,
        default_message: &str,
    ) -> ErrorProfile {
        ErrorProfile {
            class: class.unwrap_or_else(|| DEFAULT_CLASS.to_string()),
            message: message.unwrap_or_else(|| default_message.to_string()),
            code: code.unwrap_or_else(|| kind.default_code()),
        }
    }

    /// Render the message template, replacing each `{name}` placeholder
    /// with its value. Unknown placeholders are left untouched.
    pub fn render(&self, args: &[(&str, &str)]) -> String {
        let mut message = self.message.clone();
        for (name, value) in args {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

// =============================================================================
// Configuration Record
// =============================================================================

/// Raw descriptor configuration.
///
/// Every field except `type` is optional; [`Descriptor::new`] fills in the
/// defaults. Deserialization rejects unknown keys, so a typo in a JSON rule
/// file fails eagerly at construction rather than silently relaxing a check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DescriptorConfig {
    /// Declared type string (`"int"`, `"Work"`, `"float[]"`, ...). Mandatory.
    #[serde(rename = "type")]
    pub expected_type: Option<String>,
    /// Whether the field must be present in the source. Default `true`.
    pub mandatory: Option<bool>,
    /// Whether a null value passes the type check. Default `false`.
    pub nullable: Option<bool>,
    /// Pattern constraint, applied to string values only.
    pub regex: Option<String>,

    /// Wrong-type violation profile.
    pub type_class: Option<String>,
    pub type_message: Option<String>,
    pub type_code: Option<i64>,

    /// Missing-mandatory violation profile.
    pub mandatory_class: Option<String>,
    pub mandatory_message: Option<String>,
    pub mandatory_code: Option<i64>,

    /// Regex violation profile.
    pub regex_class: Option<String>,
    pub regex_message: Option<String>,
    pub regex_code: Option<i64>,
}

// =============================================================================
// Descriptor
// =============================================================================

/// Immutable per-field validation/mapping rule.
#[derive(Debug, Clone)]
pub struct Descriptor {
    raw_type: String,
    spec: TypeSpec,
    mandatory: bool,
    nullable: bool,
    regex: Option<Regex>,
    type_profile: ErrorProfile,
    mandatory_profile: ErrorProfile,
    regex_profile: ErrorProfile,
}

impl Descriptor {
    /// Build a descriptor from a configuration record, filling defaults.
    ///
    /// Fails when the expected type is absent, empty or malformed, or when
    /// the regex does not compile.
    pub fn new(config: DescriptorConfig) -> ConfigResult<Descriptor> {
        let raw_type = config.expected_type.ok_or(ConfigError::MissingType)?;
        let spec = TypeSpec::parse(&raw_type)?;

        let regex = match config.regex {
            Some(pattern) => Some(compile_regex(&pattern)?),
            None => None,
        };

        Ok(Descriptor {
            raw_type,
            spec,
            mandatory: config.mandatory.unwrap_or(true),
            nullable: config.nullable.unwrap_or(false),
            regex,
            type_profile: ErrorProfile::from_parts(
                config.type_class,
                config.type_message,
                config.type_code,
                ViolationKind::WrongType,
                DEFAULT_TYPE_MESSAGE,
            ),
            mandatory_profile: ErrorProfile::from_parts(
                config.mandatory_class,
                config.mandatory_message,
                config.mandatory_code,
                ViolationKind::MissingMandatoryField,
                DEFAULT_MANDATORY_MESSAGE,
            ),
            regex_profile: ErrorProfile::from_parts(
                config.regex_class,
                config.regex_message,
                config.regex_code,
                ViolationKind::RegexConstraintFailed,
                DEFAULT_REGEX_MESSAGE,
            ),
        })
    }

    /// Shorthand for a descriptor with only the expected type set.
    pub fn of(expected_type: impl Into<String>) -> ConfigResult<Descriptor> {
        Descriptor::new(DescriptorConfig {
            expected_type: Some(expected_type.into()),
            ..DescriptorConfig::default()
        })
    }

    /// Build a descriptor from a JSON configuration object.
    ///
    /// Unknown keys are rejected ([`ConfigError::Malformed`]).
    pub fn from_json(value: &Value) -> ConfigResult<Descriptor> {
        let config: DescriptorConfig = serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Descriptor::new(config)
    }

    /// The declared type string, as configured.
    pub fn expected_type(&self) -> &str {
        &self.raw_type
    }

    /// The parsed expected type.
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The compiled pattern constraint, if any.
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    pub fn type_profile(&self) -> &ErrorProfile {
        &self.type_profile
    }

    pub fn mandatory_profile(&self) -> &ErrorProfile {
        &self.mandatory_profile
    }

    pub fn regex_profile(&self) -> &ErrorProfile {
        &self.regex_profile
    }

    // Mutation surface restricted to {mandatory, nullable, regex}; the type
    // and profiles are immutable after creation.

    pub fn set_mandatory(&mut self, mandatory: bool) {
        self.mandatory = mandatory;
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub fn set_regex(&mut self, pattern: Option<&str>) -> ConfigResult<()> {
        self.regex = match pattern {
            Some(pattern) => Some(compile_regex(pattern)?),
            None => None,
        };
        Ok(())
    }
}

fn compile_regex(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

// =============================================================================
// Descriptor Discovery
// =============================================================================

/// Injected descriptor discovery: given a target type and field name,
/// return the field's rule, if it has one.
///
/// The engine only ever reads through this interface; implementations must
/// be safe for concurrent reads (`Sync`).
pub trait DescriptorLookup: Sync {
    fn lookup(&self, owner: &str, field: &str) -> Option<&Descriptor>;
}

/// The standard [`DescriptorLookup`]: a plain map keyed by
/// `(owner type, field name)`.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    rules: HashMap<(String, String), Descriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> DescriptorRegistry {
        DescriptorRegistry::default()
    }

    /// Attach a rule to `owner.field`, replacing any previous rule.
    pub fn register(
        &mut self,
        owner: impl Into<String>,
        field: impl Into<String>,
        descriptor: Descriptor,
    ) {
        self.rules.insert((owner.into(), field.into()), descriptor);
    }
}

impl DescriptorLookup for DescriptorRegistry {
    fn lookup(&self, owner: &str, field: &str) -> Option<&Descriptor> {
        self.rules.get(&(owner.to_string(), field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_spec_scalars_and_aliases() {
        assert_eq!(TypeSpec::parse("bool").unwrap(), TypeSpec::Scalar(ScalarKind::Bool));
        assert_eq!(TypeSpec::parse("boolean").unwrap(), TypeSpec::Scalar(ScalarKind::Bool));
        assert_eq!(TypeSpec::parse("integer").unwrap(), TypeSpec::Scalar(ScalarKind::Int));
        assert_eq!(TypeSpec::parse("double").unwrap(), TypeSpec::Scalar(ScalarKind::Float));
        assert_eq!(TypeSpec::parse("string").unwrap(), TypeSpec::Scalar(ScalarKind::String));
    }

    #[test]
    fn test_type_spec_objects_and_arrays() {
        assert_eq!(
            TypeSpec::parse("Work").unwrap(),
            TypeSpec::Object("Work".to_string())
        );
        assert_eq!(
            TypeSpec::parse("int[]").unwrap(),
            TypeSpec::ScalarArray(ScalarKind::Int)
        );
        assert_eq!(
            TypeSpec::parse("Creator[]").unwrap(),
            TypeSpec::ObjectArray("Creator".to_string())
        );
        assert!(TypeSpec::parse("int[]").unwrap().is_array());
        assert!(!TypeSpec::parse("int").unwrap().is_array());
    }

    #[test]
    fn test_type_spec_rejects_malformed_types() {
        assert!(matches!(TypeSpec::parse(""), Err(ConfigError::MissingType)));
        assert!(matches!(TypeSpec::parse("[]"), Err(ConfigError::InvalidType(_))));
        assert!(matches!(TypeSpec::parse("int[][]"), Err(ConfigError::InvalidType(_))));
        assert!(matches!(TypeSpec::parse("foo.bar"), Err(ConfigError::InvalidType(_))));
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = Descriptor::of("int").unwrap();

        assert_eq!(descriptor.expected_type(), "int");
        assert!(descriptor.is_mandatory());
        assert!(!descriptor.is_nullable());
        assert!(descriptor.regex().is_none());

        assert_eq!(descriptor.type_profile().class, DEFAULT_CLASS);
        assert_eq!(descriptor.type_profile().code, 3000);
        assert_eq!(descriptor.mandatory_profile().code, 3001);
        assert_eq!(descriptor.regex_profile().code, 3002);
    }

    #[test]
    fn test_descriptor_requires_type() {
        let result = Descriptor::new(DescriptorConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingType)));

        let result = Descriptor::of("");
        assert!(matches!(result, Err(ConfigError::MissingType)));
    }

    #[test]
    fn test_descriptor_rejects_bad_regex() {
        let result = Descriptor::new(DescriptorConfig {
            expected_type: Some("string".into()),
            regex: Some("[unclosed".into()),
            ..DescriptorConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    }

    #[test]
    fn test_descriptor_from_json() {
        let descriptor = Descriptor::from_json(&json!({
            "type": "string",
            "mandatory": false,
            "regex": "^[a-z]+$",
            "typeClass": "client-input",
            "typeCode": 4000
        }))
        .unwrap();

        assert!(!descriptor.is_mandatory());
        assert!(descriptor.regex().unwrap().is_match("abc"));
        assert_eq!(descriptor.type_profile().class, "client-input");
        assert_eq!(descriptor.type_profile().code, 4000);
        // Untouched profiles keep their defaults.
        assert_eq!(descriptor.mandatory_profile().code, 3001);
    }

    #[test]
    fn test_descriptor_from_json_rejects_unknown_key() {
        let result = Descriptor::from_json(&json!({
            "type": "string",
            "mandatori": true
        }));
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_profile_render() {
        let profile = ErrorProfile {
            class: DEFAULT_CLASS.to_string(),
            message: DEFAULT_TYPE_MESSAGE.to_string(),
            code: 3000,
        };
        assert_eq!(
            profile.render(&[("found", "string"), ("expected", "int")]),
            r#"invalid type "string" (expected "int")"#
        );
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = DescriptorRegistry::new();
        registry.register("Work", "title", Descriptor::of("string").unwrap());

        assert!(registry.lookup("Work", "title").is_some());
        assert!(registry.lookup("Work", "year").is_none());
        assert!(registry.lookup("Other", "title").is_none());
    }
}
