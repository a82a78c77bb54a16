//! Error types for the transmapping engine.
//!
//! This module defines the error hierarchy of the crate:
//!
//! - [`ConfigError`] - malformed descriptor/override configuration
//! - [`ValidationError`] - a per-field validation failure during mapping
//! - [`MapError`] - top-level mapping errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Validation failures carry a [`ViolationKind`] discriminator plus the
//! `class` routing tag, message and code configured on the field's
//! descriptor, so the embedding application can route different fields'
//! failures to different handling paths without the crate knowing about
//! application error types.

use thiserror::Error;

use crate::model::FieldIdentity;
use crate::value::ValueKind;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while building a [`Descriptor`](crate::Descriptor) or
/// applying a [`DescriptorOverride`](crate::DescriptorOverride).
///
/// These are programmer errors: they are raised eagerly at construction or
/// override-application time, never deferred to the middle of a mapping run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The descriptor has no expected type.
    #[error("descriptor type is mandatory")]
    MissingType,

    /// The expected type string is not a scalar kind, object name, or a
    /// single-level array of either.
    #[error("invalid descriptor type \"{0}\"")]
    InvalidType(String),

    /// A regex constraint failed to compile.
    #[error("invalid regex \"{pattern}\": {source}")]
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// The configuration record could not be decoded (unknown key,
    /// wrong value shape, ...).
    #[error("malformed descriptor configuration: {0}")]
    Malformed(String),
}

// =============================================================================
// Validation Failures
// =============================================================================

/// Discriminates the three validation failure kinds a descriptor can
/// configure independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The source lacks a field the target requires.
    MissingMandatoryField,
    /// The value's runtime kind does not match the expected type, or is
    /// null where the field is not nullable.
    WrongType,
    /// A string value failed its configured pattern.
    RegexConstraintFailed,
}

impl ViolationKind {
    /// Default numeric code for this kind, used when the descriptor does
    /// not configure one.
    pub fn default_code(self) -> i64 {
        match self {
            ViolationKind::WrongType => 3000,
            ViolationKind::MissingMandatoryField => 3001,
            ViolationKind::RegexConstraintFailed => 3002,
        }
    }
}

/// A single validation failure, aborting the whole mapping call.
///
/// `class`, `code` and the rendered `message` come from the failing field's
/// descriptor profile; `field` and `path` locate the failure for diagnostics.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Which check failed.
    pub kind: ViolationKind,
    /// Routing tag configured on the descriptor (default `"validation"`).
    pub class: String,
    /// Numeric code configured on the descriptor (defaults 3000/3001/3002).
    pub code: i64,
    /// Rendered message (the descriptor's template, interpolated).
    pub message: String,
    /// Owning type and field name.
    pub field: FieldIdentity,
    /// Dot-qualified path of the field from the mapping root.
    pub path: String,
}

// =============================================================================
// Mapping Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`Transmapper::map`](crate::Transmapper::map).
#[derive(Debug, Error)]
pub enum MapError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A descriptor or override was malformed.
    #[error("invalid descriptor configuration: {0}")]
    Config(#[from] ConfigError),

    /// The target type (root or reached through a descriptor) is not
    /// registered in the type registry.
    #[error("unknown target type \"{0}\"")]
    UnknownType(String),

    /// The root source value is not an object.
    #[error("cannot map non-object source value (found \"{0}\")")]
    NonObjectSource(ValueKind),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for descriptor construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codes() {
        assert_eq!(ViolationKind::WrongType.default_code(), 3000);
        assert_eq!(ViolationKind::MissingMandatoryField.default_code(), 3001);
        assert_eq!(ViolationKind::RegexConstraintFailed.default_code(), 3002);
    }

    #[test]
    fn test_error_conversion_chain() {
        // ConfigError -> MapError
        let config_err = ConfigError::MissingType;
        let map_err: MapError = config_err.into();
        assert!(map_err.to_string().contains("type is mandatory"));

        // ValidationError -> MapError
        let validation_err = ValidationError {
            kind: ViolationKind::MissingMandatoryField,
            class: "validation".into(),
            code: 3001,
            message: "attribute title is mandatory".into(),
            field: FieldIdentity::new("Work", "title"),
            path: "title".into(),
        };
        let map_err: MapError = validation_err.into();
        assert!(map_err.to_string().contains("title"));
    }

    #[test]
    fn test_validation_error_format() {
        let err = ValidationError {
            kind: ViolationKind::WrongType,
            class: "client-input".into(),
            code: 3000,
            message: "invalid type \"string\" (expected \"int\")".into(),
            field: FieldIdentity::new("Work", "year"),
            path: "work.year".into(),
        };
        assert_eq!(err.to_string(), "invalid type \"string\" (expected \"int\")");
        assert_eq!(err.field.to_string(), "Work::year");
    }
}
