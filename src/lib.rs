//! # Transmap - validating object transmapper
//!
//! Transmap promotes untyped, dynamically-shaped data (decoded API payloads,
//! documents) into instances of registered target types, enforcing per-field
//! validation rules with fail-fast semantics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ serde_json   │────▶│  Transmapper │────▶│    Mapped    │
//! │ Value source │     │ (descriptors │     │   Instance   │
//! │  (untyped)   │     │ + overrides) │     │ (validated)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use transmap::{Descriptor, DescriptorRegistry, Transmapper, TypeDef, TypeRegistry};
//!
//! let mut types = TypeRegistry::new();
//! types.register(TypeDef::new("Work").field("title").field("year"));
//!
//! let mut rules = DescriptorRegistry::new();
//! rules.register("Work", "title", Descriptor::of("string")?);
//! rules.register("Work", "year", Descriptor::of("int")?);
//!
//! let mapper = Transmapper::new(&types, &rules);
//! let work = mapper.map(&json!({ "title": "My Song", "year": 2024 }), "Work")?;
//!
//! assert_eq!(work.get("title").and_then(|f| f.as_value()), Some(&json!("My Song")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`] - configuration and mapping error types
//! - [`value`] - runtime kind classification of source values
//! - [`descriptor`] - per-field rules, overrides, and descriptor discovery
//! - [`schema`] - target-type registry
//! - [`model`] - mapped instances and mapped-field tracking
//! - [`engine`] - the recursive mapping engine

// Core modules
pub mod error;
pub mod value;

// Rules
pub mod descriptor;

// Target types
pub mod schema;

// Mapped output
pub mod model;

// The engine
pub mod engine;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, ConfigResult, MapError, MapResult, ValidationError, ViolationKind};

// =============================================================================
// Re-exports - Values
// =============================================================================

pub use value::ValueKind;

// =============================================================================
// Re-exports - Descriptors
// =============================================================================

pub use descriptor::{
    Descriptor,
    DescriptorConfig,
    DescriptorLookup,
    DescriptorRegistry,
    ErrorProfile,
    ScalarKind,
    TypeSpec,
};

pub use descriptor::overrides::{DescriptorOverride, Overrides};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{TypeDef, TypeRegistry};

// =============================================================================
// Re-exports - Model
// =============================================================================

pub use model::{FieldIdentity, FieldValue, MappedInstance, MAPPED_STORE_FIELD};

// =============================================================================
// Re-exports - Engine
// =============================================================================

pub use engine::Transmapper;
