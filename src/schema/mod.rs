//! Target-type registry.
//!
//! The engine does not reflect over Rust types; target types are declared
//! at runtime as [`TypeDef`]s in a [`TypeRegistry`]. A definition lists the
//! type's fields in declaration order (diagnostics are reproducible that
//! way) and whether the type opts into mapped-field tracking.
//!
//! The registry does not detect cycles: a type graph that (directly or
//! transitively) contains itself causes unbounded recursion at mapping
//! time. Keeping the graph acyclic is the caller's responsibility.

use std::collections::HashMap;

/// Declaration of a mappable target type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    fields: Vec<String>,
    tracks_mapping: bool,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> TypeDef {
        TypeDef {
            name: name.into(),
            fields: Vec::new(),
            tracks_mapping: false,
        }
    }

    /// Declare a field. Declaration order is preserved.
    pub fn field(mut self, name: impl Into<String>) -> TypeDef {
        self.fields.push(name.into());
        self
    }

    /// Opt this type into mapped-field tracking: the engine will record
    /// every field it populates on instances of this type.
    pub fn with_tracking(mut self) -> TypeDef {
        self.tracks_mapping = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn tracks_mapping(&self) -> bool {
        self.tracks_mapping
    }
}

/// All target types known to the engine, keyed by name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDef>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    /// Register a type definition, replacing any previous one of the
    /// same name.
    pub fn register(&mut self, def: TypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }
}
