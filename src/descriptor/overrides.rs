//! Per-call descriptor overrides.
//!
//! A caller can relax or tighten validation for a single `map` call by
//! supplying partial overrides addressed by dot-path. Only the
//! `{mandatory, nullable, regex}` surface of a descriptor can be
//! overridden; the type and error profiles stay as declared.
//!
//! Overrides are applied to a per-call copy of the descriptor, never to
//! the shared registry state.

use std::collections::HashMap;

use serde::Deserialize;

use crate::descriptor::Descriptor;
use crate::error::ConfigResult;

/// Partial override of a descriptor's mutable surface.
///
/// Unset fields leave the descriptor's declared value in place.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorOverride {
    pub mandatory: Option<bool>,
    pub nullable: Option<bool>,
    pub regex: Option<String>,
}

impl DescriptorOverride {
    pub fn new() -> DescriptorOverride {
        DescriptorOverride::default()
    }

    pub fn mandatory(mut self, mandatory: bool) -> DescriptorOverride {
        self.mandatory = Some(mandatory);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> DescriptorOverride {
        self.nullable = Some(nullable);
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> DescriptorOverride {
        self.regex = Some(pattern.into());
        self
    }

    /// Produce a patched copy of `descriptor` with this override applied.
    ///
    /// The input descriptor is untouched, so shared registry state never
    /// changes across calls. Fails when the override regex does not compile.
    pub fn apply(&self, descriptor: &Descriptor) -> ConfigResult<Descriptor> {
        let mut patched = descriptor.clone();

        if let Some(mandatory) = self.mandatory {
            patched.set_mandatory(mandatory);
        }
        if let Some(nullable) = self.nullable {
            patched.set_nullable(nullable);
        }
        if let Some(pattern) = &self.regex {
            patched.set_regex(Some(pattern))?;
        }

        Ok(patched)
    }
}

/// Overrides addressed by fully-qualified dot path from the mapping root.
pub type Overrides = HashMap<String, DescriptorOverride>;
