//! Module registry and factory for diodering.
//!
//! The registry is an ordinary value: the host builds one during its own
//! initialization phase with [`ModuleRegistry::new`] (built-ins registered)
//! or [`ModuleRegistry::empty`] plus explicit [`ModuleRegistry::register`]
//! calls. There is no process-wide mutable state.
//!
//! # Example
//!
//! ```rust
//! use diodering_registry::{ModuleRegistry, ModuleTag};
//!
//! let registry = ModuleRegistry::new();
//!
//! for module in registry.all_modules() {
//!     println!("{}: {}", module.slug, module.description);
//! }
//!
//! let ring = registry.create("RingModulator").expect("built-in module");
//! assert_eq!(ring.module_param_count(), 8);
//! assert_eq!(registry.modules_with_tag(ModuleTag::RingModulator).len(), 1);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! diodering-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use diodering_core::ModuleWithParams;
use diodering_modules::{RING_INPUT_COUNT, RING_OUTPUT_COUNT, RING_PARAM_COUNT, RingModulator};

/// Tag for browsing and filtering modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleTag {
    /// Processes an incoming signal.
    Effect,
    /// Ring or amplitude modulation.
    RingModulator,
}

impl ModuleTag {
    /// Returns a human-readable name for the tag.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleTag::Effect => "Effect",
            ModuleTag::RingModulator => "Ring Modulator",
        }
    }
}

/// Describes a module in the registry.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique identifier, stable across versions (used in presets).
    pub slug: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the module.
    pub description: &'static str,
    /// Tags for organization.
    pub tags: &'static [ModuleTag],
    /// Number of parameters.
    pub param_count: usize,
    /// Number of input ports.
    pub input_count: usize,
    /// Number of output ports.
    pub output_count: usize,
}

/// Factory function type for creating modules.
pub type ModuleFactory = fn() -> Box<dyn ModuleWithParams + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ModuleDescriptor,
    factory: ModuleFactory,
}

/// Registry of available modules.
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a new registry with all built-in modules registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_modules();
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::with_capacity(1),
        }
    }

    fn register_builtin_modules(&mut self) {
        self.register(
            ModuleDescriptor {
                slug: "RingModulator",
                name: "Ring Modulator",
                description: "Analog-modeled diode ring modulator with five outputs",
                tags: &[ModuleTag::Effect, ModuleTag::RingModulator],
                param_count: RING_PARAM_COUNT,
                input_count: RING_INPUT_COUNT,
                output_count: RING_OUTPUT_COUNT,
            },
            || Box::new(RingModulator::new()),
        );
    }

    /// Register a module.
    ///
    /// Returns `false` (and leaves the registry unchanged) if the slug is
    /// already taken.
    pub fn register(&mut self, descriptor: ModuleDescriptor, factory: ModuleFactory) -> bool {
        if self.get(descriptor.slug).is_some() {
            #[cfg(feature = "std")]
            tracing::warn!(slug = descriptor.slug, "module already registered");
            return false;
        }
        #[cfg(feature = "std")]
        tracing::debug!(slug = descriptor.slug, name = descriptor.name, "registered module");
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
        true
    }

    /// Returns descriptors for all registered modules, in registration order.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for modules carrying `tag`.
    pub fn modules_with_tag(&self, tag: ModuleTag) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.tags.contains(&tag))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by slug (case-insensitive).
    pub fn get(&self, slug: &str) -> Option<&ModuleDescriptor> {
        self.find(slug).map(|e| &e.descriptor)
    }

    /// Create a module instance by slug (case-insensitive).
    ///
    /// Returns `None` if the slug is not registered.
    pub fn create(&self, slug: &str) -> Option<Box<dyn ModuleWithParams + Send>> {
        self.find(slug).map(|e| (e.factory)())
    }

    /// Find a parameter index by name, short name or string ID.
    ///
    /// Creates a temporary instance to scan parameter descriptors.
    pub fn param_index_by_name(&self, slug: &str, param_name: &str) -> Option<usize> {
        self.create(slug)?.module_find_param(param_name)
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, slug: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.slug.eq_ignore_ascii_case(slug))
    }
}
