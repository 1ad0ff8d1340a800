//! Preset files, validation and preset directories for diodering modules.
//!
//! # Features
//!
//! - **Presets**: one module's parameters and voltage limits in a TOML file
//! - **Validation**: strict checks of preset keys, formats and ranges
//! - **Paths**: platform-specific user and system preset directories
//! - **Factory Presets**: built-in starting points
//!
//! # Example
//!
//! ```rust
//! use diodering_config::{ModuleRegistry, Preset};
//!
//! let preset = Preset::from_toml(r#"
//! name = "Half Wave"
//!
//! [params]
//! input_polarity = "Positive"
//! diode_vb = "300mV"
//! "#).unwrap();
//!
//! let module = preset.instantiate(&ModuleRegistry::new()).unwrap();
//! let vb = module.module_find_param("diode_vb").unwrap();
//! assert!((module.module_get_param(vb) - 0.3).abs() < 1e-6);
//! ```

mod error;
mod preset;

/// Platform-specific preset directories.
pub mod paths;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_all_presets, list_system_presets,
    list_user_presets, preset_name_from_path, system_presets_dir, user_presets_dir,
};
pub use preset::{DEFAULT_MODULE, LimitsConfig, Preset};
pub use validation::{
    PresetValidator, ValidationError, ValidationResult, validate_param, validate_preset,
};

/// Re-export commonly used types from diodering-registry
pub use diodering_registry::{ModuleDescriptor, ModuleRegistry, ModuleTag};

/// Resolves a preset by file path, directory name or factory name.
///
/// Lookup order: `name` as a literal path, the user presets directory, the
/// system presets directory, then the factory presets.
///
/// # Errors
///
/// [`ConfigError::PresetNotFound`] if nothing matches, or the load error of
/// a file that matched but could not be read or parsed.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    if let Some(path) = find_preset(name) {
        return Preset::load(path);
    }
    if let Some(preset) = get_factory_preset(name) {
        tracing::debug!(name, "using factory preset");
        return Ok(preset);
    }
    Err(ConfigError::PresetNotFound(name.to_string()))
}
