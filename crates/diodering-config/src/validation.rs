//! Preset and parameter validation against registered modules.
//!
//! [`Preset::apply_to`](crate::Preset::apply_to) clamps silently, which is
//! what a host wants at load time. Validation is the strict path: it reports
//! every unknown key, unparseable value and out-of-range value, so tools can
//! reject a preset before it is ever applied.
//!
//! # Example
//!
//! ```rust
//! use diodering_config::{Preset, validate_preset};
//!
//! let good = Preset::new("ok").with_param("diode_h", "0.5");
//! assert!(validate_preset(&good).is_ok());
//!
//! let bad = Preset::new("bad").with_param("diode_h", "3");
//! assert!(validate_preset(&bad).is_err());
//! ```

use diodering_core::{MAX_PEAK_VOLTAGE, ModuleWithParams};
use diodering_registry::ModuleRegistry;
use thiserror::Error;

use crate::preset::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown module slug.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for module '{module}'")]
    UnknownParameter {
        /// Slug of the module.
        module: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates presets and single parameters against a [`ModuleRegistry`].
pub struct PresetValidator {
    registry: ModuleRegistry,
}

impl Default for PresetValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetValidator {
    /// Validator over the built-in modules.
    pub fn new() -> Self {
        Self::with_registry(ModuleRegistry::new())
    }

    /// Validator over a custom registry.
    pub fn with_registry(registry: ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Check that a module slug is registered.
    pub fn validate_module(&self, slug: &str) -> ValidationResult<()> {
        if self.registry.get(slug).is_some() {
            Ok(())
        } else {
            Err(ValidationError::UnknownModule(slug.to_string()))
        }
    }

    /// Check one parameter's key and text value with the default limits.
    pub fn validate_param(&self, slug: &str, key: &str, text: &str) -> ValidationResult<()> {
        let module = self
            .registry
            .create(slug)
            .ok_or_else(|| ValidationError::UnknownModule(slug.to_string()))?;
        check_param(module.as_ref(), slug, key, text)
    }

    /// Check a whole preset, collecting every problem.
    ///
    /// Voltage ranges are evaluated under the preset's own `[limits]`. One
    /// problem is returned as itself, several as
    /// [`ValidationError::Multiple`].
    pub fn validate_preset(&self, preset: &Preset) -> ValidationResult<()> {
        let mut module = self
            .registry
            .create(&preset.module)
            .ok_or_else(|| ValidationError::UnknownModule(preset.module.clone()))?;

        let mut errors = Vec::new();

        if let Some(limits) = preset.limits {
            for (field, peak) in [
                ("limits.audio_peak", limits.audio_peak),
                ("limits.control_peak", limits.control_peak),
            ] {
                if let Some(peak) = peak
                    && !(peak.is_finite() && peak > 0.0 && peak <= MAX_PEAK_VOLTAGE)
                {
                    errors.push(ValidationError::InvalidFormat {
                        param: field.to_string(),
                        reason: format!(
                            "peak voltage must be in (0, {MAX_PEAK_VOLTAGE}] V, got {peak}"
                        ),
                    });
                }
            }
        }

        module.set_voltage_limits(preset.voltage_limits());
        for (key, text) in &preset.params {
            if let Err(e) = check_param(module.as_ref(), &preset.module, key, text) {
                errors.push(e);
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => {
                tracing::debug!(preset = %preset.name, count = errors.len(), "preset failed validation");
                Err(ValidationError::Multiple(errors))
            }
        }
    }
}

fn check_param<M>(module: &M, slug: &str, key: &str, text: &str) -> ValidationResult<()>
where
    M: ModuleWithParams + ?Sized,
{
    let index = module
        .module_find_param(key)
        .ok_or_else(|| ValidationError::UnknownParameter {
            module: slug.to_string(),
            param: key.to_string(),
        })?;
    let desc = module
        .module_param_info(index)
        .ok_or_else(|| ValidationError::UnknownParameter {
            module: slug.to_string(),
            param: key.to_string(),
        })?;
    let value = desc
        .parse_value(text)
        .ok_or_else(|| ValidationError::InvalidFormat {
            param: key.to_string(),
            reason: format!("cannot parse '{text}'"),
        })?;
    if value < desc.min || value > desc.max {
        return Err(ValidationError::OutOfRange {
            param: key.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        });
    }
    Ok(())
}

/// Validate a preset against the built-in modules.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    PresetValidator::new().validate_preset(preset)
}

/// Validate a single `key = text` pair for a built-in module.
pub fn validate_param(slug: &str, key: &str, text: &str) -> ValidationResult<()> {
    PresetValidator::new().validate_param(slug, key, text)
}
