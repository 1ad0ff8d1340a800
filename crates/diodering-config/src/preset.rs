//! Preset file format and operations.

use diodering_core::{
    AUDIO_PEAK_VOLTAGE, CONTROL_PEAK_VOLTAGE, ModuleWithParams, VoltageLimits,
};
use diodering_registry::ModuleRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// Slug of the module a preset targets when the file does not say.
pub const DEFAULT_MODULE: &str = "RingModulator";

/// Preset file for one module.
///
/// Parameter values are stored as text and parsed through the module's
/// descriptors, so switch labels (`"Positive"`), unit suffixes (`"0.3V"`,
/// `"250mV"`) and percentages all work.
///
/// # TOML Format
///
/// ```toml
/// name = "Half Wave"
/// description = "Input rectified to its positive half"
/// module = "RingModulator"
///
/// [params]
/// input_polarity = "Positive"
/// diode_vb = "0.3V"
///
/// [limits]
/// audio_peak = 12.0
/// control_peak = 10.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry slug of the target module.
    #[serde(default = "default_module")]
    pub module: String,

    /// Parameter values keyed by string ID, name or short name.
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Optional voltage bounds. Missing fields keep the 12 V / 10 V defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

/// `[limits]` table of a preset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Peak voltage for audio inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_peak: Option<f32>,

    /// Peak voltage for control inputs, also the `Vcc` of voltage parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_peak: Option<f32>,
}

impl LimitsConfig {
    /// Resolves to concrete bounds. Invalid peaks fall back to the defaults.
    pub fn to_voltage_limits(self) -> VoltageLimits {
        VoltageLimits::new(
            self.audio_peak.unwrap_or(AUDIO_PEAK_VOLTAGE),
            self.control_peak.unwrap_or(CONTROL_PEAK_VOLTAGE),
        )
    }
}

impl Preset {
    /// Create a preset for the default module with no parameter overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            module: default_module(),
            params: BTreeMap::new(),
            limits: None,
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Target a different module slug.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Add or replace a parameter value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the voltage bounds.
    pub fn with_limits(mut self, audio_peak: f32, control_peak: f32) -> Self {
        self.limits = Some(LimitsConfig {
            audio_peak: Some(audio_peak),
            control_peak: Some(control_peak),
        });
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Voltage bounds for this preset, defaults when no `[limits]` table.
    pub fn voltage_limits(&self) -> VoltageLimits {
        self.limits
            .map(LimitsConfig::to_voltage_limits)
            .unwrap_or_default()
    }

    /// Pushes the preset's limits and parameters into `module`.
    ///
    /// Limits go first so that voltage ranges scaled by the control peak
    /// clamp against the new bounds. Values are parsed through the module's
    /// descriptors and then clamped by `set_param`; use
    /// [`validate_preset`](crate::validate_preset) to reject out-of-range
    /// values instead.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] for an unknown key or unparseable
    /// value. Parameters before the failing one have already been applied.
    pub fn apply_to<M>(&self, module: &mut M) -> Result<(), ConfigError>
    where
        M: ModuleWithParams + ?Sized,
    {
        module.set_voltage_limits(self.voltage_limits());
        for (key, text) in &self.params {
            let index = module.module_find_param(key).ok_or_else(|| {
                ConfigError::invalid_parameter(&self.module, key, "unknown parameter")
            })?;
            let value = module.module_parse_value(index, text).ok_or_else(|| {
                ConfigError::invalid_parameter(&self.module, key, format!("cannot parse '{text}'"))
            })?;
            module.module_set_param(index, value);
            tracing::trace!(param = %key, value, "applied preset parameter");
        }
        Ok(())
    }

    /// Creates the target module from `registry` and applies the preset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownModule`] if the slug is not registered, or any
    /// error from [`apply_to`](Self::apply_to).
    pub fn instantiate(
        &self,
        registry: &ModuleRegistry,
    ) -> Result<Box<dyn ModuleWithParams + Send>, ConfigError> {
        let mut module = registry
            .create(&self.module)
            .ok_or_else(|| ConfigError::UnknownModule(self.module.clone()))?;
        self.apply_to(module.as_mut())?;
        Ok(module)
    }

    /// Captures every parameter of `module` into a new preset.
    ///
    /// Switches are written as their labels, continuous values as plain
    /// numbers at full precision. `module_slug` is recorded as the target.
    pub fn from_module<M>(name: impl Into<String>, module_slug: &str, module: &M) -> Self
    where
        M: ModuleWithParams + ?Sized,
    {
        let mut preset = Self::new(name).with_module(module_slug);
        for index in 0..module.module_param_count() {
            let Some(desc) = module.module_param_info(index) else {
                continue;
            };
            let value = module.module_get_param(index);
            let text = desc
                .step_label(value)
                .map_or_else(|| value.to_string(), str::to_string);
            let key = if desc.string_id.is_empty() {
                desc.name
            } else {
                desc.string_id
            };
            preset.params.insert(key.to_string(), text);
        }
        preset
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
