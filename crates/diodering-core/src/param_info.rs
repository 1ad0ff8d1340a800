//! Parameter introspection for discoverable module parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! let hosts discover and manipulate a module's parameters at runtime:
//!
//! - **Hosts and UIs**: generate knobs and switches from declarations
//! - **Presets**: save and restore parameter state by stable ID
//! - **Validation**: check preset text against declared ranges
//!
//! # Design
//!
//! Parameters are accessed by zero-based index. Each is described by a
//! [`ParamDescriptor`] carrying display metadata, its range and default, a
//! stable [`ParamId`], a `string_id` for serialization, capability
//! [`ParamFlags`], an optional group, and labels for stepped switches.
//!
//! # Example
//!
//! ```rust
//! use diodering_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Attenuator {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Attenuator {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::level("Level", "Level")
//!                 .with_id(ParamId(10), "att_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.level,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.level = desc.clamp(value);
//!         }
//!     }
//! }
//! ```
//!
//! # no_std Support
//!
//! Only [`ParamDescriptor::format_value`] allocates (it returns a `String`).

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Stable parameter identifier that survives reordering.
///
/// Used for automation and preset persistence. Once assigned, a `ParamId`
/// must never change for a given parameter.
///
/// # Convention
///
/// Each module gets a base ID; params are sequential from there
/// (the ring modulator uses 100..=107).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags for host communication.
///
/// # Example
///
/// ```rust
/// use diodering_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::AUTOMATABLE.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (switch positions).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for modules that expose introspectable parameters.
///
/// # Parameter Indexing
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the instance. Valid indices are `0..param_count()`.
///
/// # Thread Safety
///
/// This trait does not require thread safety. To write parameters from a UI
/// thread while the audio thread runs, stage them in a
/// [`ParamBank`](crate::ParamBank) and apply the snapshot on the audio side.
pub trait ParameterInfo {
    /// Returns the number of parameters this module exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp to the descriptor's range and ignore
    /// out-of-range indices.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against [`ParamDescriptor::name`], [`ParamDescriptor::short_name`]
    /// and [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)), suitable for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Resets every parameter to its descriptor default.
    fn reset_params(&mut self) {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i) {
                self.set_param(i, desc.default);
            }
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// # Short Name
///
/// `short_name` should be 8 characters or less so it fits small panel
/// labels and hardware displays.
///
/// # Example
///
/// ```rust
/// use diodering_core::{ParamDescriptor, ParamId, ParamUnit};
///
/// let offset = ParamDescriptor::volts("Carrier Offset", "Offset", -10.0, 10.0, 0.0)
///     .with_id(ParamId(102), "carrier_offset");
/// assert_eq!(offset.unit, ParamUnit::Volts);
/// assert_eq!(offset.format_value(2.5), "2.50 V");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Carrier Level").
    pub name: &'static str,

    /// Short name for panel labels, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value when the module is created or reset.
    pub default: f32,

    /// Recommended step increment (1.0 for switches).
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID used as the preset key.
    pub string_id: &'static str,

    /// Capability flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,

    /// Parameter group (e.g., `"input"`, `"diode"`). Empty means ungrouped.
    pub group: &'static str,

    /// Labels for switch positions, indexed from `min` in `step` increments.
    ///
    /// Empty for continuous parameters.
    pub step_labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous unitless parameter with a custom range.
    pub const fn custom(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            group: "",
            step_labels: &[],
        }
    }

    /// Gain-style level in `[0, 1]`, default 1 (unity).
    pub const fn level(name: &'static str, short_name: &'static str) -> Self {
        Self::custom(name, short_name, 0.0, 1.0, 1.0)
    }

    /// Voltage parameter with a custom range.
    pub const fn volts(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::custom(name, short_name, min, max, default).with_unit(ParamUnit::Volts)
    }

    /// Multi-position switch over `0..labels.len()`.
    ///
    /// Flags include [`ParamFlags::STEPPED`]; the step is 1.
    pub const fn switch(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = if labels.is_empty() {
            0.0
        } else {
            (labels.len() - 1) as f32
        };
        Self::custom(name, short_name, 0.0, max, default as f32)
            .with_step(1.0)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
            .with_step_labels(labels)
    }

    /// Sets the stable numeric and string IDs.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the recommended step increment.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the capability flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the parameter group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Sets the switch-position labels.
    pub const fn with_step_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.step_labels = labels;
        self
    }

    /// Clamps a value to this parameter's valid range. NaN becomes the
    /// default, itself clamped to the range.
    ///
    /// # Example
    ///
    /// ```rust
    /// use diodering_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::level("Level", "Level");
    /// assert_eq!(desc.clamp(0.5), 0.5);
    /// assert_eq!(desc.clamp(-1.0), 0.0);
    /// assert_eq!(desc.clamp(3.0), 1.0);
    /// assert_eq!(desc.clamp(f32::NAN), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let value = if value.is_nan() { self.default } else { value };
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Returns the label of the switch position nearest to `value`.
    ///
    /// `None` for continuous parameters.
    pub fn step_label(&self, value: f32) -> Option<&'static str> {
        if self.step_labels.is_empty() || self.step <= 0.0 {
            return None;
        }
        let position = libm::roundf((self.clamp(value) - self.min) / self.step);
        let last = self.step_labels.len() - 1;
        Some(self.step_labels[(position.max(0.0) as usize).min(last)])
    }

    /// Formats a value for display, with unit suffix or switch label.
    ///
    /// # Example
    ///
    /// ```rust
    /// use diodering_core::ParamDescriptor;
    ///
    /// let polarity = ParamDescriptor::switch("Polarity", "Pol", &["Neg", "Bi", "Pos"], 1);
    /// assert_eq!(polarity.format_value(2.0), "Pos");
    /// assert_eq!(ParamDescriptor::level("Level", "Level").format_value(0.25), "0.25");
    /// ```
    pub fn format_value(&self, value: f32) -> String {
        if let Some(label) = self.step_label(value) {
            return String::from(label);
        }
        format!("{:.2}{}", value, self.unit.suffix())
    }

    /// Parses display or preset text into a plain value.
    ///
    /// Accepts a switch label (case-insensitive), a bare number, a number
    /// with this unit's suffix (`"1.5V"`, `"1.5 V"`), millivolts for voltage
    /// parameters (`"200mV"`), or a percentage (`"50%"` → `0.5`). The result
    /// is not clamped, so callers can reject out-of-range text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use diodering_core::ParamDescriptor;
    ///
    /// let vb = ParamDescriptor::volts("Diode Vb", "Vb", 0.0, 10.0, 0.2);
    /// assert_eq!(vb.parse_value("0.3V"), Some(0.3));
    /// assert_eq!(vb.parse_value("250 mV"), Some(0.25));
    /// assert_eq!(vb.parse_value("abc"), None);
    /// ```
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        if let Some(pos) = self
            .step_labels
            .iter()
            .position(|label| label.eq_ignore_ascii_case(text))
        {
            return Some(self.min + pos as f32 * self.step);
        }
        if let Some(number) = text.strip_suffix('%') {
            return parse_number(number).map(|v| v / 100.0);
        }
        if self.unit == ParamUnit::Volts {
            let lower = text.to_ascii_lowercase();
            if let Some(number) = lower.strip_suffix("mv") {
                return parse_number(number).map(|v| v / 1000.0);
            }
            if let Some(number) = lower.strip_suffix('v') {
                return parse_number(number);
            }
        }
        parse_number(text)
    }
}

fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Volts (V), for offsets and diode shape voltages.
    Volts,

    /// No unit, for levels, slopes and switches.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use diodering_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Volts.suffix(), " V");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Volts => " V",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test struct for ParameterInfo implementation
    struct TestModule {
        level: f32,
        mode: f32,
    }

    impl TestModule {
        fn new() -> Self {
            Self {
                level: 1.0,
                mode: 0.0,
            }
        }
    }

    const MODES: &[&str] = &["Off", "On"];

    impl ParameterInfo for TestModule {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::level("Level", "Lvl")
                        .with_id(ParamId(100), "test_level"),
                ),
                1 => Some(
                    ParamDescriptor::switch("Mode", "Mode", MODES, 0)
                        .with_id(ParamId(101), "test_mode"),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.level,
                1 => self.mode,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            match index {
                0 => self.level = desc.clamp(value),
                1 => self.mode = desc.clamp(value),
                _ => {}
            }
        }
    }

    #[test]
    fn test_param_lookup() {
        let module = TestModule::new();
        assert_eq!(module.param_count(), 2);
        assert_eq!(module.find_param_by_name("level"), Some(0));
        assert_eq!(module.find_param_by_name("LVL"), Some(0));
        assert_eq!(module.find_param_by_name("test_mode"), Some(1));
        assert_eq!(module.find_param_by_name("missing"), None);
        assert_eq!(module.param_id(1), Some(ParamId(101)));
        assert_eq!(module.param_index_by_id(ParamId(100)), Some(0));
        assert_eq!(module.param_index_by_id(ParamId(999)), None);
        assert!(module.param_info(2).is_none());
    }

    #[test]
    fn test_set_param_clamps() {
        let mut module = TestModule::new();
        module.set_param(0, 5.0);
        assert_eq!(module.get_param(0), 1.0);
        module.set_param(0, -5.0);
        assert_eq!(module.get_param(0), 0.0);
        module.set_param(7, 1.0);
        assert_eq!(module.get_param(7), 0.0);
    }

    #[test]
    fn test_clamp_nan_keeps_default_in_range() {
        let desc = ParamDescriptor::volts("Vb", "Vb", 0.0, 0.1, 0.5);
        assert_eq!(desc.clamp(f32::NAN), 0.1);
        assert_eq!(desc.clamp(0.05), 0.05);

        let level = ParamDescriptor::level("Level", "Level");
        assert_eq!(level.clamp(f32::NAN), level.default);
    }

    #[test]
    fn test_reset_params() {
        let mut module = TestModule::new();
        module.set_param(0, 0.3);
        module.set_param(1, 1.0);
        module.reset_params();
        assert_eq!(module.get_param(0), 1.0);
        assert_eq!(module.get_param(1), 0.0);
    }

    #[test]
    fn test_switch_descriptor() {
        let desc = ParamDescriptor::switch("Mode", "Mode", &["A", "B", "C"], 1);
        assert_eq!(desc.min, 0.0);
        assert_eq!(desc.max, 2.0);
        assert_eq!(desc.default, 1.0);
        assert_eq!(desc.step, 1.0);
        assert!(desc.flags.contains(ParamFlags::STEPPED));
        assert_eq!(desc.step_label(0.2), Some("A"));
        assert_eq!(desc.step_label(1.6), Some("C"));
        assert_eq!(desc.step_label(9.0), Some("C"));
    }

    #[test]
    fn test_parse_value() {
        let level = ParamDescriptor::level("Level", "Level");
        assert_eq!(level.parse_value("0.5"), Some(0.5));
        assert_eq!(level.parse_value(" 25% "), Some(0.25));
        assert_eq!(level.parse_value("1V"), None);
        assert_eq!(level.parse_value("inf"), None);

        let offset = ParamDescriptor::volts("Offset", "Offset", -10.0, 10.0, 0.0);
        assert_eq!(offset.parse_value("-2.5V"), Some(-2.5));
        assert_eq!(offset.parse_value("-2.5 v"), Some(-2.5));
        assert_eq!(offset.parse_value("500mV"), Some(0.5));

        let mode = ParamDescriptor::switch("Mode", "Mode", &["Negative", "Bipolar"], 1);
        assert_eq!(mode.parse_value("negative"), Some(0.0));
        assert_eq!(mode.parse_value("BIPOLAR"), Some(1.0));
        assert_eq!(mode.parse_value("1"), Some(1.0));
    }

    #[test]
    fn test_format_value() {
        let offset = ParamDescriptor::volts("Offset", "Offset", -10.0, 10.0, 0.0);
        assert_eq!(offset.format_value(-1.0), "-1.00 V");
        let mode = ParamDescriptor::switch("Mode", "Mode", &["Negative", "Bipolar"], 1);
        assert_eq!(mode.format_value(0.0), "Negative");
    }

    #[test]
    fn test_param_flags() {
        assert_eq!(ParamFlags::default(), ParamFlags::AUTOMATABLE);
        assert!(ParamFlags::NONE.union(ParamFlags::STEPPED).contains(ParamFlags::STEPPED));
        assert!(!ParamFlags::NONE.contains(ParamFlags::AUTOMATABLE));
    }
}
