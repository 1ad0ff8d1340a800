//! Factory presets compiled into the library.
//!
//! Always available without files on disk. [`crate::resolve_preset`] falls
//! back to these after the literal path and preset directories.

use crate::Preset;

/// Keys of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "half_wave",
    "dual_rectified",
    "soft_knee",
    "offset_am",
    "starved",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("half_wave", HALF_WAVE_PRESET),
    ("dual_rectified", DUAL_RECTIFIED_PRESET),
    ("soft_knee", SOFT_KNEE_PRESET),
    ("offset_am", OFFSET_AM_PRESET),
    ("starved", STARVED_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Default diode, both signals bipolar at full level"
module = "RingModulator"
"#;

const HALF_WAVE_PRESET: &str = r#"
name = "Half Wave"
description = "Input rectified to its positive half before mixing"
module = "RingModulator"

[params]
input_polarity = "Positive"
"#;

const DUAL_RECTIFIED_PRESET: &str = r#"
name = "Dual Rectified"
description = "Positive input against a negative-only carrier"
module = "RingModulator"

[params]
input_polarity = "Positive"
carrier_polarity = "Negative"
carrier_level = "0.8"
"#;

const SOFT_KNEE_PRESET: &str = r#"
name = "Soft Knee"
description = "Wide quadratic region for a rounder, less buzzy ring"
module = "RingModulator"

[params]
diode_vb = "0.1V"
diode_vl_minus_vb = "2.5V"
diode_h = "1.0"
"#;

const OFFSET_AM_PRESET: &str = r#"
name = "Offset AM"
description = "Carrier biased positive so the ring leans toward amplitude modulation"
module = "RingModulator"

[params]
carrier_level = "0.5"
carrier_offset = "2V"
"#;

const STARVED_PRESET: &str = r#"
name = "Starved"
description = "High bias, narrow knee and low slope for a gated, sputtering ring"
module = "RingModulator"

[params]
diode_vb = "1.5V"
diode_vl_minus_vb = "200mV"
diode_h = "0.5"

[limits]
audio_peak = 10.0
control_peak = 10.0
"#;

/// All factory presets, parsed.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Factory preset by key or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use diodering_config::get_factory_preset;
///
/// let preset = get_factory_preset("Half Wave").unwrap();
/// assert_eq!(preset.params["input_polarity"], "Positive");
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }
    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Keys of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Returns true if `name` matches a factory preset key or display name.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
