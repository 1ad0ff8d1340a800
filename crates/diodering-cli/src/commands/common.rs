//! Shared CLI helpers used across multiple commands.

use diodering_config::{Preset, resolve_preset};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{s}' (expected key=value)"
        )),
    }
}

/// Load a preset by path, directory name or factory name.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    resolve_preset(name).map_err(|e| {
        anyhow::anyhow!("{e}. Use 'diodering presets list' to see available presets.")
    })
}

/// Start from `preset` (or the defaults) and layer `overrides` on top.
pub fn preset_with_overrides(
    preset: Option<&str>,
    overrides: &[(String, String)],
) -> anyhow::Result<Preset> {
    let mut preset = match preset {
        Some(name) => load_preset(name)?,
        None => Preset::default(),
    };
    for (key, value) in overrides {
        preset.params.insert(key.clone(), value.clone());
    }
    Ok(preset)
}

/// Peak absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Root-mean-square level.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Linear amplitude to dBFS, floored at -120 dB.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
