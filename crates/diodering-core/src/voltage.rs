//! Peak-voltage bounds applied to host-supplied signals.
//!
//! Hosts are trusted to send finite voltages, but a patch cable can carry
//! anything. Every raw audio input is clamped to `±audio_peak` and every
//! control value (CV and offset sums) to `±control_peak` before it reaches a
//! diode. NaN is treated as 0 V.

/// Default bound for audio-rate signals, in volts (Eurorack supply rail).
pub const AUDIO_PEAK_VOLTAGE: f32 = 12.0;

/// Default bound for control signals and offsets, in volts.
///
/// Also the `Vcc` used for parameter ranges (carrier offset, diode voltages).
pub const CONTROL_PEAK_VOLTAGE: f32 = 10.0;

/// Largest accepted peak for either bound, in volts.
///
/// Keeps every clamped sum (`shape(carrier) + offset ± input / 2`) far from
/// `f32` overflow.
pub const MAX_PEAK_VOLTAGE: f32 = 1000.0;

/// Clamps `v` to `[-peak, peak]`, mapping NaN to 0.
///
/// # Example
///
/// ```rust
/// use diodering_core::clamp_voltage;
///
/// assert_eq!(clamp_voltage(3.0, 12.0), 3.0);
/// assert_eq!(clamp_voltage(-50.0, 12.0), -12.0);
/// assert_eq!(clamp_voltage(f32::INFINITY, 10.0), 10.0);
/// assert_eq!(clamp_voltage(f32::NAN, 10.0), 0.0);
/// ```
#[inline]
pub fn clamp_voltage(v: f32, peak: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-peak, peak) }
}

/// Audio and control peak-voltage bounds for one module instance.
///
/// Both peaks lie in `(0, MAX_PEAK_VOLTAGE]`. [`VoltageLimits::new`]
/// replaces non-positive or non-finite peaks with the corresponding default
/// and caps larger ones at [`MAX_PEAK_VOLTAGE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageLimits {
    audio_peak: f32,
    control_peak: f32,
}

impl Default for VoltageLimits {
    fn default() -> Self {
        Self {
            audio_peak: AUDIO_PEAK_VOLTAGE,
            control_peak: CONTROL_PEAK_VOLTAGE,
        }
    }
}

impl VoltageLimits {
    /// Creates limits from explicit peaks.
    ///
    /// A peak that is not a positive finite number falls back to its default
    /// ([`AUDIO_PEAK_VOLTAGE`] or [`CONTROL_PEAK_VOLTAGE`]). A peak above
    /// [`MAX_PEAK_VOLTAGE`] is capped there.
    pub fn new(audio_peak: f32, control_peak: f32) -> Self {
        Self {
            audio_peak: sanitize_peak(audio_peak, AUDIO_PEAK_VOLTAGE),
            control_peak: sanitize_peak(control_peak, CONTROL_PEAK_VOLTAGE),
        }
    }

    /// Peak for audio-rate inputs.
    #[inline]
    pub fn audio_peak(&self) -> f32 {
        self.audio_peak
    }

    /// Peak for control inputs and offsets.
    #[inline]
    pub fn control_peak(&self) -> f32 {
        self.control_peak
    }

    /// Clamps an audio-rate voltage to `±audio_peak`.
    #[inline]
    pub fn clamp_audio(&self, v: f32) -> f32 {
        clamp_voltage(v, self.audio_peak)
    }

    /// Clamps a control voltage to `±control_peak`.
    #[inline]
    pub fn clamp_control(&self, v: f32) -> f32 {
        clamp_voltage(v, self.control_peak)
    }
}

fn sanitize_peak(peak: f32, fallback: f32) -> f32 {
    if peak.is_finite() && peak > 0.0 {
        peak.min(MAX_PEAK_VOLTAGE)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(peak, fallback, "invalid peak voltage, using default");
        fallback
    }
}
