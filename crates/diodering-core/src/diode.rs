//! Piecewise diode transfer function for diode-ring circuits.
//!
//! Models the voltage response of one diode pair in a ring modulator after
//! Parker and Välimäki, "A Simple Digital Model of the Diode-Based Ring
//! Modulator" (DAFx-11). The curve has three regions:
//!
//! ```text
//!            ⎧ 0                                   v ≤ Vb
//!   f(v) =   ⎨ h·(v − Vb)² / (2·(Vl − Vb))         Vb < v ≤ Vl
//!            ⎩ h·(v − Vl) + h·(Vl − Vb) / 2        v > Vl
//! ```
//!
//! The quadratic region is chosen so that value and slope match at both
//! breakpoints: slope 0 at `Vb`, slope `h` at `Vl`. The response is therefore
//! continuous, differentiable and monotonically non-decreasing for `h ≥ 0`.
//!
//! # Shape parameters
//!
//! | Name | Meaning | Valid range |
//! |------|---------|-------------|
//! | `Vb` | Forward-bias (conduction) voltage | `[ε, MAX_SHAPE_VOLTAGE]` |
//! | `Vl − Vb` | Width of the quadratic knee | `[ε, MAX_SHAPE_VOLTAGE]` |
//! | `h` | Slope of the linear region | `[0, 1]` |
//!
//! Setters clamp into these ranges instead of failing. NaN maps to the lower
//! bound (`ε` for the voltages, `0` for `h`).

/// Default forward-bias voltage in volts.
pub const DEFAULT_VB: f32 = 0.2;

/// Default knee width (`Vl − Vb`) in volts.
pub const DEFAULT_VL_MINUS_VB: f32 = 0.5;

/// Default slope of the linear region.
pub const DEFAULT_H: f32 = 0.9;

/// Upper bound accepted for `Vb` and `Vl − Vb`.
///
/// Far beyond any physical diode; it only keeps `Vl = Vb + (Vl − Vb)` finite.
pub const MAX_SHAPE_VOLTAGE: f32 = 1000.0;

/// Diode-pair transfer curve with cached breakpoint coefficients.
///
/// # Example
///
/// ```rust
/// use diodering_core::Diode;
///
/// let mut diode = Diode::new();
/// assert_eq!(diode.apply(-1.0), 0.0);
/// assert_eq!(diode.apply(0.1), 0.0);
///
/// diode.set_h(0.5);
/// let a = diode.apply(2.0);
/// let b = diode.apply(3.0);
/// assert!((b - a - 0.5).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diode {
    vb: f32,
    vl_minus_vb: f32,
    h: f32,

    // Derived from the three shape parameters.
    vl: f32,
    quad: f32,
    linear_offset: f32,
}

impl Default for Diode {
    fn default() -> Self {
        Self::new()
    }
}

impl Diode {
    /// Creates a diode with the default shape (`Vb = 0.2`, `Vl − Vb = 0.5`, `h = 0.9`).
    pub fn new() -> Self {
        Self::with_shape(DEFAULT_VB, DEFAULT_VL_MINUS_VB, DEFAULT_H)
    }

    /// Creates a diode with an explicit shape. Values are clamped like the setters.
    pub fn with_shape(vb: f32, vl_minus_vb: f32, h: f32) -> Self {
        let mut diode = Self {
            vb: clamp_shape_voltage(vb),
            vl_minus_vb: clamp_shape_voltage(vl_minus_vb),
            h: clamp_slope(h),
            vl: 0.0,
            quad: 0.0,
            linear_offset: 0.0,
        };
        diode.recompute();
        diode
    }

    /// Sets the forward-bias voltage `Vb`.
    ///
    /// Values below `f32::EPSILON` (and NaN) clamp to `f32::EPSILON`.
    /// Coefficients are only recomputed when the clamped value changes.
    #[inline]
    pub fn set_vb(&mut self, vb: f32) {
        let vb = clamp_shape_voltage(vb);
        if vb != self.vb {
            self.vb = vb;
            self.recompute();
        }
    }

    /// Sets the knee width `Vl − Vb`.
    ///
    /// Values below `f32::EPSILON` (and NaN) clamp to `f32::EPSILON`.
    #[inline]
    pub fn set_vl_minus_vb(&mut self, vl_minus_vb: f32) {
        let vl_minus_vb = clamp_shape_voltage(vl_minus_vb);
        if vl_minus_vb != self.vl_minus_vb {
            self.vl_minus_vb = vl_minus_vb;
            self.recompute();
        }
    }

    /// Sets the linear-region slope `h`, clamped to `[0, 1]` (NaN becomes 0).
    #[inline]
    pub fn set_h(&mut self, h: f32) {
        let h = clamp_slope(h);
        if h != self.h {
            self.h = h;
            self.recompute();
        }
    }

    /// Forward-bias voltage `Vb`.
    pub fn vb(&self) -> f32 {
        self.vb
    }

    /// Knee width `Vl − Vb`.
    pub fn vl_minus_vb(&self) -> f32 {
        self.vl_minus_vb
    }

    /// Linear-region slope `h`.
    pub fn h(&self) -> f32 {
        self.h
    }

    /// Linear-region breakpoint `Vl = Vb + (Vl − Vb)`.
    pub fn vl(&self) -> f32 {
        self.vl
    }

    /// Evaluates the transfer curve at voltage `v`.
    ///
    /// Returns 0 for every `v ≤ Vb`, which includes all of `v ≤ 0`.
    /// NaN input also returns 0.
    #[inline]
    pub fn apply(&self, v: f32) -> f32 {
        if v.is_nan() || v <= self.vb {
            0.0
        } else if v <= self.vl {
            let d = v - self.vb;
            self.quad * d * d
        } else {
            self.h * (v - self.vl) + self.linear_offset
        }
    }

    fn recompute(&mut self) {
        self.vl = self.vb + self.vl_minus_vb;
        self.quad = self.h / (2.0 * self.vl_minus_vb);
        self.linear_offset = self.h * self.vl_minus_vb * 0.5;
    }
}

#[inline]
fn clamp_shape_voltage(v: f32) -> f32 {
    if v.is_nan() {
        f32::EPSILON
    } else {
        v.clamp(f32::EPSILON, MAX_SHAPE_VOLTAGE)
    }
}

#[inline]
fn clamp_slope(h: f32) -> f32 {
    if h.is_nan() { 0.0 } else { h.clamp(0.0, 1.0) }
}
