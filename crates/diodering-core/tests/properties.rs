//! Property-based tests for the diode transfer curve and voltage limits.
//!
//! Covers the curve's boundary, continuity, monotonicity and linear-region
//! guarantees over randomized shape parameters.

use diodering_core::{Diode, ParamBank, VoltageLimits, clamp_voltage};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The diode never conducts in reverse: every v <= 0 maps to exactly 0.
    #[test]
    fn diode_zero_for_non_positive_input(
        vb in 0.0f32..10.0,
        vl_minus_vb in 0.0f32..10.0,
        h in 0.0f32..=1.0,
        v in -1000.0f32..=0.0,
    ) {
        let diode = Diode::with_shape(vb, vl_minus_vb, h);
        prop_assert_eq!(diode.apply(v), 0.0, "v = {}", v);
    }

    /// Densely sampled neighbourhoods of Vb and Vl show no jump.
    #[test]
    fn diode_continuous_at_breakpoints(
        vb in 0.01f32..5.0,
        vl_minus_vb in 0.01f32..5.0,
        h in 0.0f32..=1.0,
    ) {
        let diode = Diode::with_shape(vb, vl_minus_vb, h);
        let delta = 1e-4;
        for &point in &[diode.vb(), diode.vl()] {
            let below = diode.apply(point - delta);
            let at = diode.apply(point);
            let above = diode.apply(point + delta);
            prop_assert!(
                (at - below).abs() < 1e-3 && (above - at).abs() < 1e-3,
                "jump at {}: {} / {} / {} (vb={}, vl-vb={}, h={})",
                point, below, at, above, vb, vl_minus_vb, h
            );
        }
    }

    /// Rising voltage never lowers the response.
    #[test]
    fn diode_monotonic_non_decreasing(
        vb in 0.01f32..5.0,
        vl_minus_vb in 0.01f32..5.0,
        h in 0.0f32..=1.0,
        a in 0.0f32..20.0,
        b in 0.0f32..20.0,
    ) {
        let diode = Diode::with_shape(vb, vl_minus_vb, h);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            diode.apply(hi) >= diode.apply(lo) - 1e-5,
            "f({}) = {} < f({}) = {}",
            hi, diode.apply(hi), lo, diode.apply(lo)
        );
    }

    /// Beyond Vl the curve is affine with slope h.
    #[test]
    fn diode_affine_above_breakpoint(
        vb in 0.01f32..5.0,
        vl_minus_vb in 0.01f32..5.0,
        h in 0.0f32..=1.0,
        x1 in 0.0f32..20.0,
        x2 in 0.0f32..20.0,
    ) {
        let diode = Diode::with_shape(vb, vl_minus_vb, h);
        let v1 = diode.vl() + x1;
        let v2 = diode.vl() + x2;
        let slope_term = h * (v2 - v1);
        let delta = diode.apply(v2) - diode.apply(v1);
        prop_assert!(
            (delta - slope_term).abs() < 1e-4,
            "f({}) - f({}) = {}, expected {}",
            v2, v1, delta, slope_term
        );
    }

    /// Output stays finite for any finite input and any shape, even degenerate ones.
    #[test]
    fn diode_finite_for_any_shape(
        vb in -100.0f32..100.0,
        vl_minus_vb in -100.0f32..100.0,
        h in -2.0f32..2.0,
        v in -1.0e6f32..1.0e6,
    ) {
        let diode = Diode::with_shape(vb, vl_minus_vb, h);
        prop_assert!(diode.apply(v).is_finite());
        prop_assert!(diode.apply(v) >= 0.0);
    }

    /// Setting parameters one by one lands on the same cached state as a fresh diode.
    #[test]
    fn diode_setters_match_constructor(
        vb in 0.0f32..10.0,
        vl_minus_vb in 0.0f32..10.0,
        h in 0.0f32..=1.0,
    ) {
        let mut diode = Diode::new();
        diode.set_vb(vb);
        diode.set_vl_minus_vb(vl_minus_vb);
        diode.set_h(h);
        prop_assert_eq!(diode, Diode::with_shape(vb, vl_minus_vb, h));
    }

    /// Clamped voltages always land inside the bound.
    #[test]
    fn clamp_stays_within_peak(v in prop::num::f32::ANY, peak in 0.1f32..100.0) {
        let clamped = clamp_voltage(v, peak);
        prop_assert!(clamped.abs() <= peak, "{} clamped to {}", v, clamped);
        let limits = VoltageLimits::new(peak, peak);
        prop_assert!(limits.clamp_audio(v).abs() <= peak);
    }

    /// Every value written to a bank is read back bit-for-bit.
    #[test]
    fn param_bank_preserves_bits(values in prop::array::uniform8(-1.0e6f32..1.0e6)) {
        let bank = ParamBank::new([0.0; 8]);
        for (i, &v) in values.iter().enumerate() {
            bank.set(i, v);
        }
        let snapshot = bank.snapshot();
        for i in 0..8 {
            prop_assert_eq!(snapshot[i].to_bits(), values[i].to_bits());
        }
    }
}
