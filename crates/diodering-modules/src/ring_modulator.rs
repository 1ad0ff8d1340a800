//! Analog-modeled diode ring modulator.
//!
//! A diode ring multiplies two signals by routing their half-sum and
//! half-difference through matched diode pairs. Each pair only conducts above
//! its bias voltage, so the difference of the two branch currents carries the
//! product terms plus the diode's characteristic distortion.
//!
//! ## Signal Flow
//!
//! ```text
//! input   ─ clamp ─ level ─ polarity ─ ×½ ─────────────┐ vhin
//! carrier ─ clamp ─ level ─ polarity ─ + offset + CV ──┤ vc
//!                                                      │
//!               sum  = D(vc + vhin)   diff = D(vc − vhin)
//!               ring = sum − diff     min/max of (sum, diff)
//! ```
//!
//! `D` is the [`Diode`] curve. In the single-polarity modes each stage also
//! rectifies its own signal through the diode before mixing.
//!
//! ## Gating
//!
//! - No active output: the tick is skipped and nothing is written.
//! - Input or carrier unplugged: `ring` is forced to 0 and the other four
//!   outputs keep whatever they held on the previous tick.
//!
//! Reference: Parker and Välimäki, "A Simple Digital Model of the Diode-Based
//! Ring Modulator", DAFx-11.

use diodering_core::{
    DEFAULT_H, DEFAULT_VB, DEFAULT_VL_MINUS_VB, Diode, InputPort, Module, OutputPort,
    ParamDescriptor, ParamId, ParameterInfo, PortDescriptor, VoltageLimits, clamp_voltage,
};

use crate::polarity::Polarity;

/// Number of parameters.
pub const RING_PARAM_COUNT: usize = 8;
/// Number of input ports.
pub const RING_INPUT_COUNT: usize = 3;
/// Number of output ports.
pub const RING_OUTPUT_COUNT: usize = 5;

/// Parameter indices, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingParam {
    /// Input level, 0–1.
    InputLevel,
    /// Carrier level, 0–1.
    CarrierLevel,
    /// Carrier offset in volts, ±Vcc.
    CarrierOffset,
    /// Input polarity switch.
    InputPolarity,
    /// Carrier polarity switch.
    CarrierPolarity,
    /// Diode forward-bias voltage.
    DiodeVb,
    /// Diode knee width.
    DiodeVlMinusVb,
    /// Diode linear-region slope.
    DiodeH,
}

impl RingParam {
    /// All parameters in index order.
    pub const ALL: [RingParam; RING_PARAM_COUNT] = [
        RingParam::InputLevel,
        RingParam::CarrierLevel,
        RingParam::CarrierOffset,
        RingParam::InputPolarity,
        RingParam::CarrierPolarity,
        RingParam::DiodeVb,
        RingParam::DiodeVlMinusVb,
        RingParam::DiodeH,
    ];

    /// Parameter for a host index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Host index of this parameter.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Input port indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingInput {
    /// Modulated signal.
    Input,
    /// Carrier signal.
    Carrier,
    /// CV added to the carrier offset.
    CarrierOffsetCv,
}

impl RingInput {
    /// All inputs in index order.
    pub const ALL: [RingInput; RING_INPUT_COUNT] =
        [RingInput::Input, RingInput::Carrier, RingInput::CarrierOffsetCv];

    /// Port declaration.
    pub const fn descriptor(self) -> PortDescriptor {
        match self {
            RingInput::Input => PortDescriptor::audio("Input", "in"),
            RingInput::Carrier => PortDescriptor::audio("Carrier", "carrier"),
            RingInput::CarrierOffsetCv => PortDescriptor::control("Carrier Offset CV", "offset"),
        }
    }
}

/// Output port indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingOutput {
    /// `sum − diff`.
    Ring,
    /// Diode response to `vc + vhin`.
    Sum,
    /// Diode response to `vc − vhin`.
    Diff,
    /// `min(sum, diff)`.
    Min,
    /// `max(sum, diff)`.
    Max,
}

impl RingOutput {
    /// All outputs in index order.
    pub const ALL: [RingOutput; RING_OUTPUT_COUNT] = [
        RingOutput::Ring,
        RingOutput::Sum,
        RingOutput::Diff,
        RingOutput::Min,
        RingOutput::Max,
    ];

    /// Host index of this output.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Port declaration.
    pub const fn descriptor(self) -> PortDescriptor {
        match self {
            RingOutput::Ring => PortDescriptor::audio("Ring", "ring"),
            RingOutput::Sum => PortDescriptor::audio("Sum", "sum"),
            RingOutput::Diff => PortDescriptor::audio("Difference", "diff"),
            RingOutput::Min => PortDescriptor::audio("Minimum", "min"),
            RingOutput::Max => PortDescriptor::audio("Maximum", "max"),
        }
    }
}

/// The eight control values read each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    /// Input level, 0–1.
    pub input_level: f32,
    /// Carrier level, 0–1.
    pub carrier_level: f32,
    /// Carrier offset in volts.
    pub carrier_offset: f32,
    /// Input polarity.
    pub input_polarity: Polarity,
    /// Carrier polarity.
    pub carrier_polarity: Polarity,
    /// Diode forward-bias voltage.
    pub diode_vb: f32,
    /// Diode knee width `Vl − Vb`.
    pub diode_vl_minus_vb: f32,
    /// Diode linear-region slope.
    pub diode_h: f32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            input_level: 1.0,
            carrier_level: 1.0,
            carrier_offset: 0.0,
            input_polarity: Polarity::Bipolar,
            carrier_polarity: Polarity::Bipolar,
            diode_vb: DEFAULT_VB,
            diode_vl_minus_vb: DEFAULT_VL_MINUS_VB,
            diode_h: DEFAULT_H,
        }
    }
}

impl RingParams {
    /// Builds params from raw host values in [`RingParam`] order.
    ///
    /// Polarity switches decode through [`Polarity::from_param`].
    pub fn from_values(values: &[f32; RING_PARAM_COUNT]) -> Self {
        Self {
            input_level: values[RingParam::InputLevel.index()],
            carrier_level: values[RingParam::CarrierLevel.index()],
            carrier_offset: values[RingParam::CarrierOffset.index()],
            input_polarity: Polarity::from_param(values[RingParam::InputPolarity.index()]),
            carrier_polarity: Polarity::from_param(values[RingParam::CarrierPolarity.index()]),
            diode_vb: values[RingParam::DiodeVb.index()],
            diode_vl_minus_vb: values[RingParam::DiodeVlMinusVb.index()],
            diode_h: values[RingParam::DiodeH.index()],
        }
    }

    /// Raw host values in [`RingParam`] order.
    pub fn to_values(&self) -> [f32; RING_PARAM_COUNT] {
        [
            self.input_level,
            self.carrier_level,
            self.carrier_offset,
            self.input_polarity.as_param(),
            self.carrier_polarity.as_param(),
            self.diode_vb,
            self.diode_vl_minus_vb,
            self.diode_h,
        ]
    }

    /// Clamps every value into its declared range, with `Vcc = control_peak`.
    ///
    /// Levels go to `[0, 1]` (NaN → 0), the offset to `±Vcc` (NaN → 0), the
    /// diode voltages to `[ε, Vcc]` (NaN → ε) and `h` to `[0, 1]` (NaN → 0).
    pub fn sanitized(&self, control_peak: f32) -> Self {
        Self {
            input_level: clamp_unit(self.input_level),
            carrier_level: clamp_unit(self.carrier_level),
            carrier_offset: clamp_voltage(self.carrier_offset, control_peak),
            input_polarity: self.input_polarity,
            carrier_polarity: self.carrier_polarity,
            diode_vb: clamp_shape(self.diode_vb, control_peak),
            diode_vl_minus_vb: clamp_shape(self.diode_vl_minus_vb, control_peak),
            diode_h: clamp_unit(self.diode_h),
        }
    }
}

#[inline]
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[inline]
fn clamp_shape(x: f32, vcc: f32) -> f32 {
    if x.is_nan() {
        f32::EPSILON
    } else {
        x.clamp(f32::EPSILON, vcc.max(f32::EPSILON))
    }
}

/// Read slots for the three inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingInputs {
    /// Modulated signal.
    pub input: InputPort,
    /// Carrier signal.
    pub carrier: InputPort,
    /// Carrier offset CV. Reads 0 V when unplugged.
    pub carrier_offset_cv: InputPort,
}

impl RingInputs {
    /// Input and carrier plugged in, no offset CV.
    pub const fn new(input: f32, carrier: f32) -> Self {
        Self {
            input: InputPort::connected(input),
            carrier: InputPort::connected(carrier),
            carrier_offset_cv: InputPort::disconnected(),
        }
    }

    /// Plugs a CV into the carrier offset input.
    pub const fn with_offset_cv(mut self, cv: f32) -> Self {
        self.carrier_offset_cv = InputPort::connected(cv);
        self
    }

    /// Reads host slots in [`RingInput`] order. Missing slots are unplugged.
    pub fn from_slots(slots: &[InputPort]) -> Self {
        let slot = |input: RingInput| slots.get(input as usize).copied().unwrap_or_default();
        Self {
            input: slot(RingInput::Input),
            carrier: slot(RingInput::Carrier),
            carrier_offset_cv: slot(RingInput::CarrierOffsetCv),
        }
    }
}

/// Write slots for the five outputs.
///
/// Values persist between ticks, so a skipped write leaves the previous
/// voltage in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingOutputs {
    /// `sum − diff`.
    pub ring: OutputPort,
    /// Diode response to `vc + vhin`.
    pub sum: OutputPort,
    /// Diode response to `vc − vhin`.
    pub diff: OutputPort,
    /// `min(sum, diff)`.
    pub min: OutputPort,
    /// `max(sum, diff)`.
    pub max: OutputPort,
}

impl RingOutputs {
    /// Every output active, all holding 0 V.
    pub const fn all_active() -> Self {
        Self {
            ring: OutputPort::active(),
            sum: OutputPort::active(),
            diff: OutputPort::active(),
            min: OutputPort::active(),
            max: OutputPort::active(),
        }
    }

    /// `true` if anything downstream listens to at least one output.
    #[inline]
    pub fn any_active(&self) -> bool {
        self.ring.active || self.sum.active || self.diff.active || self.min.active || self.max.active
    }

    /// Output slot by port.
    pub fn port(&self, output: RingOutput) -> &OutputPort {
        match output {
            RingOutput::Ring => &self.ring,
            RingOutput::Sum => &self.sum,
            RingOutput::Diff => &self.diff,
            RingOutput::Min => &self.min,
            RingOutput::Max => &self.max,
        }
    }

    /// Mutable output slot by port.
    pub fn port_mut(&mut self, output: RingOutput) -> &mut OutputPort {
        match output {
            RingOutput::Ring => &mut self.ring,
            RingOutput::Sum => &mut self.sum,
            RingOutput::Diff => &mut self.diff,
            RingOutput::Min => &mut self.min,
            RingOutput::Max => &mut self.max,
        }
    }

    /// Current voltages in [`RingOutput`] order.
    pub fn voltages(&self) -> [f32; RING_OUTPUT_COUNT] {
        RingOutput::ALL.map(|o| self.port(o).voltage)
    }

    /// Reads host slots in [`RingOutput`] order. Missing slots are inactive.
    pub fn from_slots(slots: &[OutputPort]) -> Self {
        let mut outputs = Self::default();
        for (output, slot) in RingOutput::ALL.into_iter().zip(slots) {
            *outputs.port_mut(output) = *slot;
        }
        outputs
    }

    /// Writes back into host slots. Slots beyond the declared outputs are untouched.
    pub fn write_slots(&self, slots: &mut [OutputPort]) {
        for (output, slot) in RingOutput::ALL.into_iter().zip(slots.iter_mut()) {
            *slot = *self.port(output);
        }
    }
}

/// Diode ring modulator kernel.
///
/// Owns one [`Diode`], the host-facing parameter values and the voltage
/// limits. [`step`](Self::step) is the pure per-sample routine; the
/// [`Module`] impl feeds it from host slots and the stored parameters.
///
/// ## Parameters
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Input Level | 0–1 | 1.0 |
/// | 1 | Carrier Level | 0–1 | 1.0 |
/// | 2 | Carrier Offset | ±Vcc V | 0.0 V |
/// | 3 | Input Polarity | 0/1/2 (Negative/Bipolar/Positive) | 1 |
/// | 4 | Carrier Polarity | 0/1/2 | 1 |
/// | 5 | Diode Vb | ε–Vcc V | 0.2 V |
/// | 6 | Diode Vl−Vb | ε–Vcc V | 0.5 V |
/// | 7 | Diode H | 0–1 | 0.9 |
///
/// `Vcc` is the control peak voltage of the instance's [`VoltageLimits`].
///
/// # Example
///
/// ```rust
/// use diodering_modules::{RingInputs, RingModulator, RingOutputs, RingParams};
///
/// let mut ring = RingModulator::new();
/// let mut outputs = RingOutputs::all_active();
/// ring.step(&RingInputs::new(5.0, 3.0), &RingParams::default(), &mut outputs);
///
/// assert_eq!(outputs.ring.voltage, outputs.sum.voltage - outputs.diff.voltage);
/// assert!(outputs.min.voltage <= outputs.max.voltage);
/// ```
#[derive(Debug, Clone)]
pub struct RingModulator {
    diode: Diode,
    params: RingParams,
    limits: VoltageLimits,
}

impl Default for RingModulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RingModulator {
    /// Creates a ring modulator with default parameters and voltage limits.
    pub fn new() -> Self {
        Self::with_limits(VoltageLimits::default())
    }

    /// Creates a ring modulator with custom voltage limits.
    pub fn with_limits(limits: VoltageLimits) -> Self {
        let params = RingParams::default().sanitized(limits.control_peak());
        Self {
            diode: Diode::with_shape(params.diode_vb, params.diode_vl_minus_vb, params.diode_h),
            params,
            limits,
        }
    }

    /// Stored parameter values (used by the [`Module`] path).
    pub fn params(&self) -> &RingParams {
        &self.params
    }

    /// Replaces the stored parameters, clamped to their declared ranges.
    pub fn set_params(&mut self, params: RingParams) {
        self.params = params.sanitized(self.limits.control_peak());
    }

    /// Voltage limits in effect.
    pub fn limits(&self) -> VoltageLimits {
        self.limits
    }

    /// Replaces the voltage limits. Stored parameters are re-clamped to the new `Vcc`.
    pub fn set_limits(&mut self, limits: VoltageLimits) {
        self.limits = limits;
        self.params = self.params.sanitized(limits.control_peak());
    }

    /// The diode as last reconfigured.
    pub fn diode(&self) -> &Diode {
        &self.diode
    }

    /// Runs one sample tick.
    ///
    /// Reads `inputs` and `params`, writes `outputs` subject to gating:
    /// nothing is written when no output is active, and only `ring` (forced
    /// to 0) is written when input or carrier is unplugged.
    ///
    /// Allocation-free and branch-bounded.
    #[inline]
    pub fn step(&mut self, inputs: &RingInputs, params: &RingParams, outputs: &mut RingOutputs) {
        if !outputs.any_active() {
            return;
        }
        if !inputs.input.connected || !inputs.carrier.connected {
            outputs.ring.voltage = 0.0;
            return;
        }

        let params = params.sanitized(self.limits.control_peak());
        self.diode.set_vb(params.diode_vb);
        self.diode.set_vl_minus_vb(params.diode_vl_minus_vb);
        self.diode.set_h(params.diode_h);

        let input = self.limits.clamp_audio(inputs.input.voltage);
        let carrier = self.limits.clamp_audio(inputs.carrier.voltage);
        let cv = self.limits.clamp_control(inputs.carrier_offset_cv.value());
        let offset = self.limits.clamp_control(params.carrier_offset + cv);

        let vhin = self.shape(input, params.input_polarity, params.input_level) * 0.5;
        let vc = self.shape(carrier, params.carrier_polarity, params.carrier_level) + offset;

        let sum = self.diode.apply(vc + vhin);
        let diff = self.diode.apply(vc - vhin);

        outputs.sum.voltage = sum;
        outputs.diff.voltage = diff;
        outputs.min.voltage = sum.min(diff);
        outputs.max.voltage = sum.max(diff);
        outputs.ring.voltage = sum - diff;
    }

    /// Level and polarity stage applied to the input and the carrier.
    ///
    /// `scaled = raw × level`; bipolar returns `scaled` untouched, positive
    /// keeps `D(scaled)` for `scaled > 0`, negative keeps `−D(−scaled)` for
    /// `scaled < 0`. The discarded half-wave is 0.
    #[inline]
    pub fn shape(&self, raw: f32, polarity: Polarity, level: f32) -> f32 {
        let scaled = raw * level;
        match polarity {
            Polarity::Bipolar => scaled,
            Polarity::Positive => {
                if scaled > 0.0 {
                    self.diode.apply(scaled)
                } else {
                    0.0
                }
            }
            Polarity::Negative => {
                if scaled < 0.0 {
                    -self.diode.apply(-scaled)
                } else {
                    0.0
                }
            }
        }
    }
}

impl Module for RingModulator {
    fn input_count(&self) -> usize {
        RING_INPUT_COUNT
    }

    fn output_count(&self) -> usize {
        RING_OUTPUT_COUNT
    }

    fn input_info(&self, index: usize) -> Option<PortDescriptor> {
        RingInput::ALL.get(index).map(|i| i.descriptor())
    }

    fn output_info(&self, index: usize) -> Option<PortDescriptor> {
        RingOutput::ALL.get(index).map(|o| o.descriptor())
    }

    fn set_voltage_limits(&mut self, limits: VoltageLimits) {
        self.set_limits(limits);
    }

    fn process(&mut self, inputs: &[InputPort], outputs: &mut [OutputPort]) {
        let ring_inputs = RingInputs::from_slots(inputs);
        let mut ring_outputs = RingOutputs::from_slots(outputs);
        let params = self.params;
        self.step(&ring_inputs, &params, &mut ring_outputs);
        ring_outputs.write_slots(outputs);
    }
}

impl ParameterInfo for RingModulator {
    fn param_count(&self) -> usize {
        RING_PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let vcc = self.limits.control_peak();
        let shape_max = vcc.max(f32::EPSILON);
        let desc = match RingParam::from_index(index)? {
            RingParam::InputLevel => ParamDescriptor::level("Input Level", "In Lvl")
                .with_id(ParamId(100), "input_level")
                .with_group("input"),
            RingParam::CarrierLevel => ParamDescriptor::level("Carrier Level", "Car Lvl")
                .with_id(ParamId(101), "carrier_level")
                .with_group("carrier"),
            RingParam::CarrierOffset => {
                ParamDescriptor::volts("Carrier Offset", "Offset", -vcc, vcc, 0.0)
                    .with_id(ParamId(102), "carrier_offset")
                    .with_group("carrier")
            }
            RingParam::InputPolarity => {
                ParamDescriptor::switch("Input Polarity", "In Pol", Polarity::LABELS, 1)
                    .with_id(ParamId(103), "input_polarity")
                    .with_group("input")
            }
            RingParam::CarrierPolarity => {
                ParamDescriptor::switch("Carrier Polarity", "Car Pol", Polarity::LABELS, 1)
                    .with_id(ParamId(104), "carrier_polarity")
                    .with_group("carrier")
            }
            RingParam::DiodeVb => {
                ParamDescriptor::volts(
                    "Diode Vb",
                    "Vb",
                    f32::EPSILON,
                    shape_max,
                    DEFAULT_VB.min(shape_max),
                )
                    .with_id(ParamId(105), "diode_vb")
                    .with_group("diode")
            }
            RingParam::DiodeVlMinusVb => {
                ParamDescriptor::volts(
                    "Diode Vl-Vb",
                    "Vl-Vb",
                    f32::EPSILON,
                    shape_max,
                    DEFAULT_VL_MINUS_VB.min(shape_max),
                )
                    .with_id(ParamId(106), "diode_vl_minus_vb")
                    .with_group("diode")
            }
            RingParam::DiodeH => ParamDescriptor::custom("Diode H", "H", 0.0, 1.0, DEFAULT_H)
                .with_id(ParamId(107), "diode_h")
                .with_group("diode"),
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        RingParam::from_index(index)
            .map(|param| self.params.to_values()[param.index()])
            .unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let (Some(param), Some(desc)) = (RingParam::from_index(index), self.param_info(index))
        else {
            return;
        };
        let value = desc.clamp(value);
        match param {
            RingParam::InputLevel => self.params.input_level = value,
            RingParam::CarrierLevel => self.params.carrier_level = value,
            RingParam::CarrierOffset => self.params.carrier_offset = value,
            RingParam::InputPolarity => self.params.input_polarity = Polarity::from_param(value),
            RingParam::CarrierPolarity => {
                self.params.carrier_polarity = Polarity::from_param(value);
            }
            RingParam::DiodeVb => self.params.diode_vb = value,
            RingParam::DiodeVlMinusVb => self.params.diode_vl_minus_vb = value,
            RingParam::DiodeH => self.params.diode_h = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ring: &mut RingModulator, inputs: RingInputs, params: &RingParams) -> RingOutputs {
        let mut outputs = RingOutputs::all_active();
        ring.step(&inputs, params, &mut outputs);
        outputs
    }

    #[test]
    fn test_bipolar_reference_values() {
        let mut ring = RingModulator::new();
        let out = run(&mut ring, RingInputs::new(5.0, 3.0), &RingParams::default());
        let diode = Diode::new();
        assert_eq!(out.sum.voltage, diode.apply(3.0 + 2.5));
        assert_eq!(out.diff.voltage, diode.apply(3.0 - 2.5));
        assert_eq!(out.ring.voltage, out.sum.voltage - out.diff.voltage);
        assert_eq!(out.min.voltage, out.diff.voltage);
        assert_eq!(out.max.voltage, out.sum.voltage);
    }

    #[test]
    fn test_no_active_output_is_noop() {
        let mut ring = RingModulator::new();
        let mut outputs = RingOutputs::default();
        outputs.sum.voltage = 4.0;
        ring.step(&RingInputs::new(5.0, 3.0), &RingParams::default(), &mut outputs);
        assert_eq!(outputs.sum.voltage, 4.0);
        assert_eq!(outputs.ring.voltage, 0.0);
    }

    #[test]
    fn test_disconnected_carrier_zeroes_ring_only() {
        let mut ring = RingModulator::new();
        let params = RingParams::default();
        let mut outputs = RingOutputs::all_active();
        ring.step(&RingInputs::new(5.0, 3.0), &params, &mut outputs);
        let before = outputs;
        assert_ne!(before.ring.voltage, 0.0);

        let mut inputs = RingInputs::new(1.0, 1.0);
        inputs.carrier = InputPort::disconnected();
        ring.step(&inputs, &params, &mut outputs);
        assert_eq!(outputs.ring.voltage, 0.0);
        assert_eq!(outputs.sum.voltage, before.sum.voltage);
        assert_eq!(outputs.diff.voltage, before.diff.voltage);
        assert_eq!(outputs.min.voltage, before.min.voltage);
        assert_eq!(outputs.max.voltage, before.max.voltage);
    }

    #[test]
    fn test_polarity_shaping() {
        let ring = RingModulator::new();
        let diode = Diode::new();
        assert_eq!(ring.shape(4.0, Polarity::Positive, 0.5), diode.apply(2.0));
        assert_eq!(ring.shape(-4.0, Polarity::Positive, 0.5), 0.0);
        assert_eq!(ring.shape(-4.0, Polarity::Negative, 0.5), -diode.apply(2.0));
        assert_eq!(ring.shape(4.0, Polarity::Negative, 0.5), 0.0);
        assert_eq!(ring.shape(-4.0, Polarity::Bipolar, 0.5), -2.0);
    }

    #[test]
    fn test_offset_cv_adds_to_carrier() {
        let mut ring = RingModulator::new();
        let params = RingParams {
            carrier_offset: 1.0,
            ..RingParams::default()
        };
        let out = run(&mut ring, RingInputs::new(0.0, 0.0).with_offset_cv(2.0), &params);
        let diode = Diode::new();
        assert_eq!(out.sum.voltage, diode.apply(3.0));
        assert_eq!(out.diff.voltage, diode.apply(3.0));
        assert_eq!(out.ring.voltage, 0.0);
    }

    #[test]
    fn test_offset_sum_clamped_to_control_peak() {
        let mut ring = RingModulator::new();
        let params = RingParams {
            carrier_offset: 10.0,
            ..RingParams::default()
        };
        let out = run(&mut ring, RingInputs::new(0.0, 0.0).with_offset_cv(10.0), &params);
        assert_eq!(out.sum.voltage, Diode::new().apply(10.0));
    }

    #[test]
    fn test_audio_inputs_clamped() {
        let mut ring = RingModulator::new();
        let params = RingParams::default();
        let hot = run(&mut ring, RingInputs::new(1000.0, -1000.0), &params);
        let railed = run(&mut ring, RingInputs::new(12.0, -12.0), &params);
        assert_eq!(hot, railed);
    }

    #[test]
    fn test_nan_inputs_read_as_zero() {
        let mut ring = RingModulator::new();
        let out = run(&mut ring, RingInputs::new(f32::NAN, f32::NAN), &RingParams::default());
        for v in out.voltages() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_params_reconfigure_diode() {
        let mut ring = RingModulator::new();
        let params = RingParams {
            diode_vb: 1.0,
            diode_vl_minus_vb: 2.0,
            diode_h: 0.5,
            ..RingParams::default()
        };
        run(&mut ring, RingInputs::new(1.0, 1.0), &params);
        assert_eq!(ring.diode().vb(), 1.0);
        assert_eq!(ring.diode().vl_minus_vb(), 2.0);
        assert_eq!(ring.diode().h(), 0.5);
    }

    #[test]
    fn test_diode_voltages_clamped_to_vcc() {
        let mut ring = RingModulator::new();
        let params = RingParams {
            diode_vb: 50.0,
            diode_vl_minus_vb: 0.0,
            ..RingParams::default()
        };
        run(&mut ring, RingInputs::new(1.0, 1.0), &params);
        assert_eq!(ring.diode().vb(), 10.0);
        assert_eq!(ring.diode().vl_minus_vb(), f32::EPSILON);
    }

    #[test]
    fn test_module_process_uses_stored_params() {
        let mut ring = RingModulator::new();
        ring.set_param(RingParam::CarrierOffset.index(), 2.0);
        let inputs = [
            InputPort::connected(0.0),
            InputPort::connected(0.0),
            InputPort::disconnected(),
        ];
        let mut outputs = [OutputPort::active(); RING_OUTPUT_COUNT];
        ring.process(&inputs, &mut outputs);
        assert_eq!(outputs[RingOutput::Sum.index()].voltage, Diode::new().apply(2.0));
    }

    #[test]
    fn test_module_short_slices() {
        let mut ring = RingModulator::new();
        // Only the input slot: carrier reads as unplugged.
        let mut outputs = [OutputPort::active(), OutputPort::active()];
        outputs[1].voltage = 7.0;
        ring.process(&[InputPort::connected(1.0)], &mut outputs);
        assert_eq!(outputs[0].voltage, 0.0);
        assert_eq!(outputs[1].voltage, 7.0);

        let mut none: [OutputPort; 0] = [];
        ring.process(&[], &mut none);
    }

    #[test]
    fn test_param_descriptors() {
        let ring = RingModulator::new();
        assert_eq!(ring.param_count(), 8);
        let expected = [
            ("input_level", 0.0, 1.0, 1.0),
            ("carrier_level", 0.0, 1.0, 1.0),
            ("carrier_offset", -10.0, 10.0, 0.0),
            ("input_polarity", 0.0, 2.0, 1.0),
            ("carrier_polarity", 0.0, 2.0, 1.0),
            ("diode_vb", f32::EPSILON, 10.0, 0.2),
            ("diode_vl_minus_vb", f32::EPSILON, 10.0, 0.5),
            ("diode_h", 0.0, 1.0, 0.9),
        ];
        for (i, (id, min, max, default)) in expected.into_iter().enumerate() {
            let desc = ring.param_info(i).expect("descriptor");
            assert_eq!(desc.string_id, id);
            assert_eq!(desc.min, min, "{id} min");
            assert_eq!(desc.max, max, "{id} max");
            assert_eq!(desc.default, default, "{id} default");
            assert_eq!(desc.id, ParamId(100 + i as u32));
            assert_eq!(ring.get_param(i), default, "{id} initial value");
            assert!(desc.short_name.len() <= 8, "{id} short name too long");
        }
        assert!(ring.param_info(8).is_none());
    }

    #[test]
    fn test_set_param_clamps_and_decodes() {
        let mut ring = RingModulator::new();
        ring.set_param(RingParam::InputLevel.index(), 3.0);
        assert_eq!(ring.params().input_level, 1.0);
        ring.set_param(RingParam::CarrierPolarity.index(), 1.7);
        assert_eq!(ring.params().carrier_polarity, Polarity::Positive);
        ring.set_param(RingParam::DiodeVb.index(), -1.0);
        assert_eq!(ring.params().diode_vb, f32::EPSILON);
        ring.set_param(RingParam::DiodeH.index(), f32::NAN);
        assert_eq!(ring.params().diode_h, 0.9);
        ring.set_param(99, 1.0);
        assert_eq!(ring.get_param(99), 0.0);
    }

    #[test]
    fn test_limits_rescale_offset_range() {
        let mut ring = RingModulator::new();
        ring.set_param(RingParam::CarrierOffset.index(), 8.0);
        ring.set_limits(VoltageLimits::new(12.0, 5.0));
        assert_eq!(ring.params().carrier_offset, 5.0);
        let desc = ring.param_info(RingParam::CarrierOffset.index()).expect("descriptor");
        assert_eq!(desc.max, 5.0);
    }

    #[test]
    fn test_defaults_stay_in_range_under_low_vcc() {
        let mut ring = RingModulator::with_limits(VoltageLimits::new(12.0, 0.1));
        for index in [RingParam::DiodeVb.index(), RingParam::DiodeVlMinusVb.index()] {
            let desc = ring.param_info(index).expect("descriptor");
            assert_eq!(desc.max, 0.1);
            assert!(desc.default >= desc.min && desc.default <= desc.max);
            assert!(ring.get_param(index) <= desc.max, "initial value above max");

            ring.set_param(index, f32::NAN);
            let after_nan = ring.get_param(index);
            assert_eq!(after_nan, 0.1);

            ring.set_param(index, 0.05);
            ring.reset_params();
            assert_eq!(ring.get_param(index), after_nan);
        }
    }

    #[test]
    fn test_values_roundtrip() {
        let params = RingParams {
            input_level: 0.3,
            carrier_level: 0.7,
            carrier_offset: -1.5,
            input_polarity: Polarity::Negative,
            carrier_polarity: Polarity::Positive,
            diode_vb: 0.4,
            diode_vl_minus_vb: 1.1,
            diode_h: 0.6,
        };
        assert_eq!(RingParams::from_values(&params.to_values()), params);
    }

    #[test]
    fn test_output_slot_roundtrip() {
        let mut slots = [OutputPort::inactive(); RING_OUTPUT_COUNT];
        slots[RingOutput::Max.index()] = OutputPort {
            active: true,
            voltage: 1.25,
        };
        let outputs = RingOutputs::from_slots(&slots);
        assert!(outputs.any_active());
        assert_eq!(outputs.max.voltage, 1.25);
        let mut written = [OutputPort::inactive(); RING_OUTPUT_COUNT];
        outputs.write_slots(&mut written);
        assert_eq!(written, slots);
    }

    #[test]
    fn test_port_names() {
        let ring = RingModulator::new();
        assert_eq!(ring.find_input("carrier"), Some(1));
        assert_eq!(ring.find_input("offset"), Some(2));
        assert_eq!(ring.find_output("diff"), Some(2));
        assert_eq!(ring.find_output("Maximum"), Some(4));
    }
}
