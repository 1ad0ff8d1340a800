//! Offline host: drives a module sample by sample from whole-file buffers.
//!
//! WAV samples live in `[-1, 1]`; modules speak volts. The host multiplies
//! every input sample by `volts_per_unit` on the way in and divides every
//! output voltage by it on the way out. The default of 5 V per unit maps a
//! full-scale file to the ±5 V modular audio convention.
//!
//! Output slots persist across ticks exactly as they would in a rack. An
//! output the module does not write keeps its previous voltage, so an
//! inactive output renders as a flat line at whatever it last held
//! (0 V at the start of the run).

use diodering_core::{InputPort, ModuleWithParams, OutputPort};

use crate::{Error, Result};

/// Default scaling from file units to volts.
pub const DEFAULT_VOLTS_PER_UNIT: f32 = 5.0;

/// Samples between progress callbacks in [`OfflineHost::run_with_progress`].
pub const PROGRESS_INTERVAL: usize = 4096;

/// Renders a boxed module offline.
///
/// # Example
///
/// ```rust
/// use diodering_io::OfflineHost;
/// use diodering_modules::RingModulator;
///
/// let mut host = OfflineHost::new(Box::new(RingModulator::new()), 48000);
/// host.connect_input_by_name("in", vec![0.2; 4]).unwrap();
/// host.connect_input_by_name("carrier", vec![1.0; 4]).unwrap();
/// host.set_output_active_by_name("ring", true).unwrap();
///
/// let outputs = host.render().unwrap();
/// assert_eq!(outputs.len(), 5);
/// assert!(outputs[0].iter().all(|&v| v > 0.0));
/// ```
pub struct OfflineHost {
    module: Box<dyn ModuleWithParams + Send>,
    sample_rate: u32,
    volts_per_unit: f32,
    inputs: Vec<Option<Vec<f32>>>,
    outputs: Vec<OutputPort>,
}

impl OfflineHost {
    /// Wraps `module` with every input disconnected and every output inactive.
    pub fn new(module: Box<dyn ModuleWithParams + Send>, sample_rate: u32) -> Self {
        let inputs = vec![None; module.input_count()];
        let outputs = vec![OutputPort::inactive(); module.output_count()];
        Self {
            module,
            sample_rate,
            volts_per_unit: DEFAULT_VOLTS_PER_UNIT,
            inputs,
            outputs,
        }
    }

    /// Sets the file-unit to volt scale. Non-positive or non-finite values
    /// keep the current scale.
    pub fn with_volts_per_unit(mut self, volts_per_unit: f32) -> Self {
        if volts_per_unit.is_finite() && volts_per_unit > 0.0 {
            self.volts_per_unit = volts_per_unit;
        } else {
            tracing::warn!(volts_per_unit, "ignoring invalid volts-per-unit scale");
        }
        self
    }

    /// The hosted module.
    pub fn module(&self) -> &(dyn ModuleWithParams + Send) {
        self.module.as_ref()
    }

    /// The hosted module, mutably.
    pub fn module_mut(&mut self) -> &mut (dyn ModuleWithParams + Send) {
        self.module.as_mut()
    }

    /// Session sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// File-unit to volt scale.
    pub fn volts_per_unit(&self) -> f32 {
        self.volts_per_unit
    }

    /// Plugs `samples` (file units) into input `index`.
    pub fn connect_input(&mut self, index: usize, samples: Vec<f32>) -> Result<()> {
        let slot = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| Error::UnknownPort(format!("input #{index}")))?;
        *slot = Some(samples);
        Ok(())
    }

    /// Plugs `samples` into the input named `name` (name or short name).
    pub fn connect_input_by_name(&mut self, name: &str, samples: Vec<f32>) -> Result<()> {
        let index = self.input_index(name)?;
        self.connect_input(index, samples)
    }

    /// Unplugs input `index`.
    pub fn disconnect_input(&mut self, index: usize) -> Result<()> {
        let slot = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| Error::UnknownPort(format!("input #{index}")))?;
        *slot = None;
        Ok(())
    }

    /// Whether input `index` has a buffer plugged in.
    pub fn is_input_connected(&self, index: usize) -> bool {
        self.inputs.get(index).is_some_and(Option::is_some)
    }

    /// Marks output `index` as read (or not) by downstream.
    pub fn set_output_active(&mut self, index: usize, active: bool) -> Result<()> {
        let slot = self
            .outputs
            .get_mut(index)
            .ok_or_else(|| Error::UnknownPort(format!("output #{index}")))?;
        slot.active = active;
        Ok(())
    }

    /// Marks the output named `name` (name or short name) as read or not.
    pub fn set_output_active_by_name(&mut self, name: &str, active: bool) -> Result<()> {
        let index = self
            .module
            .find_output(name)
            .ok_or_else(|| Error::UnknownPort(name.to_string()))?;
        self.set_output_active(index, active)
    }

    /// Sets parameter `index` on the hosted module (clamped by the module).
    pub fn set_param(&mut self, index: usize, value: f32) {
        self.module.module_set_param(index, value);
    }

    /// Clears module state and every output slot back to 0 V.
    pub fn reset(&mut self) {
        self.module.reset();
        for slot in &mut self.outputs {
            slot.voltage = 0.0;
        }
    }

    /// Length shared by the connected inputs, `None` when nothing is connected.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] naming the first buffer that disagrees with
    /// the first connected one.
    pub fn input_len(&self) -> Result<Option<usize>> {
        let mut expected: Option<usize> = None;
        for (index, buffer) in self.inputs.iter().enumerate() {
            let Some(buffer) = buffer else { continue };
            match expected {
                None => expected = Some(buffer.len()),
                Some(len) if len != buffer.len() => {
                    return Err(self.length_mismatch(index, len, buffer.len()));
                }
                Some(_) => {}
            }
        }
        Ok(expected)
    }

    /// Runs as many ticks as the connected inputs are long.
    pub fn render(&mut self) -> Result<Vec<Vec<f32>>> {
        let len = self.input_len()?.unwrap_or(0);
        self.run(len)
    }

    /// Runs `len` ticks and returns one buffer per output, in file units.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if any connected input is not exactly `len`
    /// samples long.
    pub fn run(&mut self, len: usize) -> Result<Vec<Vec<f32>>> {
        self.run_with_progress(len, |_| {})
    }

    /// [`run`](Self::run), calling `on_progress(samples_done)` every
    /// [`PROGRESS_INTERVAL`] samples and once at the end.
    pub fn run_with_progress<F>(&mut self, len: usize, mut on_progress: F) -> Result<Vec<Vec<f32>>>
    where
        F: FnMut(usize),
    {
        for (index, buffer) in self.inputs.iter().enumerate() {
            if let Some(buffer) = buffer
                && buffer.len() != len
            {
                return Err(self.length_mismatch(index, len, buffer.len()));
            }
        }

        let scale = self.volts_per_unit;
        let mut ports: Vec<InputPort> = self
            .inputs
            .iter()
            .map(|buffer| {
                if buffer.is_some() {
                    InputPort::connected(0.0)
                } else {
                    InputPort::disconnected()
                }
            })
            .collect();
        let mut rendered: Vec<Vec<f32>> = (0..self.outputs.len())
            .map(|_| Vec::with_capacity(len))
            .collect();

        tracing::debug!(
            len,
            sample_rate = self.sample_rate,
            volts_per_unit = scale,
            connected = self.inputs.iter().filter(|b| b.is_some()).count(),
            active = self.outputs.iter().filter(|o| o.active).count(),
            "offline render"
        );

        for n in 0..len {
            for (port, buffer) in ports.iter_mut().zip(&self.inputs) {
                if let Some(buffer) = buffer {
                    port.voltage = buffer[n] * scale;
                }
            }
            self.module.process(&ports, &mut self.outputs);
            for (buffer, slot) in rendered.iter_mut().zip(&self.outputs) {
                buffer.push(slot.voltage / scale);
            }
            if (n + 1) % PROGRESS_INTERVAL == 0 {
                on_progress(n + 1);
            }
        }
        on_progress(len);

        Ok(rendered)
    }

    fn input_index(&self, name: &str) -> Result<usize> {
        self.module
            .find_input(name)
            .ok_or_else(|| Error::UnknownPort(name.to_string()))
    }

    fn length_mismatch(&self, index: usize, expected: usize, found: usize) -> Error {
        let port = self
            .module
            .input_info(index)
            .map_or_else(|| format!("#{index}"), |p| p.short_name.to_string());
        Error::LengthMismatch {
            port,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diodering_core::Diode;
    use diodering_modules::{RingModulator, RingOutput, RingParam};

    fn ring_host() -> OfflineHost {
        OfflineHost::new(Box::new(RingModulator::new()), 48000)
    }

    #[test]
    fn test_new_host_ports() {
        let host = ring_host();
        assert_eq!(host.sample_rate(), 48000);
        assert_eq!(host.volts_per_unit(), DEFAULT_VOLTS_PER_UNIT);
        assert!(!host.is_input_connected(0));
        assert_eq!(host.module().output_count(), 5);
    }

    #[test]
    fn test_render_matches_diode_math() {
        let mut host = ring_host();
        host.connect_input_by_name("in", vec![0.6]).unwrap();
        host.connect_input_by_name("carrier", vec![1.0]).unwrap();
        for output in RingOutput::ALL {
            host.set_output_active(output.index(), true).unwrap();
        }
        let out = host.render().unwrap();

        // 0.6 → 3 V, halved to 1.5 V; carrier 1.0 → 5 V
        let diode = Diode::new();
        let sum = diode.apply(6.5);
        let diff = diode.apply(3.5);
        assert!((out[RingOutput::Sum.index()][0] - sum / 5.0).abs() < 1e-6);
        assert!((out[RingOutput::Diff.index()][0] - diff / 5.0).abs() < 1e-6);
        assert!((out[RingOutput::Ring.index()][0] - (sum - diff) / 5.0).abs() < 1e-6);
        assert_eq!(out[RingOutput::Min.index()][0], out[RingOutput::Diff.index()][0]);
        assert_eq!(out[RingOutput::Max.index()][0], out[RingOutput::Sum.index()][0]);
    }

    #[test]
    fn test_volts_per_unit_scaling() {
        let mut host = ring_host().with_volts_per_unit(1.0);
        assert_eq!(host.volts_per_unit(), 1.0);
        host.connect_input(0, vec![2.0]).unwrap();
        host.connect_input(1, vec![5.0]).unwrap();
        host.set_output_active(RingOutput::Sum.index(), true).unwrap();
        let out = host.render().unwrap();
        assert!((out[RingOutput::Sum.index()][0] - Diode::new().apply(6.0)).abs() < 1e-6);

        let host = ring_host().with_volts_per_unit(-3.0);
        assert_eq!(host.volts_per_unit(), DEFAULT_VOLTS_PER_UNIT);
    }

    #[test]
    fn test_inactive_outputs_stay_at_zero() {
        let mut host = ring_host();
        host.connect_input(0, vec![0.5; 16]).unwrap();
        host.connect_input(1, vec![0.5; 16]).unwrap();
        host.set_output_active(RingOutput::Ring.index(), true).unwrap();
        let out = host.render().unwrap();
        // the kernel computes every output once any is active
        assert!(out[RingOutput::Sum.index()].iter().all(|&v| v > 0.0));

        let mut silent = ring_host();
        silent.connect_input(0, vec![0.5; 16]).unwrap();
        silent.connect_input(1, vec![0.5; 16]).unwrap();
        let out = silent.render().unwrap();
        assert!(out.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_disconnect_zeroes_ring_only() {
        let mut host = ring_host();
        host.connect_input(0, vec![0.5; 4]).unwrap();
        host.connect_input(1, vec![0.5; 4]).unwrap();
        host.set_output_active(RingOutput::Ring.index(), true).unwrap();
        host.set_output_active(RingOutput::Sum.index(), true).unwrap();
        let first = host.render().unwrap();
        let held_sum = first[RingOutput::Sum.index()][3];
        assert!(held_sum > 0.0);

        host.disconnect_input(1).unwrap();
        let second = host.render().unwrap();
        assert!(second[RingOutput::Ring.index()].iter().all(|&v| v == 0.0));
        assert!(second[RingOutput::Sum.index()].iter().all(|&v| v == held_sum));

        host.reset();
        let third = host.render().unwrap();
        assert!(third[RingOutput::Sum.index()].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_set_param_through_host() {
        let mut host = ring_host();
        host.set_param(RingParam::InputLevel.index(), 0.0);
        host.connect_input(0, vec![1.0; 2]).unwrap();
        host.connect_input(1, vec![0.0; 2]).unwrap();
        host.set_output_active(RingOutput::Ring.index(), true).unwrap();
        let out = host.render().unwrap();
        assert!(out[RingOutput::Ring.index()].iter().all(|&v| v == 0.0));
        assert_eq!(host.module().module_get_param(RingParam::InputLevel.index()), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let mut host = ring_host();
        host.connect_input(0, vec![0.0; 10]).unwrap();
        host.connect_input(1, vec![0.0; 12]).unwrap();
        match host.input_len() {
            Err(Error::LengthMismatch {
                port,
                expected,
                found,
            }) => {
                assert_eq!(port, "carrier");
                assert_eq!((expected, found), (10, 12));
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
        assert!(host.run(10).is_err());
        assert!(host.render().is_err());
    }

    #[test]
    fn test_unknown_ports() {
        let mut host = ring_host();
        assert!(matches!(host.connect_input(3, vec![]), Err(Error::UnknownPort(_))));
        assert!(matches!(host.disconnect_input(9), Err(Error::UnknownPort(_))));
        assert!(matches!(host.set_output_active(5, true), Err(Error::UnknownPort(_))));
        assert!(matches!(
            host.connect_input_by_name("sidechain", vec![]),
            Err(Error::UnknownPort(ref n)) if n == "sidechain"
        ));
        assert!(host.set_output_active_by_name("Difference", true).is_ok());
    }

    #[test]
    fn test_progress_callback() {
        let mut host = ring_host();
        let len = PROGRESS_INTERVAL * 2 + 10;
        host.connect_input(0, vec![0.1; len]).unwrap();
        host.connect_input(1, vec![0.1; len]).unwrap();
        let mut calls = Vec::new();
        host.run_with_progress(len, |done| calls.push(done)).unwrap();
        assert_eq!(calls, vec![PROGRESS_INTERVAL, PROGRESS_INTERVAL * 2, len]);
    }

    #[test]
    fn test_run_without_inputs() {
        let mut host = ring_host();
        host.set_output_active(0, true).unwrap();
        assert_eq!(host.input_len().unwrap(), None);
        let out = host.run(3).unwrap();
        assert_eq!(out[0], vec![0.0; 3]);
    }
}
