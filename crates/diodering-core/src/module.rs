//! Host-facing module trait and per-tick port slots.
//!
//! A host drives a module once per sample. Each tick it hands over one
//! [`InputPort`] per input (connected flag plus voltage) and one
//! [`OutputPort`] per output (an `active` flag telling the module whether
//! anything downstream is listening, plus the voltage slot to write).
//!
//! Output slots persist between ticks: a module that skips a write leaves
//! the previous value in place, and the host reads whatever is there.

use crate::voltage::VoltageLimits;

/// Kind of signal carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Audio-rate signal, clamped to the audio peak voltage.
    Audio,
    /// Control voltage, clamped to the control peak voltage.
    Control,
}

/// Declaration of one input or output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Full port name (e.g., "Carrier").
    pub name: &'static str,
    /// Short label, max 8 characters. Also used for file names by offline hosts.
    pub short_name: &'static str,
    /// Signal kind.
    pub kind: SignalKind,
}

impl PortDescriptor {
    /// Audio-rate port.
    pub const fn audio(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            kind: SignalKind::Audio,
        }
    }

    /// Control-voltage port.
    pub const fn control(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            kind: SignalKind::Control,
        }
    }
}

/// Read slot for one input port.
///
/// `Default` is a disconnected port at 0 V.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputPort {
    /// Whether a cable is plugged in.
    pub connected: bool,
    /// Instantaneous voltage. Meaningless when disconnected.
    pub voltage: f32,
}

impl InputPort {
    /// A connected port carrying `voltage`.
    #[inline]
    pub const fn connected(voltage: f32) -> Self {
        Self {
            connected: true,
            voltage,
        }
    }

    /// A disconnected port.
    #[inline]
    pub const fn disconnected() -> Self {
        Self {
            connected: false,
            voltage: 0.0,
        }
    }

    /// The voltage if connected, otherwise 0 V.
    #[inline]
    pub fn value(&self) -> f32 {
        if self.connected { self.voltage } else { 0.0 }
    }
}

/// Write slot for one output port.
///
/// `Default` is an inactive port holding 0 V.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputPort {
    /// Set by the host when something downstream reads this output.
    pub active: bool,
    /// Last voltage written by the module.
    pub voltage: f32,
}

impl OutputPort {
    /// An active output holding 0 V.
    #[inline]
    pub const fn active() -> Self {
        Self {
            active: true,
            voltage: 0.0,
        }
    }

    /// An inactive output holding 0 V.
    #[inline]
    pub const fn inactive() -> Self {
        Self {
            active: false,
            voltage: 0.0,
        }
    }
}

/// Object-safe trait for modules driven by a host once per sample.
///
/// # Real-Time Contract
///
/// [`process`](Self::process) runs on the audio thread. It must not
/// allocate, lock, block or perform I/O, and its cost must be bounded.
///
/// # Short Slices
///
/// Hosts may pass fewer slots than the module declares. Missing inputs read
/// as disconnected; missing outputs are inactive and never written.
///
/// # Example
///
/// ```rust
/// use diodering_core::{InputPort, Module, OutputPort, PortDescriptor};
///
/// struct Inverter;
///
/// impl Module for Inverter {
///     fn input_count(&self) -> usize { 1 }
///     fn output_count(&self) -> usize { 1 }
///     fn input_info(&self, index: usize) -> Option<PortDescriptor> {
///         (index == 0).then(|| PortDescriptor::audio("In", "in"))
///     }
///     fn output_info(&self, index: usize) -> Option<PortDescriptor> {
///         (index == 0).then(|| PortDescriptor::audio("Out", "out"))
///     }
///     fn process(&mut self, inputs: &[InputPort], outputs: &mut [OutputPort]) {
///         let x = inputs.first().map_or(0.0, InputPort::value);
///         if let Some(out) = outputs.first_mut() {
///             out.voltage = -x;
///         }
///     }
/// }
///
/// let mut outputs = [OutputPort::active()];
/// Inverter.process(&[InputPort::connected(2.0)], &mut outputs);
/// assert_eq!(outputs[0].voltage, -2.0);
/// ```
pub trait Module {
    /// Number of declared input ports.
    fn input_count(&self) -> usize;

    /// Number of declared output ports.
    fn output_count(&self) -> usize;

    /// Declaration of input `index`, `None` if out of range.
    fn input_info(&self, index: usize) -> Option<PortDescriptor>;

    /// Declaration of output `index`, `None` if out of range.
    fn output_info(&self, index: usize) -> Option<PortDescriptor>;

    /// Runs one sample tick.
    fn process(&mut self, inputs: &[InputPort], outputs: &mut [OutputPort]);

    /// Clears any internal signal state. Parameters are left untouched.
    ///
    /// Stateless modules keep the default no-op.
    fn reset(&mut self) {}

    /// Replaces the peak-voltage bounds applied to incoming signals.
    ///
    /// Modules without voltage-dependent clamping ignore this.
    fn set_voltage_limits(&mut self, _limits: VoltageLimits) {}

    /// Finds an input index by name or short name (case-insensitive).
    fn find_input(&self, name: &str) -> Option<usize> {
        (0..self.input_count()).find(|&i| {
            self.input_info(i).is_some_and(|p| {
                p.name.eq_ignore_ascii_case(name) || p.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds an output index by name or short name (case-insensitive).
    fn find_output(&self, name: &str) -> Option<usize> {
        (0..self.output_count()).find(|&i| {
            self.output_info(i).is_some_and(|p| {
                p.name.eq_ignore_ascii_case(name) || p.short_name.eq_ignore_ascii_case(name)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Adder;

    impl Module for Adder {
        fn input_count(&self) -> usize {
            2
        }

        fn output_count(&self) -> usize {
            1
        }

        fn input_info(&self, index: usize) -> Option<PortDescriptor> {
            match index {
                0 => Some(PortDescriptor::audio("Left", "l")),
                1 => Some(PortDescriptor::control("Right", "r")),
                _ => None,
            }
        }

        fn output_info(&self, index: usize) -> Option<PortDescriptor> {
            (index == 0).then(|| PortDescriptor::audio("Sum", "sum"))
        }

        fn process(&mut self, inputs: &[InputPort], outputs: &mut [OutputPort]) {
            let total: f32 = inputs.iter().map(InputPort::value).sum();
            if let Some(out) = outputs.first_mut() {
                out.voltage = total;
            }
        }
    }

    #[test]
    fn test_input_port_value() {
        assert_eq!(InputPort::connected(3.0).value(), 3.0);
        let unplugged = InputPort {
            connected: false,
            voltage: 3.0,
        };
        assert_eq!(unplugged.value(), 0.0);
        assert_eq!(InputPort::default(), InputPort::disconnected());
    }

    #[test]
    fn test_output_port_defaults() {
        assert!(!OutputPort::default().active);
        assert!(OutputPort::active().active);
        assert_eq!(OutputPort::inactive(), OutputPort::default());
    }

    #[test]
    fn test_find_ports() {
        let adder = Adder;
        assert_eq!(adder.find_input("left"), Some(0));
        assert_eq!(adder.find_input("R"), Some(1));
        assert_eq!(adder.find_input("x"), None);
        assert_eq!(adder.find_output("SUM"), Some(0));
        assert_eq!(adder.input_info(1).map(|p| p.kind), Some(SignalKind::Control));
    }

    #[test]
    fn test_boxed_dispatch() {
        let mut module: Box<dyn Module> = Box::new(Adder);
        let mut outputs = [OutputPort::active()];
        module.process(
            &[InputPort::connected(1.0), InputPort::connected(2.0)],
            &mut outputs,
        );
        assert_eq!(outputs[0].voltage, 3.0);
        module.reset();
        module.set_voltage_limits(VoltageLimits::default());
    }
}
