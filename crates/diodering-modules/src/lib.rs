//! Diodering Modules - the diode ring modulator kernel
//!
//! - [`RingModulator`] - Five-output analog-modeled ring modulator
//! - [`Polarity`] - Negative / bipolar / positive stage switch
//!
//! The kernel is usable directly through [`RingModulator::step`] with typed
//! [`RingInputs`], [`RingParams`] and [`RingOutputs`], or through the
//! [`Module`](diodering_core::Module) and
//! [`ParameterInfo`](diodering_core::ParameterInfo) traits when driven by a
//! generic host.
//!
//! ## Example
//!
//! ```rust
//! use diodering_core::{InputPort, Module, OutputPort};
//! use diodering_modules::RingModulator;
//!
//! let mut ring = RingModulator::new();
//! let inputs = [InputPort::connected(1.0), InputPort::connected(-2.0)];
//! let mut outputs = [OutputPort::active(); 5];
//! ring.process(&inputs, &mut outputs);
//! assert!(outputs.iter().all(|o| o.voltage.is_finite()));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod polarity;
pub mod ring_modulator;

pub use polarity::Polarity;
pub use ring_modulator::{
    RING_INPUT_COUNT, RING_OUTPUT_COUNT, RING_PARAM_COUNT, RingInput, RingInputs, RingModulator,
    RingOutput, RingOutputs, RingParam, RingParams,
};
