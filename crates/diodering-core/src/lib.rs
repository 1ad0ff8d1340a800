//! Diodering Core - diode model and host plumbing for analog ring modulation
//!
//! This crate provides the building blocks shared by every diodering module,
//! designed for per-sample processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Diode Model
//!
//! - [`Diode`] - Piecewise diode-pair transfer curve (zero, quadratic knee, linear)
//!
//! ## Host Boundary
//!
//! - [`Module`] - Object-safe per-sample processing trait
//! - [`InputPort`] / [`OutputPort`] - Per-tick read and write slots
//! - [`PortDescriptor`] - Port declarations for hosts
//! - [`ModuleWithParams`] - `Module` + parameter access behind one vtable
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - Index-based parameter discovery and control
//! - [`ParamDescriptor`] - Range, default, unit, IDs and switch labels
//! - [`ParamBank`] - Lock-free parameter staging for cross-thread updates
//!
//! ## Voltage Bounds
//!
//! - [`VoltageLimits`] - Audio and control peak-voltage clamps
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! diodering-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use diodering_core::{Diode, VoltageLimits};
//!
//! let limits = VoltageLimits::default();
//! let diode = Diode::new();
//!
//! let v = limits.clamp_audio(40.0);
//! assert_eq!(v, 12.0);
//! assert!(diode.apply(v) > 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod diode;
pub mod module;
pub mod module_with_params;
pub mod param_info;
pub mod shared;
pub mod voltage;

pub use diode::{DEFAULT_H, DEFAULT_VB, DEFAULT_VL_MINUS_VB, Diode, MAX_SHAPE_VOLTAGE};
pub use module::{InputPort, Module, OutputPort, PortDescriptor, SignalKind};
pub use module_with_params::ModuleWithParams;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use shared::ParamBank;
pub use voltage::{
    AUDIO_PEAK_VOLTAGE, CONTROL_PEAK_VOLTAGE, MAX_PEAK_VOLTAGE, VoltageLimits, clamp_voltage,
};
