//! File I/O and offline rendering for diodering modules.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading and saving
//!   mono audio
//! - **Offline host**: [`OfflineHost`] drives any boxed module sample by
//!   sample from whole-file buffers, the way a modular rack would in real time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use diodering_io::{OfflineHost, read_wav, write_wav};
//! use diodering_modules::RingModulator;
//!
//! let (input, spec) = read_wav("voice.wav")?;
//! let (carrier, _) = read_wav("sine.wav")?;
//!
//! let mut host = OfflineHost::new(Box::new(RingModulator::new()), spec.sample_rate);
//! host.connect_input_by_name("in", input)?;
//! host.connect_input_by_name("carrier", carrier)?;
//! host.set_output_active_by_name("ring", true)?;
//!
//! let outputs = host.render()?;
//! write_wav("ring.wav", &outputs[0], spec)?;
//! ```

mod host;
mod wav;

pub use host::{DEFAULT_VOLTS_PER_UNIT, OfflineHost, PROGRESS_INTERVAL};
pub use wav::{SampleEncoding, WavSpec, read_wav, read_wav_at_rate, write_wav};

/// Error types for I/O and offline rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connected input buffers disagree on length.
    #[error("input '{port}' has {found} samples, expected {expected}")]
    LengthMismatch {
        /// Short name of the offending input port.
        port: String,
        /// Required length.
        expected: usize,
        /// Length of the offending buffer.
        found: usize,
    },

    /// Output bit depth other than 16, 24 or 32.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Port name or index not declared by the module.
    #[error("unknown port: {0}")]
    UnknownPort(String),

    /// A file's sample rate differs from the session rate.
    #[error("'{path}' is {found} Hz, expected {expected} Hz")]
    SampleRateMismatch {
        /// File that was read.
        path: String,
        /// Session sample rate.
        expected: u32,
        /// Sample rate of the file.
        found: u32,
    },
}

/// Convenience result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
