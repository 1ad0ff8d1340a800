//! Mono WAV files in and out of the offline host.
//!
//! Reading yields normalized `f32` samples: integer PCM is divided by its
//! full-scale code and multi-channel files are averaged down to one channel.
//! Writing supports three encodings, picked from the bit depth
//! ([`SampleEncoding`]).

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::{Error, Result};

/// Sample encoding of a written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// 16-bit integer PCM.
    Pcm16,
    /// 24-bit integer PCM.
    Pcm24,
    /// 32-bit IEEE float, unclamped.
    Float32,
}

impl SampleEncoding {
    /// Encoding for a bit depth. `None` unless 16, 24 or 32.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(Self::Pcm16),
            24 => Some(Self::Pcm24),
            32 => Some(Self::Float32),
            _ => None,
        }
    }

    /// Bits per sample.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Pcm16 => 16,
            Self::Pcm24 => 24,
            Self::Float32 => 32,
        }
    }

    const fn sample_format(self) -> SampleFormat {
        match self {
            Self::Float32 => SampleFormat::Float,
            Self::Pcm16 | Self::Pcm24 => SampleFormat::Int,
        }
    }
}

/// Layout of a WAV file: channel count, sample rate, bit depth.
///
/// Files written by diodering are always mono; see [`WavSpec::mono`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::mono(48_000, SampleEncoding::Float32.bits())
    }
}

impl WavSpec {
    /// Single-channel layout.
    pub const fn mono(sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Encoding used when writing with this layout, if the bit depth is supported.
    pub const fn encoding(&self) -> Option<SampleEncoding> {
        SampleEncoding::from_bits(self.bits_per_sample)
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(header: hound::WavSpec) -> Self {
        Self {
            channels: header.channels,
            sample_rate: header.sample_rate,
            bits_per_sample: header.bits_per_sample,
        }
    }
}

/// Largest magnitude of a signed integer code at `bits`.
fn full_scale(bits: u16) -> f32 {
    2f32.powi(i32::from(bits.clamp(1, 32)) - 1)
}

/// Integer code for a normalized sample, saturating at full scale. NaN maps to 0.
fn quantize(sample: f32, scale: f32) -> i32 {
    (sample * scale).clamp(-scale, scale - 1.0) as i32
}

fn decode<R: Read>(reader: WavReader<R>, header: hound::WavSpec) -> Result<Vec<f32>> {
    let samples = match header.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        SampleFormat::Int => {
            let gain = full_scale(header.bits_per_sample).recip();
            reader
                .into_samples::<i32>()
                .map(|code| code.map(|c| c as f32 * gain))
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
        }
    };
    Ok(samples)
}

/// Averages interleaved frames into one channel. A trailing partial frame is dropped.
fn mix_to_mono(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    let gain = (channels as f32).recip();
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * gain)
        .collect()
}

/// Reads a WAV file as mono `f32` samples plus its original layout.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let header = reader.spec();
    let spec = WavSpec::from(header);
    let mono = mix_to_mono(decode(reader, header)?, usize::from(spec.channels));

    tracing::debug!(
        path = %path.display(),
        frames = mono.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "read wav"
    );
    Ok((mono, spec))
}

/// Reads a WAV file that must already be at `sample_rate`.
///
/// # Errors
///
/// [`Error::SampleRateMismatch`] if the file's rate differs.
pub fn read_wav_at_rate<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let (samples, spec) = read_wav(path)?;
    if spec.sample_rate != sample_rate {
        return Err(Error::SampleRateMismatch {
            path: path.display().to_string(),
            expected: sample_rate,
            found: spec.sample_rate,
        });
    }
    Ok(samples)
}

/// Writes interleaved samples.
///
/// Integer encodings saturate at full scale; float samples are written as is.
///
/// # Errors
///
/// [`Error::UnsupportedBitDepth`] unless `spec.bits_per_sample` is 16, 24 or 32.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let path = path.as_ref();
    let encoding = spec
        .encoding()
        .ok_or(Error::UnsupportedBitDepth(spec.bits_per_sample))?;
    let header = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: encoding.bits(),
        sample_format: encoding.sample_format(),
    };
    let mut writer = WavWriter::create(path, header)?;

    match encoding {
        SampleEncoding::Float32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        SampleEncoding::Pcm16 | SampleEncoding::Pcm24 => {
            let scale = full_scale(encoding.bits());
            for &sample in samples {
                writer.write_sample(quantize(sample, scale))?;
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(path = %path.display(), samples = samples.len(), ?encoding, "wrote wav");
    Ok(())
}
