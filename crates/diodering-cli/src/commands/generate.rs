//! Test signal generation command.

use clap::{Args, Subcommand, ValueEnum};
use diodering_io::{WavSpec, write_wav};
use std::f32::consts::TAU;
use std::path::PathBuf;

/// Waveform types for CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum CliWaveform {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a periodic tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.8")]
        amplitude: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Waveform shape
        #[arg(long, value_enum, default_value_t = CliWaveform::Sine)]
        waveform: CliWaveform,
    },

    /// Generate silence
    Silence {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            amplitude,
            sample_rate,
            waveform,
        } => {
            if !(freq.is_finite() && freq > 0.0) {
                anyhow::bail!("--freq must be positive");
            }
            let len = sample_count(duration, sample_rate)?;
            let samples = tone(waveform, freq, amplitude.clamp(0.0, 1.0), sample_rate, len);
            write_wav(&output, &samples, WavSpec::mono(sample_rate, 32))?;
            println!(
                "Generated {waveform:?} {freq} Hz, {duration}s -> {}",
                output.display()
            );
        }
        GenerateCommand::Silence {
            output,
            duration,
            sample_rate,
        } => {
            let len = sample_count(duration, sample_rate)?;
            write_wav(&output, &vec![0.0; len], WavSpec::mono(sample_rate, 32))?;
            println!("Generated {duration}s of silence -> {}", output.display());
        }
    }
    Ok(())
}

fn sample_count(duration: f32, sample_rate: u32) -> anyhow::Result<usize> {
    if sample_rate == 0 {
        anyhow::bail!("--sample-rate must be non-zero");
    }
    if !(duration.is_finite() && duration >= 0.0) {
        anyhow::bail!("--duration must be a non-negative number of seconds");
    }
    Ok((f64::from(duration) * f64::from(sample_rate)).round() as usize)
}

fn tone(waveform: CliWaveform, freq: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    let increment = f64::from(freq) / f64::from(sample_rate);
    (0..len)
        .map(|n| {
            let phase = (n as f64 * increment).fract() as f32;
            let value = match waveform {
                CliWaveform::Sine => (TAU * phase).sin(),
                CliWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
                CliWaveform::Saw => 2.0 * phase - 1.0,
                CliWaveform::Square => {
                    if phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
            };
            value * amplitude
        })
        .collect()
}
