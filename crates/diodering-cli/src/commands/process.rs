//! Offline ring-modulation command.

use crate::commands::common::{linear_to_db, parse_key_val, peak, preset_with_overrides, rms};
use clap::Args;
use diodering_config::validate_preset;
use diodering_io::{OfflineHost, SampleEncoding, WavSpec, read_wav, read_wav_at_rate, write_wav};
use diodering_registry::ModuleRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Signal to modulate (WAV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Carrier signal (WAV, same sample rate)
    #[arg(value_name = "CARRIER")]
    carrier: PathBuf,

    /// Directory for the rendered outputs (one WAV per output)
    #[arg(short, long, value_name = "DIR")]
    out_dir: PathBuf,

    /// Carrier offset CV (WAV, same sample rate)
    #[arg(long, value_name = "FILE")]
    cv: Option<PathBuf>,

    /// Preset name or path
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override, applied after the preset (e.g., "diode_vb=0.3V")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Outputs to render
    #[arg(long, value_delimiter = ',', default_value = "ring")]
    outputs: Vec<String>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,

    /// Volts per full-scale file unit
    #[arg(long, default_value = "5.0")]
    volts_per_unit: f32,

    /// Reject out-of-range preset values instead of clamping them
    #[arg(long)]
    strict: bool,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    s.parse::<u16>()
        .ok()
        .and_then(SampleEncoding::from_bits)
        .map(SampleEncoding::bits)
        .ok_or_else(|| format!("unsupported bit depth '{s}' (expected 16, 24 or 32)"))
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let preset = preset_with_overrides(args.preset.as_deref(), &args.param)?;
    if args.strict {
        validate_preset(&preset)?;
    }
    let module = preset.instantiate(&ModuleRegistry::new())?;
    println!("Preset: {} ({})", preset.name, preset.module);

    println!("Reading {}...", args.input.display());
    let (mut input, spec) = read_wav(&args.input)?;
    let sample_rate = spec.sample_rate;
    println!("Reading {}...", args.carrier.display());
    let mut carrier = read_wav_at_rate(&args.carrier, sample_rate)?;
    let mut cv = match &args.cv {
        Some(path) => {
            println!("Reading {}...", path.display());
            Some(read_wav_at_rate(path, sample_rate)?)
        }
        None => None,
    };

    // a file that runs out behaves like a silent cable
    let len = input
        .len()
        .max(carrier.len())
        .max(cv.as_ref().map_or(0, Vec::len));
    for buffer in [Some(&mut input), Some(&mut carrier), cv.as_mut()]
        .into_iter()
        .flatten()
    {
        if buffer.len() < len {
            tracing::info!(from = buffer.len(), to = len, "padding shorter file with silence");
            buffer.resize(len, 0.0);
        }
    }

    println!(
        "  {} samples, {} Hz, {:.2}s",
        len,
        sample_rate,
        len as f32 / sample_rate as f32
    );

    let mut host = OfflineHost::new(module, sample_rate).with_volts_per_unit(args.volts_per_unit);
    host.connect_input_by_name("in", input)?;
    host.connect_input_by_name("carrier", carrier)?;
    if let Some(cv) = cv {
        host.connect_input_by_name("offset", cv)?;
    }

    let mut selected = Vec::with_capacity(args.outputs.len());
    for name in &args.outputs {
        let index = host
            .module()
            .find_output(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown output '{name}'"))?;
        host.set_output_active(index, true)?;
        if !selected.contains(&index) {
            selected.push(index);
        }
    }
    if selected.is_empty() {
        anyhow::bail!("No outputs selected. Use --outputs ring,sum,diff,min,max");
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let rendered = host.run_with_progress(len, |done| pb.set_position(done as u64))?;
    pb.finish_with_message("done");

    std::fs::create_dir_all(&args.out_dir)?;
    let out_spec = WavSpec::mono(sample_rate, args.bit_depth);

    println!("\nOutputs:");
    for index in selected {
        let short_name = host
            .module()
            .output_info(index)
            .map_or("out", |p| p.short_name);
        let samples = &rendered[index];
        let path = args.out_dir.join(format!("{short_name}.wav"));
        write_wav(&path, samples, out_spec)?;
        println!(
            "  {:5} RMS {:6.1} dB, Peak {:6.1} dB -> {}",
            short_name,
            linear_to_db(rms(samples)),
            linear_to_db(peak(samples)),
            path.display()
        );
    }

    println!("\nDone!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bit_depth() {
        assert_eq!(parse_bit_depth("16"), Ok(16));
        assert_eq!(parse_bit_depth("24"), Ok(24));
        assert_eq!(parse_bit_depth("32"), Ok(32));
        assert!(parse_bit_depth("8").is_err());
        assert!(parse_bit_depth("float").is_err());
    }
}
