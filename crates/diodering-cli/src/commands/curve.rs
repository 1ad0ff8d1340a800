//! Diode transfer-curve dump.

use clap::Args;
use diodering_core::{DEFAULT_H, DEFAULT_VB, DEFAULT_VL_MINUS_VB, Diode};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args)]
pub struct CurveArgs {
    /// Forward-bias voltage Vb
    #[arg(long, default_value_t = DEFAULT_VB, allow_hyphen_values = true)]
    vb: f32,

    /// Knee width Vl - Vb
    #[arg(long, default_value_t = DEFAULT_VL_MINUS_VB, allow_hyphen_values = true)]
    vl_minus_vb: f32,

    /// Linear-region slope h
    #[arg(long, default_value_t = DEFAULT_H, allow_hyphen_values = true)]
    h: f32,

    /// First voltage
    #[arg(long, default_value = "-1.0", allow_hyphen_values = true)]
    from: f32,

    /// Last voltage
    #[arg(long, default_value = "5.0", allow_hyphen_values = true)]
    to: f32,

    /// Number of points (at least 2)
    #[arg(long, default_value = "61")]
    steps: usize,

    /// Write CSV to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CurveArgs) -> anyhow::Result<()> {
    if args.steps < 2 {
        anyhow::bail!("--steps must be at least 2");
    }
    if !(args.from.is_finite() && args.to.is_finite()) {
        anyhow::bail!("--from and --to must be finite");
    }

    let diode = Diode::with_shape(args.vb, args.vl_minus_vb, args.h);
    tracing::debug!(
        vb = diode.vb(),
        vl = diode.vl(),
        h = diode.h(),
        "curve diode shape"
    );

    let csv = curve_csv(&diode, args.from, args.to, args.steps);
    match &args.output {
        Some(path) => {
            std::fs::write(path, csv)?;
            println!("Wrote {} points to {}", args.steps, path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn curve_csv(diode: &Diode, from: f32, to: f32, steps: usize) -> String {
    let mut csv = String::from("voltage,output\n");
    let span = to - from;
    let last = (steps - 1) as f32;
    for i in 0..steps {
        let v = from + span * (i as f32 / last);
        // writing to a String cannot fail
        let _ = writeln!(csv, "{v:.6},{:.6}", diode.apply(v));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_csv_shape() {
        let csv = curve_csv(&Diode::new(), 0.0, 1.0, 3);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "voltage,output");
        assert_eq!(lines[1], "0.000000,0.000000");
        assert!(lines[3].starts_with("1.000000,"));
    }

    #[test]
    fn test_curve_csv_endpoints_exact() {
        let diode = Diode::new();
        let csv = curve_csv(&diode, -2.0, 4.0, 7);
        let last = csv.lines().last().unwrap();
        assert_eq!(last, format!("4.000000,{:.6}", diode.apply(4.0)));
    }
}
