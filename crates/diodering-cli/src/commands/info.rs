//! Module parameter and port listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use diodering_core::{ModuleWithParams, ParamFlags, SignalKind};
use diodering_registry::ModuleRegistry;

#[derive(Args)]
pub struct InfoArgs {
    /// Module slug
    #[arg(value_name = "MODULE", default_value = "RingModulator")]
    module: String,

    /// Print machine-readable JSON instead of tables
    #[arg(long)]
    json: bool,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let registry = ModuleRegistry::new();
    let descriptor = registry
        .get(&args.module)
        .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", args.module))?;
    let module = registry
        .create(descriptor.slug)
        .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", args.module))?;

    if args.json {
        let json = serde_json::json!({
            "slug": descriptor.slug,
            "name": descriptor.name,
            "description": descriptor.description,
            "tags": descriptor.tags.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "params": params_json(module.as_ref()),
            "inputs": ports_json(module.as_ref(), true),
            "outputs": ports_json(module.as_ref(), false),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", descriptor.name);
    println!("{}", "=".repeat(descriptor.name.len()));
    println!();
    println!("{}", descriptor.description);
    println!();

    println!("Parameters:");
    println!();
    println!(
        "  {:18}  {:16}  {:10}  {}",
        "Key", "Name", "Default", "Range"
    );
    println!(
        "  {:18}  {:16}  {:10}  {}",
        "---", "----", "-------", "-----"
    );
    for index in 0..module.module_param_count() {
        let Some(desc) = module.module_param_info(index) else {
            continue;
        };
        let range = if desc.step_labels.is_empty() {
            format!("{} .. {}", desc.format_value(desc.min), desc.format_value(desc.max))
        } else {
            desc.step_labels.join(" | ")
        };
        println!(
            "  {:18}  {:16}  {:10}  {}",
            desc.string_id,
            desc.name,
            desc.format_value(desc.default),
            range
        );
    }

    println!();
    println!("Inputs:");
    for index in 0..module.input_count() {
        if let Some(port) = module.input_info(index) {
            println!("  {:8}  {:18}  {}", port.short_name, port.name, kind_name(port.kind));
        }
    }
    println!();
    println!("Outputs:");
    for index in 0..module.output_count() {
        if let Some(port) = module.output_info(index) {
            println!("  {:8}  {:18}  {}", port.short_name, port.name, kind_name(port.kind));
        }
    }

    println!();
    println!("Example usage:");
    println!();
    println!(
        "  diodering process voice.wav sine.wav -o out --outputs ring,sum --param diode_vb=0.3V"
    );

    Ok(())
}

fn kind_name(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::Audio => "audio",
        SignalKind::Control => "control",
    }
}

fn params_json(module: &(dyn ModuleWithParams + Send)) -> Vec<serde_json::Value> {
    (0..module.module_param_count())
        .filter_map(|index| module.module_param_info(index))
        .map(|desc| {
            serde_json::json!({
                "id": desc.id.0,
                "key": desc.string_id,
                "name": desc.name,
                "short_name": desc.short_name,
                "group": desc.group,
                "unit": desc.unit.suffix().trim(),
                "min": desc.min,
                "max": desc.max,
                "default": desc.default,
                "stepped": desc.flags.contains(ParamFlags::STEPPED),
                "labels": desc.step_labels,
            })
        })
        .collect()
}

fn ports_json(module: &(dyn ModuleWithParams + Send), inputs: bool) -> Vec<serde_json::Value> {
    let count = if inputs {
        module.input_count()
    } else {
        module.output_count()
    };
    (0..count)
        .filter_map(|index| {
            if inputs {
                module.input_info(index)
            } else {
                module.output_info(index)
            }
        })
        .map(|port| {
            serde_json::json!({
                "name": port.name,
                "short_name": port.short_name,
                "kind": kind_name(port.kind),
            })
        })
        .collect()
}
