//! Preset management commands.

use crate::commands::common::{load_preset, parse_key_val, preset_with_overrides};
use clap::{Args, Subcommand};
use diodering_config::{
    Preset, ensure_user_presets_dir, factory_presets, list_all_presets, preset_name_from_path,
    system_presets_dir, user_presets_dir, validate_preset,
};
use diodering_registry::ModuleRegistry;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory, user and system)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only presets found on disk
        #[arg(long)]
        user: bool,
    },

    /// Show a preset's parameters as they apply to its module
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a preset to the user presets directory
    Save {
        /// Name for the new preset (also the file name)
        name: String,

        /// Start from an existing preset
        #[arg(long)]
        from: Option<String>,

        /// Parameter value (e.g., "diode_h=0.7")
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            from,
            param,
            description,
            force,
        } => save_preset(&name, from.as_deref(), &param, description.as_deref(), force),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if !factory_only {
        println!("Saved Presets:");
        println!("==============");
        let on_disk = list_all_presets();
        if on_disk.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: diodering presets save <name> --param key=value");
        } else {
            for path in on_disk {
                let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {name:20} - {desc}");
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                        println!("  {name:20} - (error loading)");
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();
    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
    }
    println!("Module:      {}", preset.module);
    let limits = preset.voltage_limits();
    println!(
        "Limits:      audio ±{} V, control ±{} V",
        limits.audio_peak(),
        limits.control_peak()
    );
    println!();

    let module = preset.instantiate(&ModuleRegistry::new())?;
    println!("Parameters:");
    for index in 0..module.module_param_count() {
        let Some(desc) = module.module_param_info(index) else {
            continue;
        };
        let marker = if preset
            .params
            .keys()
            .any(|k| module.module_find_param(k) == Some(index))
        {
            "*"
        } else {
            " "
        };
        println!(
            "  {marker} {:18} = {}",
            desc.string_id,
            desc.format_value(module.module_get_param(index))
        );
    }
    println!();
    println!("  (* set by preset)");

    match validate_preset(&preset) {
        Ok(()) => println!("\nValidation: ok"),
        Err(e) => println!("\nValidation: {e}"),
    }
    Ok(())
}

fn save_preset(
    name: &str,
    from: Option<&str>,
    params: &[(String, String)],
    description: Option<&str>,
    force: bool,
) -> anyhow::Result<()> {
    let dir = ensure_user_presets_dir()?;
    let path = dir.join(format!("{name}.toml"));
    if path.exists() && !force {
        anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
    }

    let mut preset = preset_with_overrides(from, params)?;
    preset.name = name.to_string();
    if let Some(desc) = description {
        preset.description = Some(desc.to_string());
    }
    validate_preset(&preset)?;

    preset.save(&path)?;
    println!("Saved preset '{name}' to {}", path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("User presets:   {}", user_presets_dir().display());
    println!("System presets: {}", system_presets_dir().display());
    Ok(())
}
