//! Preset management commands.
//!
//! Provides commands to list, show, save, and manage graph presets.

use clap::{Args, Subcommand};
use filterchain_config::{
    Preset, ensure_user_presets_dir, factory_presets, find_preset as config_find_preset, get_factory_preset,
    list_user_presets, system_presets_dir, user_config_dir, user_presets_dir, validate_description,
};
use filterchain_registry::PluginRegistry;
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a graph description file as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Graph description file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Sample rate hint to store with the preset
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Delete a user preset
    Delete {
        /// Preset name to delete
        name: String,

        /// Don't ask for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (optional, uses source name if not specified)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save { name, graph, description, sample_rate, force } => {
            save_preset(&name, &graph, description.as_deref(), sample_rate, force)
        }
        PresetsCommand::Delete { name, force } => delete_preset(&name, force),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:24} - {} ({} node(s))", preset.name, desc, preset.len());
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: filterchain presets save <name> --graph <path.json>\n");
        } else {
            for path in user_presets {
                let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown");

                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {:24} - {} ({} node(s))", name, desc, preset.len());
                    }
                    Err(_) => {
                        println!("  {:24} - (error loading)", name);
                    }
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = find_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {}", desc);
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!();

    println!("Nodes ({}):", preset.graph.nodes.len());
    for node in &preset.graph.nodes {
        println!("  {} ({}:{})", node.name, node.family, node.label);
        if !node.control.is_empty() {
            for (port, value) in &node.control {
                println!("      {} = {}", port, value);
            }
        }
    }

    println!();
    println!("Links ({}):", preset.graph.links.len());
    for link in &preset.graph.links {
        println!("  {} -> {}", link.output, link.input);
    }

    Ok(())
}

fn save_preset(
    name: &str,
    graph_path: &std::path::Path,
    description: Option<&str>,
    sample_rate: u32,
    force: bool,
) -> anyhow::Result<()> {
    ensure_user_presets_dir()?;

    let preset_path = user_presets_dir().join(format!("{}.json", name));
    if preset_path.exists() && !force {
        anyhow::bail!("Preset '{}' already exists. Use --force to overwrite.", name);
    }

    let json = std::fs::read_to_string(graph_path)?;
    let description_graph: filterchain_graph::GraphDescription = serde_json::from_str(&json)?;

    let registry = PluginRegistry::new();
    validate_description(&description_graph, &registry).map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut preset = Preset::new(name, description_graph).with_sample_rate(sample_rate);
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }

    preset.save(&preset_path)?;
    println!("Saved preset '{}' to {}", name, preset_path.display());
    Ok(())
}

fn delete_preset(name: &str, force: bool) -> anyhow::Result<()> {
    if get_factory_preset(name).is_some() {
        anyhow::bail!("Cannot delete factory preset '{}'. Factory presets are built-in.", name);
    }

    let preset_path = user_presets_dir().join(format!("{}.json", name));
    if !preset_path.exists() {
        anyhow::bail!("User preset '{}' not found.", name);
    }

    if !force {
        anyhow::bail!("Use --force to confirm deletion of preset '{}'.", name);
    }

    std::fs::remove_file(&preset_path)?;
    println!("Deleted preset '{}'.", name);
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let preset = get_factory_preset(source).ok_or_else(|| anyhow::anyhow!("Factory preset '{}' not found.", source))?;

    let target_name = new_name.unwrap_or(source);
    ensure_user_presets_dir()?;

    let preset_path = user_presets_dir().join(format!("{}.json", target_name));
    if preset_path.exists() {
        anyhow::bail!(
            "Preset '{}' already exists in user presets. Choose a different name with --name.",
            target_name
        );
    }

    let mut new_preset = Preset::new(target_name, preset.graph.clone()).with_sample_rate(preset.sample_rate);
    if let Some(desc) = &preset.description {
        new_preset = new_preset.with_description(format!("{} (copy)", desc));
    }

    new_preset.save(&preset_path)?;
    println!("Copied factory preset '{}' to user preset '{}'", source, target_name);
    println!("Path: {}", preset_path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("Preset Directories:");
    println!("===================");
    println!();
    println!("User presets:   {}", user_presets_dir().display());
    println!("System presets: {}", system_presets_dir().display());
    println!("Config dir:     {}", user_config_dir().display());
    Ok(())
}

fn find_preset(name: &str) -> anyhow::Result<Preset> {
    let path = PathBuf::from(name);
    if path.exists() {
        return Preset::load(&path).map_err(|e| anyhow::anyhow!("{}", e));
    }

    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    if let Some(path) = config_find_preset(name) {
        return Preset::load(&path).map_err(|e| anyhow::anyhow!("{}", e));
    }

    anyhow::bail!("Preset '{}' not found.", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_presets_load_and_validate() {
        let registry = PluginRegistry::new();
        for preset in factory_presets() {
            validate_description(&preset.graph, &registry).unwrap_or_else(|e| panic!("{}: {e}", preset.name));
        }
    }

    #[test]
    fn find_preset_resolves_factory_names_first() {
        let preset = find_preset("mono_passthrough").unwrap();
        assert_eq!(preset.name, "mono_passthrough");
    }

    #[test]
    fn find_preset_rejects_unknown_names() {
        assert!(find_preset("definitely_not_a_preset_xyz").is_err());
    }
}
