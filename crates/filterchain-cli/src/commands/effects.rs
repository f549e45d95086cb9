//! Built-in plugin catalog listing and descriptor detail.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use filterchain_registry::{BUILTIN_TAG, PluginRegistry, builtin};

#[derive(Args)]
pub struct EffectsArgs {
    /// Show port and parameter details for a specific label
    #[arg(value_name = "LABEL")]
    label: Option<String>,

    /// Show example commands
    #[arg(long)]
    examples: bool,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = PluginRegistry::new();

    if let Some(label) = &args.label {
        let descriptor = registry
            .descriptor(BUILTIN_TAG, BUILTIN_TAG, label)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        println!("{label}");
        println!("{}", "=".repeat(label.len()));
        println!();

        println!("Audio inputs:");
        for port in descriptor.audio_inputs() {
            println!("  [{}] {}", port.index, port.name);
        }
        println!();
        println!("Audio outputs:");
        for port in descriptor.audio_outputs() {
            println!("  [{}] {}", port.index, port.name);
        }

        let controls: Vec<_> = descriptor.control_inputs().collect();
        if !controls.is_empty() {
            println!();
            println!("Control inputs:");
            println!(
                "  {:16}  {:10}  {:10}  {:10}",
                "Name", "Default", "Min", "Max"
            );
            for port in controls {
                println!(
                    "  {:16}  {:<10}  {:<10}  {:<10}",
                    port.name, port.default, port.min, port.max
                );
            }
        }

        println!();
        println!("Example node in a graph description:");
        println!("  {{ \"type\": \"builtin\", \"name\": \"n\", \"label\": \"{label}\" }}");
    } else {
        println!("Built-in Plugin Catalog");
        println!("=======================");
        println!();

        for label in builtin::catalog() {
            println!("  {label}");
        }

        println!();
        println!("Use 'filterchain effects <label>' for port and parameter details.");

        if args.examples {
            println!();
            println!("Example Commands");
            println!("----------------");
            println!();
            println!("  # Describe a single label");
            println!("  filterchain effects bq_lowpass");
            println!();
            println!("  # Process a file through a graph description");
            println!("  filterchain process input.wav output.wav --graph chain.json");
            println!();
            println!("  # Process a file through a factory preset");
            println!("  filterchain process input.wav output.wav --preset slapback_delay");
            println!();
            println!("  # Real-time processing");
            println!("  filterchain realtime --preset lowpass_400hz");
            println!();
            println!("  # List factory and user presets");
            println!("  filterchain presets list");
        } else {
            println!("Use 'filterchain effects --examples' for example commands.");
        }
    }

    Ok(())
}
