//! Preset and configuration demo: factory presets, control-value parsing,
//! and pre-flight validation.
//!
//! Run with: cargo run -p filterchain-config --example preset_demo

use filterchain_config::{Preset, factory_preset_names, get_factory_preset, is_factory_preset, parse_param_value, validate_description};
use filterchain_registry::PluginRegistry;

fn main() {
    println!("=== Control Value Parsing ===\n");

    let test_values = [
        ("0.5", "plain number"),
        ("50%", "percentage"),
        ("-6dB", "decibels"),
        ("100ms", "milliseconds"),
        ("1.5s", "seconds"),
        ("440Hz", "hertz"),
        ("1.2kHz", "kilohertz"),
    ];

    println!("{:<12} {:<18} {:>10}", "Input", "Type", "Parsed");
    println!("{:-<12} {:-<18} {:->10}", "", "", "");
    for (input, desc) in &test_values {
        let parsed = parse_param_value(input).unwrap();
        println!("{input:<12} {desc:<18} {parsed:>10.4}");
    }

    println!("\n=== Factory Presets ===\n");

    let names = factory_preset_names();
    println!("Available factory presets: {}", names.len());
    for name in names {
        let preset = get_factory_preset(name).unwrap();
        println!(
            "  {:<22} - {} ({} node(s))",
            name,
            preset.description.as_deref().unwrap_or(""),
            preset.len()
        );
    }

    println!("\nIs 'lowpass_400hz' a factory preset? {}", is_factory_preset("lowpass_400hz"));
    println!("Is 'my_custom' a factory preset? {}", is_factory_preset("my_custom"));

    println!("\n=== Building and Validating a Preset ===\n");

    let registry = PluginRegistry::new();
    let preset = get_factory_preset("highpass_lowpass_split").unwrap();
    match validate_description(&preset.graph, &registry) {
        Ok(()) => println!("'{}' validates cleanly against the builtin catalog.", preset.name),
        Err(e) => println!("'{}' failed validation: {e}", preset.name),
    }

    println!("\n=== Round-Tripping a Preset Through JSON ===\n");

    let custom = Preset::new("demo_mix", get_factory_preset("stereo_mixdown").unwrap().graph)
        .with_description("A copy of stereo_mixdown under a new name")
        .with_sample_rate(44100);

    let json = custom.to_json().unwrap();
    println!("{json}");

    let reloaded = Preset::from_json(&json).unwrap();
    assert_eq!(reloaded.name, custom.name);
    println!("\nRound-trip OK: '{}' has {} node(s).", reloaded.name, reloaded.len());
}
