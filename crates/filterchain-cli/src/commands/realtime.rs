//! Real-time audio processing command.

use clap::Args;
use filterchain_config::parse_control_assignment;
use filterchain_graph::{GraphBuilder, GraphDescription, GraphPlanner, PlanParams};
use filterchain_io::{AudioStream, RealtimeEngine, StreamConfig, default_device, find_device_by_index, find_device_fuzzy};
use filterchain_registry::PluginRegistry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use super::common::{load_preset, parse_key_val};

#[derive(Args)]
pub struct RealtimeArgs {
    /// Graph description file (JSON)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Preset name or path (supports factory presets, user presets, and file paths)
    #[arg(short, long)]
    preset: Option<String>,

    /// Control-port assignment (e.g., "lp:Freq=400Hz" or "Gain=-6dB")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Input device (index, exact name, or partial name)
    #[arg(short, long, alias = "input-device")]
    input: Option<String>,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long, alias = "output-device")]
    output: Option<String>,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Buffer size
    #[arg(long, default_value = "256")]
    buffer_size: u32,

    /// Force mono processing (single-channel graph, one device channel)
    #[arg(long)]
    mono: bool,
}

pub fn run(args: RealtimeArgs) -> anyhow::Result<()> {
    let description = load_graph_description(&args)?;
    let sample_rate = args.sample_rate as f32;
    let channels = if args.mono { 1 } else { 2 };

    let registry = PluginRegistry::new();
    let draft = GraphBuilder::new(&registry).build(&description).map_err(|e| anyhow::anyhow!("{e}"))?;
    let graph = GraphPlanner::new(&registry)
        .plan(draft, PlanParams { sample_rate, capture_channels: channels, playback_channels: channels })
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    for (name, value) in &args.param {
        let (reference, numeric) = parse_control_assignment(&format!("{name}={value}"))
            .ok_or_else(|| anyhow::anyhow!("invalid control value '{value}' for '{name}'"))?;
        graph.apply_update(&[(reference.to_string(), serde_json::json!(numeric))]);
    }

    let mut engine = RealtimeEngine::new(graph);

    // Resolve device names from index or partial match, for display purposes.
    let (default_input, default_output) = default_device()?;

    let input_name = match &args.input {
        Some(spec) => resolve_device_name(spec),
        None => default_input.map(|d| d.name).unwrap_or_else(|| "none".to_string()),
    };

    let output_name = match &args.output {
        Some(spec) => resolve_device_name(spec),
        None => default_output.map(|d| d.name).unwrap_or_else(|| "none".to_string()),
    };

    let mode = if args.mono { "mono" } else { "stereo" };
    println!("Real-time {} processing", mode);
    println!("  Input:  {}", input_name);
    println!("  Output: {}", output_name);
    println!("  Sample rate: {} Hz", args.sample_rate);
    println!("  Buffer size: {} samples", args.buffer_size);
    println!("\nPress Ctrl+C to stop...\n");

    let config = StreamConfig {
        sample_rate: args.sample_rate,
        buffer_size: args.buffer_size,
        input_device: args.input.clone(),
        output_device: args.output.clone(),
    };

    let mut stream = AudioStream::new(config)?;

    let running = stream.running_handle();
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        running.store(false, Ordering::SeqCst);
    })?;

    stream.run(move |capture, playback| {
        engine.process_interleaved(capture, playback);
    })?;

    println!("Done!");
    Ok(())
}

/// Look a device spec (index or partial name) up just to print its full
/// name; the raw spec is still what's passed to [`StreamConfig`] since
/// `AudioStream` resolves by exact name only.
fn resolve_device_name(spec: &str) -> String {
    if let Ok(device) = find_device_fuzzy(spec) {
        return device.name;
    }
    if let Ok(idx) = spec.parse::<usize>()
        && let Ok(device) = find_device_by_index(idx)
    {
        return device.name;
    }
    spec.to_string()
}

fn load_graph_description(args: &RealtimeArgs) -> anyhow::Result<GraphDescription> {
    match (&args.graph, &args.preset) {
        (Some(_), Some(_)) => anyhow::bail!("specify only one of --graph or --preset"),
        (Some(path), None) => {
            let json = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        (None, Some(name)) => {
            let preset = load_preset(name)?;
            println!("Loading preset: {}", preset.name);
            Ok(preset.graph)
        }
        (None, None) => anyhow::bail!("no graph specified; use --graph or --preset"),
    }
}
