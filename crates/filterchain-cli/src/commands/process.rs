//! File-based graph processing command.

use clap::Args;
use filterchain_config::parse_control_assignment;
use filterchain_graph::{Graph, GraphBuilder, GraphDescription, GraphPlanner, PlanParams};
use filterchain_io::{RealtimeEngine, StereoSamples, WavSpec, read_wav, read_wav_stereo, write_wav, write_wav_stereo};
use filterchain_registry::PluginRegistry;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::common::{load_preset, parse_key_val};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Graph description file (JSON)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Preset name or path (supports factory presets, user presets, and file paths)
    #[arg(short, long)]
    preset: Option<String>,

    /// Control-port assignment (e.g., "lp:Freq=400Hz" or "Gain=-6dB")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size, in frames per channel
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Force mono processing (mix stereo input down, single-channel graph)
    #[arg(long)]
    mono: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let description = load_graph_description(&args)?;

    println!("Reading {}...", args.input.display());
    let channels = if args.mono { 1 } else { 2 };

    let (interleaved, spec) = if args.mono {
        read_wav(&args.input)?
    } else {
        let (stereo, spec) = read_wav_stereo(&args.input)?;
        (stereo.to_interleaved(), spec)
    };

    let sample_rate = spec.sample_rate as f32;
    let frames = interleaved.len() / channels;
    println!(
        "  {} frame(s), {} Hz, {} channel(s), {:.2}s",
        frames,
        spec.sample_rate,
        spec.channels,
        frames as f32 / sample_rate
    );

    let registry = PluginRegistry::new();
    let draft = GraphBuilder::new(&registry).build(&description).map_err(|e| anyhow::anyhow!("{e}"))?;
    let graph = GraphPlanner::new(&registry)
        .plan(draft, PlanParams { sample_rate, capture_channels: channels, playback_channels: channels })
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    apply_params(&graph, &args.param)?;

    let mut engine = RealtimeEngine::new(graph);
    println!("Processing ({} channel(s), block size {})...", channels, args.block_size);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let block_frames = args.block_size.max(1);
    let mut output = vec![0.0f32; interleaved.len()];
    let mut pos = 0;
    while pos < frames {
        let this_frames = block_frames.min(frames - pos);
        let in_start = pos * channels;
        let in_end = in_start + this_frames * channels;
        engine.process_interleaved(&interleaved[in_start..in_end], &mut output[in_start..in_end]);
        pos += this_frames;
        pb.set_position(pos as u64);
    }
    pb.finish_with_message("done");

    let input_mono = to_mono(&interleaved, channels);
    let output_mono = to_mono(&output, channels);

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input_mono)),
        linear_to_db(peak(&input_mono))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output_mono)),
        linear_to_db(peak(&output_mono))
    );

    println!("\nWriting {}...", args.output.display());
    if args.mono {
        let out_spec = WavSpec { channels: 1, sample_rate: spec.sample_rate, bits_per_sample: args.bit_depth };
        write_wav(&args.output, &output, out_spec)?;
    } else {
        let out_spec = WavSpec { channels: 2, sample_rate: spec.sample_rate, bits_per_sample: args.bit_depth };
        write_wav_stereo(&args.output, &StereoSamples::from_interleaved(&output), out_spec)?;
    }

    println!("Done!");
    Ok(())
}

fn apply_params(graph: &Graph, params: &[(String, String)]) -> anyhow::Result<()> {
    for (name, value) in params {
        let (reference, numeric) = parse_control_assignment(&format!("{name}={value}"))
            .ok_or_else(|| anyhow::anyhow!("invalid control value '{value}' for '{name}'"))?;
        let changed = graph.apply_update(&[(reference.to_string(), serde_json::json!(numeric))]);
        if changed == 0 {
            anyhow::bail!("no control port named '{name}' in this graph");
        }
    }
    Ok(())
}

fn to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved.chunks(channels).map(|frame| frame.iter().sum::<f32>() / channels as f32).collect()
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

fn load_graph_description(args: &ProcessArgs) -> anyhow::Result<GraphDescription> {
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
