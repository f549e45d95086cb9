//! Factory presets: example graph descriptions bundled with the library.
//!
//! These mirror the scenarios used to validate the planner and executor —
//! identity passthrough, a mixer-based fan-in, biquad filtering, and a
//! copy-based fan-out — wrapped as loadable [`Preset`]s so a host or the
//! CLI has something to run without hand-authoring a graph description
//! first.

use crate::preset::Preset;

/// Names of all built-in factory presets, in catalog order.
pub const FACTORY_PRESET_NAMES: &[&str] =
    &["mono_passthrough", "stereo_mixdown", "lowpass_400hz", "highpass_lowpass_split", "slapback_delay"];

/// Returns the names of all factory presets.
pub fn factory_preset_names() -> &'static [&'static str] {
    FACTORY_PRESET_NAMES
}

/// Whether `name` names a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    FACTORY_PRESET_NAMES.contains(&name)
}

/// Look up a factory preset by name.
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let json = match name {
        "mono_passthrough" => MONO_PASSTHROUGH_JSON,
        "stereo_mixdown" => STEREO_MIXDOWN_JSON,
        "lowpass_400hz" => LOWPASS_400HZ_JSON,
        "highpass_lowpass_split" => HIGHPASS_LOWPASS_SPLIT_JSON,
        "slapback_delay" => SLAPBACK_DELAY_JSON,
        _ => return None,
    };
    Preset::from_json(json).ok()
}

/// Returns every factory preset, in catalog order. Presets that fail to
/// parse (they shouldn't — they're fixed strings below) are skipped.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESET_NAMES.iter().filter_map(|name| get_factory_preset(name)).collect()
}

const MONO_PASSTHROUGH_JSON: &str = r#"{
    "name": "mono_passthrough",
    "description": "A single copy node, in to out unchanged.",
    "sample_rate": 48000,
    "graph": {
        "nodes": [
            { "type": "builtin", "name": "pass", "label": "copy" }
        ]
    }
}"#;

const STEREO_MIXDOWN_JSON: &str = r#"{
    "name": "stereo_mixdown",
    "description": "Mixes two inputs down to one output through a mixer node.",
    "sample_rate": 48000,
    "graph": {
        "nodes": [
            { "type": "builtin", "name": "mix", "label": "mixer", "control": { "Gain 1": 0.5, "Gain 2": 0.5 } }
        ],
        "inputs": ["mix:In 1", "mix:In 2"],
        "outputs": ["mix:Out"]
    }
}"#;

const LOWPASS_400HZ_JSON: &str = r#"{
    "name": "lowpass_400hz",
    "description": "Single-pole biquad lowpass at 400 Hz.",
    "sample_rate": 48000,
    "graph": {
        "nodes": [
            { "type": "builtin", "name": "lp", "label": "bq_lowpass", "control": { "Freq": 400.0, "Q": 0.707 } }
        ]
    }
}"#;

const HIGHPASS_LOWPASS_SPLIT_JSON: &str = r#"{
    "name": "highpass_lowpass_split",
    "description": "Fans a single input out through a copy node into a lowpass and a highpass branch, each on its own output.",
    "sample_rate": 48000,
    "graph": {
        "nodes": [
            { "type": "builtin", "name": "split", "label": "copy" },
            { "type": "builtin", "name": "lp", "label": "bq_lowpass", "control": { "Freq": 1000.0, "Q": 0.707 } },
            { "type": "builtin", "name": "hp", "label": "bq_highpass", "control": { "Freq": 1000.0, "Q": 0.707 } }
        ],
        "links": [
            { "output": "split:Out", "input": "lp:In" },
            { "output": "split:Out", "input": "hp:In" }
        ],
        "outputs": ["lp:Out", "hp:Out"]
    }
}"#;

const SLAPBACK_DELAY_JSON: &str = r#"{
    "name": "slapback_delay",
    "description": "A short slapback delay mixed with the dry signal.",
    "sample_rate": 48000,
    "graph": {
        "nodes": [
            { "type": "builtin", "name": "split", "label": "copy" },
            { "type": "builtin", "name": "echo", "label": "delay", "config": { "max-delay": 0.5 }, "control": { "Delay (s)": 0.12 } },
            { "type": "builtin", "name": "mix", "label": "mixer", "control": { "Gain 1": 0.7, "Gain 2": 0.3 } }
        ],
        "links": [
            { "output": "split:Out", "input": "mix:In 1" },
            { "output": "split:Out", "input": "echo:In" },
            { "output": "echo:Out", "input": "mix:In 2" }
        ],
        "outputs": ["mix:Out"]
    }
}"#;
