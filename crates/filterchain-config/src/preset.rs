//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use filterchain_graph::GraphDescription;

use crate::error::ConfigError;

/// Preset file format for a graph.
///
/// Presets are stored as JSON files containing a name, an optional
/// description, a sample-rate hint, and the graph description itself
/// (§6). They can be loaded from files, created programmatically, and
/// saved to disk.
///
/// # JSON Format
///
/// ```json
/// {
///   "name": "My Preset",
///   "description": "A warm, vintage tone",
///   "sample_rate": 48000,
///   "graph": {
///     "nodes": [
///       { "type": "builtin", "name": "bq", "label": "bq_lowpass", "control": { "Freq": 0.3 } }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    /// This is used when planning the graph but may be overridden at runtime.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// The graph to build and plan.
    pub graph: GraphDescription,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a new preset around an already-built graph description.
    pub fn new(name: impl Into<String>, graph: GraphDescription) -> Self {
        Self { name: name.into(), description: None, sample_rate: default_sample_rate(), graph }
    }

    /// Add a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Load a preset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Parse a preset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::JsonParse)
    }

    /// Save the preset to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::JsonSerialize)
    }

    /// Number of nodes in the preset's graph.
    pub fn len(&self) -> usize {
        self.graph.nodes.len()
    }

    /// Whether the preset's graph declares no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }
}
