//! Disk loading, presets, and host configuration for the filter chain engine.
//!
//! §10.3: graph descriptions are the engine's authoritative wire format
//! (§6); this crate adds the surrounding disk layer the engine itself has
//! no opinion about — preset files that bundle a graph description with a
//! name/sample-rate hint, platform preset/config directories, pre-flight
//! validation of a description against a registry, and a small catalog of
//! built-in example graphs.
//!
//! # Example
//!
//! ```rust,no_run
//! use filterchain_config::{Preset, user_presets_dir};
//!
//! let preset = Preset::load("my_preset.json").unwrap();
//! println!("loaded '{}' with {} node(s)", preset.name, preset.len());
//!
//! let path = user_presets_dir().join("my_preset.json");
//! preset.save(&path).unwrap();
//! ```

mod preset;
mod error;

/// Platform-specific paths for presets and configuration.
pub mod paths;

/// Pre-flight validation of a graph description against a registry.
pub mod validation;

/// Human-readable control-value string parsing (`"-6dB"`, `"440Hz"`, ...).
pub mod control_value;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use control_value::{parse_control_assignment, parse_param_value};
pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset, is_factory_preset};
pub use paths::{
    ensure_user_config_dir, ensure_user_presets_dir, find_preset, list_all_presets, list_system_presets,
    list_user_presets, preset_name_from_path, system_presets_dir, user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{ValidationError, ValidationResult, validate_description};
