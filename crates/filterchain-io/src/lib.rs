//! Audio I/O layer for the filter chain engine.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`]/[`write_wav`] and their stereo
//!   counterparts, for offline (file-to-file) processing.
//! - **Real-time streaming**: [`AudioStream`] for live audio input/output,
//!   and the pluggable [`backend::AudioBackend`] trait for platforms beyond
//!   the default cpal backend.
//! - **Realtime graph execution**: [`RealtimeEngine`] binds a planned
//!   [`filterchain_graph::planner::Graph`] to an interleaved audio callback.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filterchain_io::{RealtimeEngine, StreamConfig, AudioStream};
//! use filterchain_graph::{build_and_plan, PlanParams};
//! use filterchain_registry::PluginRegistry;
//!
//! let registry = PluginRegistry::new();
//! let graph = build_and_plan(description_json, &registry, PlanParams {
//!     sample_rate: 48000.0, capture_channels: 2, playback_channels: 2,
//! })?;
//! let mut engine = RealtimeEngine::new(graph);
//!
//! let mut stream = AudioStream::new(StreamConfig::default())?;
//! stream.run(move |capture, playback| engine.process_interleaved(capture, playback))?;
//! ```

pub mod backend;
pub mod cpal_backend;
mod engine;
mod stream;
mod wav;

pub use backend::{AudioBackend, BackendStreamConfig, ErrorCallback, InputCallback, OutputCallback, StreamHandle};
pub use cpal_backend::CpalBackend;
pub use engine::RealtimeEngine;
pub use stream::{
    AudioDevice, AudioStream, StreamConfig, default_device, find_device_by_index, find_device_fuzzy, list_devices,
};
pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo, write_wav,
    write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
