//! Filterchain Core - plugin contracts and DSP primitives for the filter
//! chain engine.
//!
//! This crate provides the foundational types the graph engine builds on:
//! the [`plugin`] capability traits every node instance implements, the
//! [`descriptor`] metadata a plugin family publishes, the [`buffers`] pool
//! that stands in for raw-pointer port binding, the [`control`] atomic value
//! cell shared between the config and audio threads, and a small [`dsp`]
//! library of biquad/delay primitives used by the built-in catalog.
//!
//! # Core Abstractions
//!
//! ## Plugin contracts
//!
//! - [`PluginHandle`] - one running instance of a label
//! - [`PluginFamily`] - resolves labels to descriptors and instantiates them
//! - [`Descriptor`] - immutable port list and capability flags
//!
//! ## Buffers and control values
//!
//! - [`BufferPool`] - scratch audio buffers addressed by [`BufferSlot`]
//!   index, in place of raw pointers
//! - [`ControlValue`] - single-writer atomic `f32` cell, shared as
//!   [`SharedControl`]
//!
//! ## DSP primitives
//!
//! - [`Biquad`] - second-order IIR filter with RBJ cookbook coefficients
//!   (lowpass/highpass/bandpass/lowshelf/highshelf/peaking/notch/allpass)
//! - [`InterpolatedDelay`], [`FixedDelayLine`] - delay lines
//!
//! ## Errors and parameter info
//!
//! - [`EngineError`] - the error kinds graph construction, planning, and
//!   control updates can raise
//! - [`ParamInfo`] - published metadata for one control port
//!
//! # Design Principles
//!
//! - Real-time safe: no allocation once a graph is planned.
//! - No raw pointers: the workspace denies `unsafe_code`, so port binding
//!   goes through [`BufferSlot`] indices rather than `connect_port(ptr)`.
//! - This crate targets hosted audio frameworks (it uses `std::sync::Arc`
//!   and `std::sync::atomic`); unlike its ancestor it does not offer a
//!   `no_std` build, since nothing built on it runs without an allocator.

pub mod buffers;
pub mod control;
pub mod descriptor;
pub mod dsp;
pub mod error;
pub mod math;
pub mod param_info;
pub mod plugin;

pub use buffers::{BufferPool, BufferSlot, MAX_FRAMES, MAX_HNDL};
pub use control::{ControlValue, SharedControl};
pub use descriptor::{Capabilities, Descriptor, Direction, Kind, PortHints, PortSpec};
pub use dsp::{Biquad, FixedDelayLine, InterpolatedDelay, Interpolation};
pub use error::{EngineError, Result};
pub use math::{clamp, db_to_linear, flush_denormal, hz_to_omega, lerp, linear_to_db, ms_to_samples};
pub use param_info::{ParamInfo, ParamType, ParamValue};
pub use plugin::{PluginFamily, PluginHandle};
