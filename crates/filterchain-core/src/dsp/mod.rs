//! DSP primitives shared by the built-in plugin family.
//!
//! These are pure signal-processing building blocks: a biquad with RBJ
//! cookbook coefficient derivations, and interpolated delay lines. They know
//! nothing about descriptors, ports, or graphs — the registry's builtin
//! family (`filterchain_registry::builtin`) wraps them to satisfy the
//! `PluginHandle` contract.

pub mod biquad;
pub mod delay;

pub use biquad::Biquad;
pub use delay::{FixedDelayLine, Interpolation, InterpolatedDelay};
