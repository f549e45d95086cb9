//! The plugin capability set: a tagged interface with variants for the
//! built-in family and for each of the two externally-loaded families.
//!
//! §9: "Represent plugins as a capability set `{load, make_desc, run,
//! connect_port, activate/deactivate, cleanup, instantiate, free}`... a
//! tagged interface with three variants (`builtin`, `family-a`,
//! `family-b`)." `connect_port`'s raw pointer is replaced by a
//! [`BufferSlot`](crate::buffers::BufferSlot) index, since the workspace
//! denies `unsafe_code` — see [`crate::buffers`] for why that's equivalent.

use serde_json::value::RawValue;

use crate::buffers::{BufferPool, BufferSlot};
use crate::control::SharedControl;
use crate::descriptor::Descriptor;
use crate::error::Result;

/// A single running instance of a descriptor's label.
///
/// One `PluginHandle` is created per `(node, channel-group index)` pair by
/// [`PluginFamily::instantiate`]. The planner binds every port exactly once
/// before activation, and again whenever the topological pass discovers a
/// new downstream consumer; the executor only ever rebinds the external
/// capture/playback slots on the head/tail nodes.
pub trait PluginHandle {
    /// Bind an audio input port to a buffer slot (a peer's output, the
    /// shared silence buffer, or — for the head node — an external capture
    /// slot).
    fn connect_audio_input(&mut self, port_index: usize, slot: BufferSlot);

    /// Bind an audio output port to a buffer slot (a freshly allocated
    /// scratch buffer, the shared discard buffer, or — for the tail node —
    /// an external playback slot).
    fn connect_audio_output(&mut self, port_index: usize, slot: BufferSlot);

    /// Bind a control or notify port to its owning port's shared value
    /// cell. Called once at instantiation; the value itself may change at
    /// any time thereafter without rebinding.
    fn connect_control(&mut self, port_index: usize, value: SharedControl);

    /// Transition into the running state, discharging no history (a fresh
    /// instance and a freshly-reset instance are required to behave
    /// identically).
    fn activate(&mut self);

    /// Transition out of the running state. The control plane calls
    /// `deactivate` then `activate` back-to-back to discharge
    /// plugin-internal state (§4.5 "State reset").
    fn deactivate(&mut self);

    /// Process `n_frames` samples: read every bound audio input, write
    /// every bound audio output, using the current control values.
    ///
    /// Must not allocate, block, or perform I/O (§4.4 performance
    /// contract).
    fn run(&mut self, pool: &BufferPool, n_frames: usize);
}

/// A loaded plugin family: the built-in catalog, or one of the two
/// externally-loaded families the surrounding framework provides loader
/// hooks for (§1 "Out of scope (external collaborators)").
///
/// One `PluginFamily` instance corresponds to one `(family-tag, path)` pair
/// and is cached/ref-counted by the registry (§4.1).
pub trait PluginFamily {
    /// Resolve a label to its descriptor. Called once per `(plugin, label)`
    /// pair; the registry caches the result.
    fn make_desc(&self, label: &str) -> Result<Descriptor>;

    /// Create a new instance of `descriptor`'s label.
    ///
    /// `config` is the verbatim lexical slice captured from the
    /// description's `config = { ... }` sub-object (possibly empty); its
    /// grammar is the plugin's concern, not the engine's (§9 open
    /// question).
    fn instantiate(
        &self,
        descriptor: &Descriptor,
        sample_rate: f32,
        instance_index: usize,
        config: Option<&RawValue>,
    ) -> Result<Box<dyn PluginHandle>>;
}
