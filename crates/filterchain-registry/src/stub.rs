//! A minimal [`PluginFamily`] used to prove the trait is generic enough to
//! host `family-a`/`family-b` (LADSPA/LV2-shaped external plugins), without
//! implementing the dlopen/FFI loader hooks those families actually need —
//! that loading is an external collaborator's job (§1 "Out of scope").
//!
//! [`StubFamily`] exposes exactly one label, `passthrough`, with one audio
//! input and one audio output and no control ports. A host wiring up a real
//! `family-a`/`family-b` loader would register its own [`PluginFamily`]
//! implementation under that tag instead of this one.

use filterchain_core::buffers::{BufferPool, BufferSlot};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortSpec};
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::{PluginFamily, PluginHandle};
use serde_json::value::RawValue;

/// Demonstration family standing in for an externally-loaded `family-a` or
/// `family-b` plugin path.
pub struct StubFamily;

impl PluginFamily for StubFamily {
    fn make_desc(&self, label: &str) -> Result<Descriptor> {
        if label != "passthrough" {
            return Err(EngineError::NotFound(format!("stub family: no such label '{label}'")));
        }
        Ok(Descriptor {
            path: "stub".into(),
            label: "passthrough".into(),
            ports: vec![PortSpec::audio("In", 0, Direction::In), PortSpec::audio("Out", 1, Direction::Out)],
            capabilities: Capabilities::empty(),
        })
    }

    fn instantiate(
        &self,
        _descriptor: &Descriptor,
        _sample_rate: f32,
        _instance_index: usize,
        _config: Option<&RawValue>,
    ) -> Result<Box<dyn PluginHandle>> {
        Ok(Box::new(StubHandle { input: BufferPool::SILENCE, output: BufferPool::DISCARD }))
    }
}

struct StubHandle {
    input: BufferSlot,
    output: BufferSlot,
}

impl PluginHandle for StubHandle {
    fn connect_audio_input(&mut self, _port_index: usize, slot: BufferSlot) {
        self.input = slot;
    }

    fn connect_audio_output(&mut self, _port_index: usize, slot: BufferSlot) {
        self.output = slot;
    }

    fn connect_control(&mut self, _port_index: usize, _value: SharedControl) {}
    fn activate(&mut self) {}
    fn deactivate(&mut self) {}

    fn run(&mut self, pool: &BufferPool, n_frames: usize) {
        if self.input == self.output {
            return;
        }
        let src = pool.read(self.input);
        let mut dst = pool.write(self.output);
        dst[..n_frames].copy_from_slice(&src[..n_frames]);
    }
}
