//! `mixer`: up to eight gain-scaled audio inputs summed to one output.
//!
//! Port layout: `In 1..8` (audio in, index 0-7), `Gain 1..8` (control in,
//! index 8-15, default 1.0, range 0.0-4.0), `Out` (audio out, index 16).
//! Unconnected input ports stay bound to the pool's silence slot, so the
//! sum is always well-defined regardless of how many inputs a graph
//! actually wires up.

use filterchain_core::buffers::{BufferPool, BufferSlot};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortHints, PortSpec};

pub const MAX_INPUTS: usize = 8;

pub fn descriptor() -> Descriptor {
    let mut ports = Vec::with_capacity(MAX_INPUTS * 2 + 1);
    for i in 0..MAX_INPUTS {
        ports.push(PortSpec::audio(format!("In {}", i + 1), i, Direction::In));
    }
    for i in 0..MAX_INPUTS {
        ports.push(PortSpec::control(
            format!("Gain {}", i + 1),
            MAX_INPUTS + i,
            Direction::In,
            PortHints::empty(),
            1.0,
            0.0,
            4.0,
        ));
    }
    ports.push(PortSpec::audio("Out", MAX_INPUTS * 2, Direction::Out));
    Descriptor { path: "builtin".into(), label: "mixer".into(), ports, capabilities: Capabilities::SUPPORTS_NULL_DATA }
}

pub struct Mixer {
    inputs: [BufferSlot; MAX_INPUTS],
    gains: [Option<SharedControl>; MAX_INPUTS],
    output: BufferSlot,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            inputs: [BufferPool::SILENCE; MAX_INPUTS],
            gains: [None, None, None, None, None, None, None, None],
            output: BufferPool::DISCARD,
        }
    }
}

impl filterchain_core::plugin::PluginHandle for Mixer {
    fn connect_audio_input(&mut self, port_index: usize, slot: BufferSlot) {
        self.inputs[port_index] = slot;
    }

    fn connect_audio_output(&mut self, _port_index: usize, slot: BufferSlot) {
        self.output = slot;
    }

    fn connect_control(&mut self, port_index: usize, value: SharedControl) {
        self.gains[port_index - MAX_INPUTS] = Some(value);
    }

    fn activate(&mut self) {}
    fn deactivate(&mut self) {}

    fn run(&mut self, pool: &BufferPool, n_frames: usize) {
        let mut out = pool.write(self.output);
        out[..n_frames].fill(0.0);
        drop(out);
        for i in 0..MAX_INPUTS {
            let gain = self.gains[i].as_ref().map_or(1.0, |g| g.get());
            if gain == 0.0 {
                continue;
            }
            let src = pool.read(self.inputs[i]);
            let mut dst = pool.write(self.output);
            for n in 0..n_frames {
                dst[n] += src[n] * gain;
            }
        }
    }
}
