//! `copy`: a passthrough node with no control ports.
//!
//! Used to duplicate a single producer's output into a second buffer slot
//! when two consumers would otherwise try to read the same link (§4.3
//! "fan-out remediation" — the `copy` hint on a `BUSY` error).

use filterchain_core::buffers::{BufferPool, BufferSlot};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortSpec};
use filterchain_core::plugin::PluginHandle;

pub fn descriptor() -> Descriptor {
    Descriptor {
        path: "builtin".into(),
        label: "copy".into(),
        ports: vec![PortSpec::audio("In", 0, Direction::In), PortSpec::audio("Out", 1, Direction::Out)],
        capabilities: Capabilities::SUPPORTS_NULL_DATA,
    }
}

pub struct Copy {
    input: BufferSlot,
    output: BufferSlot,
}

impl Copy {
    pub fn new() -> Self {
        Self { input: BufferPool::SILENCE, output: BufferPool::DISCARD }
    }
}

impl PluginHandle for Copy {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_input_to_output() {
        let mut pool = BufferPool::new();
        let a = pool.allocate();
        let b = pool.allocate();
        pool.write(a)[..3].copy_from_slice(&[1.0, 2.0, 3.0]);

        let mut copy = Copy::new();
        copy.connect_audio_input(0, a);
        copy.connect_audio_output(1, b);
        copy.run(&pool, 3);

        assert_eq!(&pool.read(b)[..3], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn same_slot_is_a_no_op() {
        let mut pool = BufferPool::new();
        let a = pool.allocate();
        pool.write(a)[0] = 9.0;

        let mut copy = Copy::new();
        copy.connect_audio_input(0, a);
        copy.connect_audio_output(1, a);
        copy.run(&pool, 1);

        assert_eq!(pool.read(a)[0], 9.0);
    }
}
