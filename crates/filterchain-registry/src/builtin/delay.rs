//! `delay`: a single-channel delay line with a `Delay (s)` control port.
//!
//! Config (§6): `max-delay` seconds bounds both the line's capacity and the
//! range the `Delay (s)` control clamps into. The descriptor's published
//! range always advertises the hard cap ([`DEFAULT_MAX_DELAY_SECONDS`]),
//! since one descriptor is shared by every `delay` node regardless of its
//! own `config`; a smaller per-instance `max-delay` only narrows the clamp
//! applied inside [`Delay::run`].

use filterchain_core::buffers::{BufferPool, BufferSlot};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortHints, PortSpec};
use filterchain_core::dsp::InterpolatedDelay;
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::PluginHandle;
use serde::Deserialize;
use serde_json::value::RawValue;

const PORT_IN: usize = 0;
const PORT_OUT: usize = 1;
const PORT_DELAY: usize = 2;

/// Published/default ceiling for `max-delay` when a node's config omits it.
const DEFAULT_MAX_DELAY_SECONDS: f32 = 5.0;

pub fn descriptor() -> Descriptor {
    Descriptor {
        path: "builtin".into(),
        label: "delay".into(),
        ports: vec![
            PortSpec::audio("In", PORT_IN, Direction::In),
            PortSpec::audio("Out", PORT_OUT, Direction::Out),
            PortSpec::control(
                "Delay (s)",
                PORT_DELAY,
                Direction::In,
                PortHints::empty(),
                0.0,
                0.0,
                DEFAULT_MAX_DELAY_SECONDS,
            ),
        ],
        capabilities: Capabilities::empty(),
    }
}

#[derive(Deserialize)]
struct DelayConfig {
    #[serde(rename = "max-delay", default = "default_max_delay")]
    max_delay: f32,
}

fn default_max_delay() -> f32 {
    DEFAULT_MAX_DELAY_SECONDS
}

pub struct Delay {
    sample_rate: f32,
    max_delay_seconds: f32,
    line: InterpolatedDelay,
    input: BufferSlot,
    output: BufferSlot,
    time: Option<SharedControl>,
}

impl Delay {
    pub fn new(sample_rate: f32, config: Option<&RawValue>) -> Result<Self> {
        let max_delay_seconds = match config {
            Some(raw) => serde_json::from_str::<DelayConfig>(raw.get())
                .map_err(|e| EngineError::Invalid(format!("delay: invalid config: {e}")))?
                .max_delay,
            None => DEFAULT_MAX_DELAY_SECONDS,
        };
        if !(max_delay_seconds > 0.0) {
            return Err(EngineError::Invalid(format!("delay: max-delay must be positive, got {max_delay_seconds}")));
        }
        Ok(Self {
            sample_rate,
            max_delay_seconds,
            line: InterpolatedDelay::from_time(sample_rate, max_delay_seconds),
            input: BufferPool::SILENCE,
            output: BufferPool::DISCARD,
            time: None,
        })
    }
}

impl PluginHandle for Delay {
    fn connect_audio_input(&mut self, _port_index: usize, slot: BufferSlot) {
        self.input = slot;
    }

    fn connect_audio_output(&mut self, _port_index: usize, slot: BufferSlot) {
        self.output = slot;
    }

    fn connect_control(&mut self, port_index: usize, value: SharedControl) {
        if port_index == PORT_DELAY {
            self.time = Some(value);
        }
    }

    fn activate(&mut self) {
        self.line.clear();
    }

    fn deactivate(&mut self) {
        self.line.clear();
    }

    fn run(&mut self, pool: &BufferPool, n_frames: usize) {
        let seconds = self.time.as_ref().map_or(0.0, |c| c.get()).clamp(0.0, self.max_delay_seconds);
        let delay_samples = seconds * self.sample_rate;
        let src = pool.read(self.input);
        let mut dst = pool.write(self.output);
        for n in 0..n_frames {
            dst[n] = self.line.read_write(src[n], delay_samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterchain_core::control::ControlValue;
    use std::sync::Arc;

    #[test]
    fn delays_an_impulse_by_the_requested_sample_count() {
        let mut pool = BufferPool::new();
        let input = pool.allocate();
        let output = pool.allocate();
        pool.write(input)[0] = 1.0;

        let mut delay = Delay::new(1000.0, None).unwrap();
        delay.connect_audio_input(PORT_IN, input);
        delay.connect_audio_output(PORT_OUT, output);
        delay.connect_control(PORT_DELAY, Arc::new(ControlValue::new(0.01)));
        delay.activate();
        delay.run(&pool, 32);

        assert_eq!(pool.read(output)[10], 1.0);
        assert_eq!(pool.read(output)[9], 0.0);
    }

    #[test]
    fn max_delay_config_clamps_the_control_range() {
        let mut pool = BufferPool::new();
        let input = pool.allocate();
        let output = pool.allocate();
        pool.write(input)[0] = 1.0;

        let raw = serde_json::value::RawValue::from_string(r#"{"max-delay":0.005}"#.to_string()).unwrap();
        let mut delay = Delay::new(1000.0, Some(&raw)).unwrap();
        delay.connect_audio_input(PORT_IN, input);
        delay.connect_audio_output(PORT_OUT, output);
        // Requests 20ms, but max-delay caps it at 5ms (5 samples at 1kHz).
        delay.connect_control(PORT_DELAY, Arc::new(ControlValue::new(0.02)));
        delay.activate();
        delay.run(&pool, 16);

        assert_eq!(pool.read(output)[5], 1.0);
    }

    #[test]
    fn zero_max_delay_is_rejected() {
        let raw = serde_json::value::RawValue::from_string(r#"{"max-delay":0.0}"#.to_string()).unwrap();
        assert!(Delay::new(1000.0, Some(&raw)).is_err());
    }
}
