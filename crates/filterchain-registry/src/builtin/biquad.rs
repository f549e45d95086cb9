//! `bq_{lowpass,highpass,bandpass,lowshelf,highshelf,peaking,notch,allpass}`:
//! one RBJ-cookbook biquad per label, re-deriving coefficients from its
//! control ports every block so parameter changes apply immediately
//! without a click-suppressing smoother — this engine owns correctness and
//! determinism, not perceptual polish (that belongs to a real-time host
//! layered on top, per the design notes on automation).

use filterchain_core::buffers::{BufferPool, BufferSlot};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortSpec};
use filterchain_core::dsp::biquad::{
    allpass_coefficients, bandpass_coefficients, highpass_coefficients, highshelf_coefficients,
    lowpass_coefficients, lowshelf_coefficients, notch_coefficients, peaking_eq_coefficients,
};
use filterchain_core::dsp::Biquad;
use filterchain_core::plugin::PluginHandle;

/// Which RBJ derivation a `bq_*` label uses. Every kind publishes the same
/// `Freq`/`Q`/`Gain` control surface; `Gain` is a no-op input for the kinds
/// whose coefficient derivation doesn't take a gain term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Lowpass,
    Highpass,
    Bandpass,
    Lowshelf,
    Highshelf,
    Peaking,
    Notch,
    Allpass,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Lowpass,
        Kind::Highpass,
        Kind::Bandpass,
        Kind::Lowshelf,
        Kind::Highshelf,
        Kind::Peaking,
        Kind::Notch,
        Kind::Allpass,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Lowpass => "bq_lowpass",
            Kind::Highpass => "bq_highpass",
            Kind::Bandpass => "bq_bandpass",
            Kind::Lowshelf => "bq_lowshelf",
            Kind::Highshelf => "bq_highshelf",
            Kind::Peaking => "bq_peaking",
            Kind::Notch => "bq_notch",
            Kind::Allpass => "bq_allpass",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Kind::ALL.into_iter().find(|k| k.label() == label)
    }
}

const PORT_IN: usize = 0;
const PORT_OUT: usize = 1;
const PORT_FREQ: usize = 2;
const PORT_Q: usize = 3;
const PORT_GAIN: usize = 4;

pub fn descriptor(kind: Kind) -> Descriptor {
    let ports = vec![
        PortSpec::audio("In", PORT_IN, Direction::In),
        PortSpec::audio("Out", PORT_OUT, Direction::Out),
        PortSpec::control("Freq", PORT_FREQ, Direction::In, Default::default(), 1000.0, 20.0, 20000.0),
        PortSpec::control("Q", PORT_Q, Direction::In, Default::default(), 0.707, 0.1, 10.0),
        // Every bq_* label exposes Gain for a uniform parameter surface; the
        // shapes whose RBJ derivation doesn't take a gain term just never
        // read it back out in refresh_coefficients.
        PortSpec::control("Gain", PORT_GAIN, Direction::In, Default::default(), 0.0, -24.0, 24.0),
    ];
    Descriptor { path: "builtin".into(), label: kind.label().into(), ports, capabilities: Capabilities::empty() }
}

pub struct BiquadHandle {
    kind: Kind,
    sample_rate: f32,
    biquad: Biquad,
    input: BufferSlot,
    output: BufferSlot,
    freq: Option<SharedControl>,
    q: Option<SharedControl>,
    gain: Option<SharedControl>,
}

impl BiquadHandle {
    pub fn new(kind: Kind, sample_rate: f32) -> Self {
        Self {
            kind,
            sample_rate,
            biquad: Biquad::new(),
            input: BufferPool::SILENCE,
            output: BufferPool::DISCARD,
            freq: None,
            q: None,
            gain: None,
        }
    }

    fn refresh_coefficients(&mut self) {
        let freq = self.freq.as_ref().map_or(1000.0, |c| c.get()).clamp(1.0, self.sample_rate * 0.499);
        let q = self.q.as_ref().map_or(0.707, |c| c.get()).max(0.01);
        let gain = self.gain.as_ref().map_or(0.0, |c| c.get());
        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            Kind::Lowpass => lowpass_coefficients(freq, q, self.sample_rate),
            Kind::Highpass => highpass_coefficients(freq, q, self.sample_rate),
            Kind::Bandpass => bandpass_coefficients(freq, q, self.sample_rate),
            Kind::Lowshelf => lowshelf_coefficients(freq, q, gain, self.sample_rate),
            Kind::Highshelf => highshelf_coefficients(freq, q, gain, self.sample_rate),
            Kind::Peaking => peaking_eq_coefficients(freq, q, gain, self.sample_rate),
            Kind::Notch => notch_coefficients(freq, q, self.sample_rate),
            Kind::Allpass => allpass_coefficients(freq, q, self.sample_rate),
        };
        self.biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
    }
}

impl PluginHandle for BiquadHandle {
    fn connect_audio_input(&mut self, _port_index: usize, slot: BufferSlot) {
        self.input = slot;
    }

    fn connect_audio_output(&mut self, _port_index: usize, slot: BufferSlot) {
        self.output = slot;
    }

    fn connect_control(&mut self, port_index: usize, value: SharedControl) {
        match port_index {
            PORT_FREQ => self.freq = Some(value),
            PORT_Q => self.q = Some(value),
            PORT_GAIN => self.gain = Some(value),
            _ => {}
        }
    }

    fn activate(&mut self) {
        self.biquad.clear();
    }

    fn deactivate(&mut self) {
        self.biquad.clear();
    }

    fn run(&mut self, pool: &BufferPool, n_frames: usize) {
        self.refresh_coefficients();
        let src = pool.read(self.input);
        let mut dst = pool.write(self.output);
        for n in 0..n_frames {
            dst[n] = self.biquad.process(src[n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_produces_finite_output() {
        for kind in Kind::ALL {
            let mut pool = BufferPool::new();
            let input = pool.allocate();
            let output = pool.allocate();
            pool.write(input)[..16].fill(1.0);

            let mut handle = BiquadHandle::new(kind, 48000.0);
            handle.connect_audio_input(PORT_IN, input);
            handle.connect_audio_output(PORT_OUT, output);
            handle.activate();
            handle.run(&pool, 16);

            assert!(pool.read(output)[..16].iter().all(|s| s.is_finite()), "{:?} produced non-finite output", kind);
        }
    }

    #[test]
    fn every_kind_exposes_freq_q_and_gain() {
        for kind in Kind::ALL {
            let ports = descriptor(kind).ports;
            assert!(ports.iter().any(|p| p.name == "Freq"), "{:?} missing Freq", kind);
            assert!(ports.iter().any(|p| p.name == "Q"), "{:?} missing Q", kind);
            assert!(ports.iter().any(|p| p.name == "Gain"), "{:?} missing Gain", kind);
        }
    }
}
