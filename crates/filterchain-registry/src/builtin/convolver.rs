//! `convolver`: FFT overlap-save convolution against a synthetic kernel.
//!
//! Loading an arbitrary impulse-response file is a loader-hook concern the
//! engine does not own (§1 "out of scope: external collaborators"), so this
//! builtin only synthesizes the two filenames the design notes carry over
//! from the reference module's self-test fixtures: `/dirac` (a one-tap
//! identity kernel, useful for verifying a convolver node is wired
//! correctly) and `/hilbert` (a windowed-sinc Hilbert transformer, useful
//! for phase-quadrature effects). Any other filename is `Unsupported`.

use filterchain_core::buffers::{BufferPool, BufferSlot, MAX_FRAMES};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Capabilities, Descriptor, Direction, PortSpec};
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::PluginHandle;
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::VecDeque;
use std::sync::Arc;

const PORT_IN: usize = 0;
const PORT_OUT: usize = 1;

pub fn descriptor() -> Descriptor {
    Descriptor {
        path: "builtin".into(),
        label: "convolver".into(),
        ports: vec![PortSpec::audio("In", PORT_IN, Direction::In), PortSpec::audio("Out", PORT_OUT, Direction::Out)],
        capabilities: Capabilities::empty(),
    }
}

/// §6 also names `blocksize`, `tailsize`, `offset`, `length`, and `channel`
/// for the convolver; those tune the (out-of-scope, §1) file-backed
/// impulse-response loader and have no meaning against a synthetic kernel,
/// so they're accepted here only to be warned about, not silently dropped.
#[derive(Deserialize)]
struct ConvolverConfig {
    #[serde(default = "default_filename")]
    filename: String,
    #[serde(default = "default_gain")]
    gain: f32,
    #[serde(default)]
    delay: usize,
    #[serde(default)]
    blocksize: Option<serde_json::Value>,
    #[serde(default)]
    tailsize: Option<serde_json::Value>,
    #[serde(default)]
    offset: Option<serde_json::Value>,
    #[serde(default)]
    length: Option<serde_json::Value>,
    #[serde(default)]
    channel: Option<serde_json::Value>,
}

impl ConvolverConfig {
    fn warn_unimplemented(&self) {
        for (key, present) in [
            ("blocksize", self.blocksize.is_some()),
            ("tailsize", self.tailsize.is_some()),
            ("offset", self.offset.is_some()),
            ("length", self.length.is_some()),
            ("channel", self.channel.is_some()),
        ] {
            if present {
                tracing::warn!(key, "convolver: config key is not implemented against a synthetic kernel and was ignored");
            }
        }
    }
}

fn default_filename() -> String {
    "/dirac".to_string()
}

fn default_gain() -> f32 {
    1.0
}

fn hilbert_kernel(taps: usize) -> Vec<f32> {
    let taps = if taps % 2 == 0 { taps + 1 } else { taps };
    let center = (taps / 2) as isize;
    (0..taps)
        .map(|i| {
            let n = i as isize - center;
            if n == 0 || n % 2 == 0 {
                0.0
            } else {
                let ideal = 2.0 / (std::f32::consts::PI * n as f32);
                let w = 0.54 - 0.46 * libm::cosf(2.0 * std::f32::consts::PI * i as f32 / (taps - 1) as f32);
                ideal * w
            }
        })
        .collect()
}

fn synthesize_kernel(filename: &str) -> Result<Vec<f32>> {
    match filename {
        "/dirac" => Ok(vec![1.0]),
        "/hilbert" => Ok(hilbert_kernel(129)),
        other => Err(EngineError::Unsupported(format!(
            "convolver: filename '{other}' is not a synthetic kernel (loading external impulse-response files is out of scope)"
        ))),
    }
}

fn next_pow2(n: usize) -> usize {
    n.next_power_of_two()
}

pub struct Convolver {
    fft_size: usize,
    kernel_len: usize,
    kernel_fft: Vec<Complex32>,
    history: Vec<f32>,
    segment: Vec<f32>,
    scratch: Vec<Complex32>,
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
    input: BufferSlot,
    output: BufferSlot,
    gain: f32,
    delay: usize,
    delay_buf: VecDeque<f32>,
}

impl Convolver {
    pub fn new(_sample_rate: f32, _instance_index: usize, config: Option<&RawValue>) -> Result<Self> {
        let config = match config {
            Some(raw) => serde_json::from_str::<ConvolverConfig>(raw.get())
                .map_err(|e| EngineError::Invalid(format!("convolver: invalid config: {e}")))?,
            None => ConvolverConfig {
                filename: default_filename(),
                gain: default_gain(),
                delay: 0,
                blocksize: None,
                tailsize: None,
                offset: None,
                length: None,
                channel: None,
            },
        };
        config.warn_unimplemented();
        let kernel = synthesize_kernel(&config.filename)?;
        let kernel_len = kernel.len();
        let fft_size = next_pow2(kernel_len + MAX_FRAMES - 1);

        let mut planner = FftPlanner::<f32>::new();
        let fwd = planner.plan_fft_forward(fft_size);
        let inv = planner.plan_fft_inverse(fft_size);

        let mut kernel_fft: Vec<Complex32> =
            kernel.iter().map(|&s| Complex32::new(s, 0.0)).chain(std::iter::repeat(Complex32::new(0.0, 0.0))).take(fft_size).collect();
        fwd.process(&mut kernel_fft);

        Ok(Self {
            fft_size,
            kernel_len,
            kernel_fft,
            history: vec![0.0; kernel_len - 1],
            segment: vec![0.0; kernel_len - 1 + MAX_FRAMES],
            scratch: vec![Complex32::new(0.0, 0.0); fft_size],
            fwd,
            inv,
            input: BufferPool::SILENCE,
            output: BufferPool::DISCARD,
            gain: config.gain,
            delay: config.delay,
            delay_buf: VecDeque::with_capacity(config.delay),
        })
    }
}

impl PluginHandle for Convolver {
    fn connect_audio_input(&mut self, _port_index: usize, slot: BufferSlot) {
        self.input = slot;
    }

    fn connect_audio_output(&mut self, _port_index: usize, slot: BufferSlot) {
        self.output = slot;
    }

    fn connect_control(&mut self, _port_index: usize, _value: SharedControl) {}

    fn activate(&mut self) {
        self.history.fill(0.0);
        self.delay_buf.clear();
    }

    fn deactivate(&mut self) {
        self.history.fill(0.0);
        self.delay_buf.clear();
    }

    fn run(&mut self, pool: &BufferPool, n_frames: usize) {
        let overlap = self.kernel_len - 1;
        let segment_len = overlap + n_frames;

        self.segment[..overlap].copy_from_slice(&self.history);
        {
            let src = pool.read(self.input);
            self.segment[overlap..segment_len].copy_from_slice(&src[..n_frames]);
        }

        for c in &mut self.scratch {
            *c = Complex32::new(0.0, 0.0);
        }
        for (c, &s) in self.scratch.iter_mut().zip(self.segment[..segment_len].iter()) {
            *c = Complex32::new(s, 0.0);
        }

        self.fwd.process(&mut self.scratch);
        for (c, k) in self.scratch.iter_mut().zip(self.kernel_fft.iter()) {
            *c *= k;
        }
        self.inv.process(&mut self.scratch);

        let norm = self.gain / self.fft_size as f32;
        let mut dst = pool.write(self.output);
        for n in 0..n_frames {
            let wet = self.scratch[overlap + n].re * norm;
            dst[n] = if self.delay == 0 {
                wet
            } else {
                self.delay_buf.push_back(wet);
                if self.delay_buf.len() > self.delay { self.delay_buf.pop_front().unwrap() } else { 0.0 }
            };
        }
        drop(dst);

        self.history.copy_from_slice(&self.segment[n_frames..segment_len]);
    }
}
