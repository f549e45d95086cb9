//! Realtime engine: binds a planned [`filterchain_graph::planner::Graph`] to
//! an interleaved audio callback.
//!
//! This is the thin adapter between the generic `AudioStream`/`AudioBackend`
//! plumbing (which only knows about flat, channel-interleaved `&[f32]`
//! buffers) and the executor's planar [`PeriodIo`] shape. It owns the
//! de/interleave scratch space so the per-period path itself never
//! allocates.

use filterchain_core::buffers::MAX_FRAMES;
use filterchain_graph::executor::PeriodIo;
use filterchain_graph::planner::Graph;

/// Runs a planned graph one period at a time against interleaved
/// capture/playback buffers.
///
/// `capture_channels()`/`playback_channels()` report the graph's external
/// channel counts (`graph.input.len()`/`graph.output.len()`, §3): the host
/// is responsible for opening a stream with matching channel counts.
pub struct RealtimeEngine {
    graph: Graph,
    capture_channels: usize,
    playback_channels: usize,
    capture_scratch: Vec<Vec<f32>>,
    playback_scratch: Vec<Vec<f32>>,
}

impl RealtimeEngine {
    /// Wrap an already-planned `graph`. Scratch buffers are sized once, to
    /// the hard per-period frame cap, so no later period ever reallocates.
    pub fn new(graph: Graph) -> Self {
        let capture_channels = graph.input.len();
        let playback_channels = graph.output.len();
        let capture_scratch = vec![vec![0.0f32; MAX_FRAMES]; capture_channels];
        let playback_scratch = vec![vec![0.0f32; MAX_FRAMES]; playback_channels];
        Self { graph, capture_channels, playback_channels, capture_scratch, playback_scratch }
    }

    pub fn capture_channels(&self) -> usize {
        self.capture_channels
    }

    pub fn playback_channels(&self) -> usize {
        self.playback_channels
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Process one period. `capture`/`playback` are flat, channel-major
    /// interleaved buffers (`[c0f0, c1f0, c0f1, c1f1, ...]`), sized to
    /// `frames * capture_channels()`/`frames * playback_channels()`.
    ///
    /// A short or empty `capture` degrades to a skipped period with
    /// silent output, matching [`Graph::run_period`]'s own degrade policy.
    pub fn process_interleaved(&mut self, capture: &[f32], playback: &mut [f32]) {
        if self.playback_channels == 0 {
            return;
        }
        if self.capture_channels == 0 {
            playback.fill(0.0);
            return;
        }

        let frames_in = capture.len() / self.capture_channels;
        let frames_out = playback.len() / self.playback_channels;
        let frames = frames_in.min(frames_out).min(MAX_FRAMES);

        playback.fill(0.0);
        if frames == 0 {
            return;
        }

        for (channel, scratch) in self.capture_scratch.iter_mut().enumerate() {
            for frame in 0..frames {
                scratch[frame] = capture[frame * self.capture_channels + channel];
            }
        }

        let processed = {
            let capture_refs: Vec<&[f32]> = self.capture_scratch.iter().map(|c| &c[..frames]).collect();
            let mut playback_refs: Vec<&mut [f32]> =
                self.playback_scratch.iter_mut().map(|p| &mut p[..frames]).collect();
            self.graph.run_period(PeriodIo { capture: &capture_refs, playback: &mut playback_refs })
        };

        for (channel, scratch) in self.playback_scratch.iter().enumerate() {
            for frame in 0..processed {
                playback[frame * self.playback_channels + channel] = scratch[frame];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterchain_graph::{GraphBuilder, GraphDescription, GraphPlanner, PlanParams};
    use filterchain_registry::PluginRegistry;

    fn engine(json: &str, capture: usize, playback: usize) -> RealtimeEngine {
        let registry = PluginRegistry::new();
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        let draft = GraphBuilder::new(&registry).build(&desc).unwrap();
        let graph = GraphPlanner::new(&registry)
            .plan(draft, PlanParams { sample_rate: 48000.0, capture_channels: capture, playback_channels: playback })
            .unwrap();
        RealtimeEngine::new(graph)
    }

    #[test]
    fn mono_copy_roundtrips_through_interleave() {
        let mut eng = engine(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 1, 1);
        let input: Vec<f32> = (0..32).map(|n| n as f32 * 0.1).collect();
        let mut output = vec![0.0f32; 32];
        eng.process_interleaved(&input, &mut output);
        assert_eq!(output, input);
    }

    #[test]
    fn stereo_duplication_keeps_channels_independent() {
        let mut eng = engine(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 2, 2);
        assert_eq!(eng.capture_channels(), 2);
        assert_eq!(eng.playback_channels(), 2);

        let frames = 16;
        let mut input = vec![0.0f32; frames * 2];
        for f in 0..frames {
            input[f * 2] = 1.0;
            input[f * 2 + 1] = -1.0;
        }
        let mut output = vec![0.0f32; frames * 2];
        eng.process_interleaved(&input, &mut output);
        for f in 0..frames {
            assert_eq!(output[f * 2], 1.0);
            assert_eq!(output[f * 2 + 1], -1.0);
        }
    }

    #[test]
    fn short_capture_yields_silent_tail() {
        let mut eng = engine(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 1, 1);
        let input = vec![1.0f32; 4];
        let mut output = vec![9.0f32; 8];
        eng.process_interleaved(&input, &mut output);
        assert_eq!(&output[..4], &[1.0; 4]);
        assert_eq!(&output[4..], &[0.0; 4]);
    }
}
