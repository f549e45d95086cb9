//! Graph Executor (§4.4): runs the planned graph once per audio period.
//!
//! No allocation, no blocking, no syscalls on this path — every buffer is
//! pre-bound by the planner. The only per-period work is copying capture
//! samples into the external-input scratch slots, running every handle in
//! topological order, and copying the external-output scratch slots out to
//! the playback buffer.

use filterchain_core::buffers::MAX_FRAMES;

use crate::planner::Graph;

/// One period's capture/playback data, planar per external channel.
///
/// `capture[i]` and `playback[i]` correspond 1:1 to `graph.input[i]` and
/// `graph.output[i]`. A slice may be empty — the surrounding framework's
/// `stream_dequeue_*` transiently returning none (§4.4) is modeled as an
/// empty slice for every channel on the affected side.
pub struct PeriodIo<'a> {
    pub capture: &'a [&'a [f32]],
    pub playback: &'a mut [&'a mut [f32]],
}

impl Graph {
    /// Run one audio period. Returns the number of frames actually
    /// processed (zero if the period was skipped because no capture or
    /// playback data was available).
    ///
    /// Never errors (§4.6): an unavailable buffer degrades to a skipped
    /// period, and a `"null"` external slot degrades to silence.
    pub fn run_period(&mut self, io: PeriodIo<'_>) -> usize {
        let capture_frames = io.capture.iter().map(|c| c.len()).min().unwrap_or(0);
        let playback_frames = io.playback.iter().map(|p| p.len()).min().unwrap_or(0);
        let frames = capture_frames.min(playback_frames).min(MAX_FRAMES);
        if frames == 0 {
            return 0;
        }

        for (slot, capture) in self.input.iter().zip(io.capture.iter()) {
            if let Some(buffer) = slot.buffer {
                self.pool.write(buffer)[..frames].copy_from_slice(&capture[..frames]);
            }
        }

        self.pool.reset_discard(frames);

        for &(node_idx, instance) in &self.hndl {
            self.nodes[node_idx].handles[instance].run(&self.pool, frames);
        }

        for (slot, playback) in self.output.iter().zip(io.playback.iter_mut()) {
            match slot.buffer {
                Some(buffer) => playback[..frames].copy_from_slice(&self.pool.read(buffer)[..frames]),
                None => playback[..frames].fill(0.0),
            }
        }

        frames
    }
}
