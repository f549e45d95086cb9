//! The single-writer, atomic control-value cell.
//!
//! Spec §5: "Control-data writes are single-scalar floats: tearing is
//! acceptable within audio semantics... atomic load/store on per-port
//! `control_data` is sufficient and required (no fences, no locks)."
//!
//! `AtomicU32` storing the bit pattern of an `f32` with `Ordering::Relaxed`
//! is exactly that contract: no fences, no locks, and a torn read is
//! impossible (each store is a single 32-bit write).

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A single control port's current value, shared between the config thread
/// (writer) and the audio thread (reader).
#[derive(Debug)]
pub struct ControlValue(AtomicU32);

impl ControlValue {
    /// Create a cell initialized to `value`.
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    /// Load the current value. Safe to call from any thread at any time.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Store a new value. Safe to call from any thread at any time.
    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Shared handle to a [`ControlValue`], cloned onto both the `Port` that
/// owns it and every plugin handle bound to it.
pub type SharedControl = Arc<ControlValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let v = ControlValue::new(0.25);
        assert_eq!(v.get(), 0.25);
        v.set(0.75);
        assert_eq!(v.get(), 0.75);
    }

    #[test]
    fn shared_across_clones_of_the_arc() {
        let v: SharedControl = Arc::new(ControlValue::new(1.0));
        let reader = Arc::clone(&v);
        v.set(2.0);
        assert_eq!(reader.get(), 2.0);
    }
}
