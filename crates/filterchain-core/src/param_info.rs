//! Parameter info published for each control port (§4.5 "Parameter info
//! publication").
//!
//! One [`ParamInfo`] is emitted per entry in `graph.control_port[]`: a name,
//! a type derived from the port's hints, the descriptor default, and —
//! when the port declares a non-degenerate range — the `(min, max)` bounds.
//! Values hinted `SAMPLE_RATE` are scaled by the current rate before
//! publication, matching the descriptor's own unit (a `bq_lowpass`'s `Freq`
//! default is authored as a fraction of Nyquist, not a fixed Hz value).

use crate::descriptor::PortHints;

/// The published type of a control port's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Published and accepted as `value > 0`.
    Bool,
    /// Conceptually integral; still carried as `f32` internally.
    Int,
    /// Plain floating-point control value.
    Float,
}

impl ParamType {
    fn from_hints(hints: PortHints) -> Self {
        if hints.contains(PortHints::BOOLEAN) {
            ParamType::Bool
        } else if hints.contains(PortHints::INTEGER) {
            ParamType::Int
        } else {
            ParamType::Float
        }
    }
}

/// Published metadata for one control port.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    /// `"<node>:<port>"`, or bare `"<port>"` when `node` is the graph's
    /// single default node for control resolution.
    pub name: String,
    pub param_type: ParamType,
    pub default: f32,
    /// `Some((min, max))` when the descriptor declares a non-degenerate
    /// range (`min != max`); `None` for an unranged scalar.
    pub range: Option<(f32, f32)>,
}

impl ParamInfo {
    /// Build a [`ParamInfo`] for a control-input port.
    ///
    /// `rate` scales `default`/`min`/`max` when the port is hinted
    /// `SAMPLE_RATE`; pass the graph's current sample rate.
    pub fn from_port(
        node_name: &str,
        port_name: &str,
        hints: PortHints,
        default: f32,
        min: f32,
        max: f32,
        rate: f32,
    ) -> Self {
        let scale = if hints.contains(PortHints::SAMPLE_RATE) { rate } else { 1.0 };
        ParamInfo {
            name: format!("{node_name}:{port_name}"),
            param_type: ParamType::from_hints(hints),
            default: default * scale,
            range: if min == max { None } else { Some((min * scale, max * scale)) },
        }
    }
}

/// One `(name, current_value)` pair in a parameter snapshot (§4.5
/// "Parameter snapshot").
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue {
    pub name: String,
    pub value: f32,
}
