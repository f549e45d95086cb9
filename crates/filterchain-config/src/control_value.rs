//! Human-readable control-value parsing.
//!
//! A graph description's `control` map (§6) takes plain JSON booleans and
//! numbers. This module lets config files and CLI flags write friendlier
//! strings — `"-6dB"`, `"440Hz"`, `"100ms"` — and converts them down to the
//! plain `f32` a control port actually stores.

/// Parse a parameter value string into an f32.
///
/// Supports several formats:
/// - Plain numbers: `"0.5"`, `"1.2"`, `"-0.3"`
/// - Percentages: `"50%"`, `"120%"` (divided by 100)
/// - Decibels: `"-6dB"`, `"+3dB"` (converted to linear gain)
/// - Time in ms: `"100ms"` (converted to seconds)
/// - Time in s: `"1.5s"` (kept as seconds)
/// - Frequency in Hz: `"440Hz"`
/// - Frequency in kHz: `"1.2kHz"` (converted to Hz)
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }

    if let Some(db) = value.strip_suffix("dB").or_else(|| value.strip_suffix("db")) {
        return db.trim().parse::<f32>().ok().map(|v| libm::powf(10.0, v / 20.0));
    }

    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse::<f32>().ok().map(|v| v / 1000.0);
    }

    if let Some(s) = value.strip_suffix('s')
        && !value.ends_with("ms")
    {
        return s.trim().parse::<f32>().ok();
    }

    if let Some(khz) = value.strip_suffix("kHz").or_else(|| value.strip_suffix("khz")) {
        return khz.trim().parse::<f32>().ok().map(|v| v * 1000.0);
    }

    if let Some(hz) = value.strip_suffix("Hz").or_else(|| value.strip_suffix("hz")) {
        return hz.trim().parse::<f32>().ok();
    }

    value.parse::<f32>().ok()
}

/// Parse a `"node:port=value"` or `"port=value"` CLI-style control
/// assignment into its reference and numeric value.
pub fn parse_control_assignment(raw: &str) -> Option<(&str, f32)> {
    let (reference, value) = raw.split_once('=')?;
    let numeric = parse_param_value(value)?;
    Some((reference, numeric))
}
