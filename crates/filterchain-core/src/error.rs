//! Error kinds propagated by graph construction, planning, and control updates.
//!
//! Execution (`GraphExecutor::run_period`, in `filterchain-graph`) never returns
//! one of these: the audio thread degrades instead of erroring (§4.4/§4.6 of
//! the design). These variants are for the config thread only — building,
//! planning, and parameter updates.

use thiserror::Error;

/// Errors returned by the builder, planner, and registry.
///
/// Mirrors the six propagated error kinds: malformed/cyclic descriptions,
/// unresolved references, unsupported families, port contention, allocation
/// failure, and opaque loader I/O failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed description, a cycle in the link graph, a mismatched
    /// capture/playback channel ratio, or zero declared inputs/outputs.
    #[error("invalid graph: {0}")]
    Invalid(String),

    /// An unknown port, node, label, or plugin path was referenced.
    #[error("not found: {0}")]
    NotFound(String),

    /// An unknown plugin family, or a descriptor with no audio ports in
    /// either direction.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A port is already externally bound or already terminates a link.
    ///
    /// Carries a remediation hint naming the builtin that resolves the
    /// conflict (`mixer` for fan-in, `copy` for fan-out), matching the
    /// reference engine's diagnostic text.
    #[error("port busy: {detail} (hint: insert a `{hint}` node)")]
    Busy {
        /// Description of which port was already bound or linked.
        detail: String,
        /// Name of the builtin plugin that resolves the conflict.
        hint: &'static str,
    },

    /// Scratch buffer or handle allocation failed.
    #[error("allocation failed: {0}")]
    NoMem(String),

    /// The plugin family's loader failed; the underlying error is opaque to
    /// the engine and propagated as-is.
    #[error("plugin loader failed: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    /// Construct a [`EngineError::Busy`] with the fan-in remediation hint.
    pub fn busy_fan_in(detail: impl Into<String>) -> Self {
        EngineError::Busy { detail: detail.into(), hint: "mixer" }
    }

    /// Construct a [`EngineError::Busy`] with the fan-out remediation hint.
    pub fn busy_fan_out(detail: impl Into<String>) -> Self {
        EngineError::Busy { detail: detail.into(), hint: "copy" }
    }
}

/// Convenience alias for fallible config-thread operations.
pub type Result<T> = core::result::Result<T, EngineError>;
