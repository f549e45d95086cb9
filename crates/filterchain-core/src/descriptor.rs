//! Plugin descriptors: the immutable metadata of a plugin label.
//!
//! A [`Descriptor`] enumerates a fixed, ordered list of ports and the
//! capability flags of the label it describes. It is produced once by a
//! [`PluginFamily`](crate::plugin::PluginFamily)'s `make_desc` and cached by
//! the registry (`filterchain_registry::PluginRegistry`) keyed by
//! `(plugin, label)`.

use bitflags::bitflags;

/// Which side of a link a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Data flows into the node through this port.
    In,
    /// Data flows out of the node through this port.
    Out,
}

/// Whether a port carries an audio signal or a single control scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Per-sample audio signal, bound to a scratch or external buffer.
    Audio,
    /// Single `f32` scalar, read/written directly without buffering.
    Control,
}

bitflags! {
    /// Bit flags describing how a control port's numeric value should be
    /// interpreted and published.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PortHints: u8 {
        /// The value is a boolean, published/accepted as `value > 0`.
        const BOOLEAN = 0b0000_0001;
        /// The value is conceptually an integer (still stored as `f32`).
        const INTEGER = 0b0000_0010;
        /// The value is expressed as a fraction of the current sample rate
        /// and must be scaled by `rate` before publication.
        const SAMPLE_RATE = 0b0000_0100;
    }
}

bitflags! {
    /// Descriptor-level capability flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// The handle accepts a true null pointer on unconnected audio
        /// ports, instead of requiring a pre-bound silence/discard buffer.
        const SUPPORTS_NULL_DATA = 0b0000_0001;
    }
}

/// One entry in a [`Descriptor`]'s port list.
#[derive(Debug, Clone)]
pub struct PortSpec {
    /// Port name, matched against port-reference syntax (`"node:name"`).
    pub name: String,
    /// Dense index of this port within the descriptor's full port list —
    /// the index `connect_port` expects.
    pub index: usize,
    pub direction: Direction,
    pub kind: Kind,
    pub hints: PortHints,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl PortSpec {
    /// Construct an audio port (no numeric range, hints always empty).
    pub fn audio(name: impl Into<String>, index: usize, direction: Direction) -> Self {
        PortSpec {
            name: name.into(),
            index,
            direction,
            kind: Kind::Audio,
            hints: PortHints::empty(),
            default: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Construct a control port with an explicit default/min/max range.
    #[allow(clippy::too_many_arguments)]
    pub fn control(
        name: impl Into<String>,
        index: usize,
        direction: Direction,
        hints: PortHints,
        default: f32,
        min: f32,
        max: f32,
    ) -> Self {
        PortSpec { name: name.into(), index, direction, kind: Kind::Control, hints, default, min, max }
    }
}

/// The immutable metadata of one plugin label: its port list and
/// capabilities.
///
/// Produced by [`PluginFamily::make_desc`](crate::plugin::PluginFamily::make_desc)
/// and shared (`Arc`) across every node that instantiates the same label.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Family-qualified path this descriptor was resolved from (`"builtin"`
    /// for built-in plugins).
    pub path: String,
    /// Label within the plugin (e.g. `"bq_lowpass"`, `"mixer"`).
    pub label: String,
    /// Ports in declaration order, as returned by the family loader.
    pub ports: Vec<PortSpec>,
    pub capabilities: Capabilities,
}

impl Descriptor {
    /// Dense indices of audio-input ports, in declaration order.
    pub fn audio_inputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.kind == Kind::Audio && p.direction == Direction::In)
    }

    /// Dense indices of audio-output ports, in declaration order.
    pub fn audio_outputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.kind == Kind::Audio && p.direction == Direction::Out)
    }

    /// Control-input ports ("control" ports in the PipeWire sense — the ones
    /// the control plane writes to and publishes parameter info for).
    pub fn control_inputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.kind == Kind::Control && p.direction == Direction::In)
    }

    /// Control-output ("notify") ports.
    pub fn control_outputs(&self) -> impl Iterator<Item = &PortSpec> {
        self.ports.iter().filter(|p| p.kind == Kind::Control && p.direction == Direction::Out)
    }

    /// Resolve a port reference fragment (a name, or a dense numeric index)
    /// against this descriptor's ports, restricted to `kind`/`direction`.
    ///
    /// Returns `None` if nothing matches — callers map that to `NOT_FOUND`.
    pub fn find_port(&self, reference: &str, kind: Kind, direction: Direction) -> Option<&PortSpec> {
        if let Ok(idx) = reference.parse::<usize>() {
            return self.ports.iter().find(|p| p.index == idx && p.kind == kind && p.direction == direction);
        }
        self.ports.iter().find(|p| p.name == reference && p.kind == kind && p.direction == direction)
    }

    /// A descriptor is only usable in a graph if it has at least one audio
    /// port in either direction (§4.6: "descriptor with no audio ports in
    /// either direction is rejected").
    pub fn has_any_audio_port(&self) -> bool {
        self.ports.iter().any(|p| p.kind == Kind::Audio)
    }
}
