//! Construction-time graph state (§3 "Node"/"Port"/"Link"): the mutable
//! structures the [`builder`](crate::builder) fills in and the
//! [`planner`](crate::planner) consumes and completes into a [`Graph`](crate::planner::Graph).
//!
//! Arena-indexed, not pointer-linked (§9 "Graph storage"): nodes and links
//! live in flat `Vec`s and refer to each other by index, so there is no
//! ownership cycle to unwind — dropping the `Vec`s is enough.

use std::sync::Arc;

use filterchain_core::control::{ControlValue, SharedControl};
use filterchain_core::descriptor::{Descriptor, Direction, Kind};
use serde_json::value::RawValue;

/// Index of a node within [`GraphDraft::nodes`].
pub type NodeIndex = usize;
/// Index of a link within [`GraphDraft::links`].
pub type LinkIndex = usize;

/// Per-port linkage bookkeeping, one entry per descriptor port index.
///
/// Only the entries for audio ports are ever populated; control ports have
/// no linkage (§3: "control ports do not participate in links").
#[derive(Debug, Clone, Default)]
pub struct PortLinkage {
    /// The single incoming link, for an audio *input* port (§3 I1: at most
    /// one link per input).
    pub input_link: Option<LinkIndex>,
    /// Fan-out: every outgoing link, for an audio *output* port.
    pub output_links: Vec<LinkIndex>,
    /// Set when this port is bound to an external graph input/output slot
    /// instead of (or in lieu of) a link. Mutually exclusive with the link
    /// fields above — the builder/planner reject double-binding with
    /// [`EngineError::Busy`](filterchain_core::error::EngineError::Busy).
    pub external: Option<usize>,
}

/// One logical vertex (§3 "Node"). Ports are indexed by the descriptor's
/// dense port index; `control_values[p]` and `port_links[p]` are only
/// meaningful when `descriptor.ports[p]` is the matching kind.
pub struct Node {
    /// User-chosen name, unique within the graph.
    pub name: String,
    /// Plugin family tag this node's descriptor was resolved from.
    pub family_tag: String,
    /// Plugin path (canonicalized to `"builtin"` for the built-in family).
    pub family_path: String,
    /// Shared, immutable port metadata.
    pub descriptor: Arc<Descriptor>,
    /// Verbatim `config = { ... }` slice, handed to `instantiate` as-is.
    pub config: Option<Box<RawValue>>,
    /// One shared control cell per control port (both directions), `None`
    /// for audio port indices. Created once at build time and cloned into
    /// every instance's handle during planning — a node's controls are
    /// shared by all `n_hndl` instances of that node.
    pub control_values: Vec<Option<SharedControl>>,
    /// Audio-port linkage, `Default` (empty) for control port indices.
    pub port_links: Vec<PortLinkage>,
    /// Number of incoming links, decremented during the planner's
    /// topological walk; zero means the node is immediately ready.
    pub n_deps: usize,
}

impl Node {
    /// Create a node with default control values and empty linkage, sized
    /// from `descriptor`.
    pub fn new(
        name: String,
        family_tag: String,
        family_path: String,
        descriptor: Arc<Descriptor>,
        config: Option<Box<RawValue>>,
    ) -> Self {
        let n_ports = descriptor.ports.len();
        let mut control_values = vec![None; n_ports];
        for port in &descriptor.ports {
            if port.kind == Kind::Control {
                control_values[port.index] = Some(Arc::new(ControlValue::new(port.default)));
            }
        }
        Node {
            name,
            family_tag,
            family_path,
            descriptor,
            config,
            control_values,
            port_links: vec![PortLinkage::default(); n_ports],
            n_deps: 0,
        }
    }

    /// Resolve a port-reference fragment against this node's descriptor.
    pub fn find_port(&self, reference: &str, kind: Kind, direction: Direction) -> Option<usize> {
        self.descriptor.find_port(reference, kind, direction).map(|p| p.index)
    }
}

/// A directed audio edge, output port → input port, between two distinct
/// nodes (§3 "Link").
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub output_node: NodeIndex,
    pub output_port: usize,
    pub input_node: NodeIndex,
    pub input_port: usize,
}

/// The builder's output: nodes and links resolved from the description,
/// plus the unresolved external input/output reference lists (resolved by
/// the planner, which alone knows the stream's channel counts).
pub struct GraphDraft {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Raw `inputs[]` strings (`"null"` kept literal), or `None` if the
    /// description omitted the field (derive from the first node).
    pub input_refs: Option<Vec<String>>,
    /// Raw `outputs[]` strings, or `None` (derive from the last node).
    pub output_refs: Option<Vec<String>>,
}

impl GraphDraft {
    /// Index of the node declared first — the default node for bare link
    /// *output* references and for deriving graph inputs.
    pub fn first_node(&self) -> NodeIndex {
        0
    }

    /// Index of the node declared last — the default node for bare link
    /// *input* references and for deriving graph outputs.
    pub fn last_node(&self) -> NodeIndex {
        self.nodes.len() - 1
    }

    /// Look up a node by name.
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n.name == name)
    }
}
