//! Graph Planner (§4.3): validates fan-in, computes the channel-duplication
//! factor, topologically orders nodes, allocates scratch buffers, and binds
//! every port to a concrete [`BufferSlot`]. Consumes a [`GraphDraft`] and
//! produces an immutable, execution-ready [`Graph`].

use std::sync::Arc;

use filterchain_core::buffers::{BufferPool, BufferSlot, MAX_HNDL};
use filterchain_core::control::SharedControl;
use filterchain_core::descriptor::{Descriptor, Direction, Kind, PortHints, PortSpec};
use filterchain_core::error::{EngineError, Result};
use filterchain_core::plugin::PluginHandle;
use filterchain_registry::PluginRegistry;

use crate::description::PortRef;
use crate::draft::{GraphDraft, Link, Node};

/// Sample-rate, channel-count inputs to planning that only the surrounding
/// framework knows (§1 "out of scope... stream-rate/channel negotiation").
#[derive(Debug, Clone, Copy)]
pub struct PlanParams {
    pub sample_rate: f32,
    pub capture_channels: usize,
    pub playback_channels: usize,
}

/// One external graph-input or graph-output slot (§3 "Graph": `input[]`/
/// `output[]`). `buffer` is `None` for a `"null"` entry: the bound audio
/// port stays wired to the process-global silence/discard buffer and the
/// executor neither reads from nor writes to this slot.
#[derive(Debug, Clone, Copy)]
pub struct ExternalSlot {
    pub buffer: Option<BufferSlot>,
}

/// One entry in the flattened control-port list (§3 "Graph": `control_port[]`).
pub struct ControlPortEntry {
    pub node_name: String,
    pub port_name: String,
    pub port_index: usize,
    pub hints: PortHints,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub value: SharedControl,
}

/// A planned node: its descriptor, and its `n_hndl` running instances plus
/// the scratch buffers allocated for its audio outputs.
pub struct PlannedNode {
    pub name: String,
    pub descriptor: Arc<Descriptor>,
    pub handles: Vec<Box<dyn PluginHandle>>,
    /// Per audio-output-port index: one scratch buffer slot per instance,
    /// allocated lazily at the node's single topological visit.
    pub output_buffers: Vec<Option<Vec<BufferSlot>>>,
}

/// The fully planned, execution-ready graph (§3 "Graph"). Structurally
/// read-only once planning completes (I4): only `control_port[].value`
/// (via its atomic cell) may change while the executor runs.
pub struct Graph {
    pub nodes: Vec<PlannedNode>,
    pub links: Vec<Link>,
    /// Topological execution order: `(node_index, instance_index)` pairs.
    pub hndl: Vec<(usize, usize)>,
    pub input: Vec<ExternalSlot>,
    pub output: Vec<ExternalSlot>,
    pub control_port: Vec<ControlPortEntry>,
    pub pool: BufferPool,
    pub n_hndl: usize,
    pub sample_rate: f32,
}

/// Computes a [`Graph`] from a [`GraphDraft`] (§4.3).
pub struct GraphPlanner<'r> {
    registry: &'r PluginRegistry,
}

impl<'r> GraphPlanner<'r> {
    pub fn new(registry: &'r PluginRegistry) -> Self {
        GraphPlanner { registry }
    }

    pub fn plan(&self, draft: GraphDraft, params: PlanParams) -> Result<Graph> {
        let GraphDraft { mut nodes, links, input_refs, output_refs } = draft;

        // --- 1. Dimensioning ---
        let n_input = match &input_refs {
            Some(refs) => refs.len(),
            None => nodes[0].descriptor.audio_inputs().count(),
        };
        let last = nodes.len() - 1;
        let n_output = match &output_refs {
            Some(refs) => refs.len(),
            None => nodes[last].descriptor.audio_outputs().count(),
        };
        if n_input == 0 {
            return Err(EngineError::Invalid("graph declares zero audio inputs".into()));
        }
        if n_output == 0 {
            return Err(EngineError::Invalid("graph declares zero audio outputs".into()));
        }

        let mut n_hndl = params.capture_channels / n_input;
        let n_hndl_out = params.playback_channels / n_output;
        if n_hndl != n_hndl_out {
            return Err(EngineError::Invalid(format!(
                "channel ratio mismatch: capture={} / n_input={} = {} instances, \
                 playback={} / n_output={} = {} instances",
                params.capture_channels, n_input, n_hndl, params.playback_channels, n_output, n_hndl_out
            )));
        }
        if n_hndl == 0 {
            tracing::warn!(
                capture_channels = params.capture_channels,
                n_input,
                "n_hndl computed as 0, degrading to 1 (some ports will be silently silence-fed)"
            );
            n_hndl = 1;
        }
        if n_hndl > MAX_HNDL {
            tracing::warn!(n_hndl, max = MAX_HNDL, "clamping n_hndl to the hard maximum");
            n_hndl = MAX_HNDL;
        }

        // --- 2. Instantiation ---
        let mut pool = BufferPool::new();
        let mut planned_nodes: Vec<PlannedNode> = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut node_handles = Vec::with_capacity(n_hndl);
            for i in 0..n_hndl {
                let config = node.config.as_deref();
                let mut handle = self.registry.instantiate(
                    &node.family_tag,
                    &node.family_path,
                    &node.descriptor,
                    params.sample_rate,
                    i,
                    config,
                )?;
                for port in node.descriptor.audio_inputs() {
                    handle.connect_audio_input(port.index, BufferPool::SILENCE);
                }
                for port in node.descriptor.audio_outputs() {
                    handle.connect_audio_output(port.index, BufferPool::DISCARD);
                }
                for port in &node.descriptor.ports {
                    if port.kind == Kind::Control {
                        let value = node.control_values[port.index].clone().expect("control port has a value cell");
                        handle.connect_control(port.index, value);
                    }
                }
                handle.activate();
                node_handles.push(handle);
            }
            planned_nodes.push(PlannedNode {
                name: node.name.clone(),
                descriptor: Arc::clone(&node.descriptor),
                handles: node_handles,
                output_buffers: vec![None; node.descriptor.ports.len()],
            });
        }

        // --- 3. External binding ---
        let input =
            bind_external(&mut nodes, &mut planned_nodes, &mut pool, 0, n_hndl, input_refs, Direction::In)?;
        let output =
            bind_external(&mut nodes, &mut planned_nodes, &mut pool, last, n_hndl, output_refs, Direction::Out)?;

        // --- 4. Topological order and wiring ---
        let mut remaining_deps: Vec<usize> = nodes.iter().map(|n| n.n_deps).collect();
        let mut visited = vec![false; nodes.len()];
        let mut hndl = Vec::with_capacity(nodes.len() * n_hndl);
        let mut control_port = Vec::new();

        for _ in 0..nodes.len() {
            let next = (0..nodes.len()).find(|&i| !visited[i] && remaining_deps[i] == 0);
            let Some(idx) = next else { break };
            visited[idx] = true;

            wire_node(idx, &nodes, &links, &mut planned_nodes, &mut pool, n_hndl);

            for i in 0..n_hndl {
                hndl.push((idx, i));
            }
            for port in nodes[idx].descriptor.control_inputs() {
                control_port.push(ControlPortEntry {
                    node_name: nodes[idx].name.clone(),
                    port_name: port.name.clone(),
                    port_index: port.index,
                    hints: port.hints,
                    default: port.default,
                    min: port.min,
                    max: port.max,
                    value: nodes[idx].control_values[port.index].clone().expect("control port has a value cell"),
                });
            }

            let outgoing: Vec<usize> =
                nodes[idx].port_links.iter().flat_map(|p| p.output_links.iter().copied()).collect();
            for link_idx in outgoing {
                remaining_deps[links[link_idx].input_node] -= 1;
            }
        }

        if visited.iter().any(|v| !v) {
            return Err(EngineError::Invalid("graph contains a cycle".into()));
        }

        Ok(Graph { nodes: planned_nodes, links, hndl, input, output, control_port, pool, n_hndl, sample_rate: params.sample_rate })
    }
}

/// Resolve the `inputs[]`/`outputs[]` spec (or its first/last-node derived
/// default) against `node_idx`, directly binding each resolved port's
/// handles to a freshly allocated per-instance buffer (§4.3 step 3).
fn bind_external(
    nodes: &mut [Node],
    planned: &mut [PlannedNode],
    pool: &mut BufferPool,
    node_idx: usize,
    n_hndl: usize,
    refs: Option<Vec<String>>,
    direction: Direction,
) -> Result<Vec<ExternalSlot>> {
    let entries = refs.unwrap_or_else(|| {
        let ports: Vec<&PortSpec> = match direction {
            Direction::In => nodes[node_idx].descriptor.audio_inputs().collect(),
            Direction::Out => nodes[node_idx].descriptor.audio_outputs().collect(),
        };
        ports.into_iter().map(|p| p.name.clone()).collect()
    });

    let mut slots = Vec::with_capacity(entries.len() * n_hndl);
    for entry in &entries {
        if entry == "null" {
            slots.extend(std::iter::repeat(ExternalSlot { buffer: None }).take(n_hndl));
            continue;
        }

        let port_ref = PortRef::parse(entry);
        if let Some(name) = port_ref.node {
            if name != nodes[node_idx].name {
                return Err(EngineError::NotFound(format!(
                    "external reference '{entry}' must name the {} node ('{}')",
                    if direction == Direction::In { "first" } else { "last" },
                    nodes[node_idx].name
                )));
            }
        }
        let port_index = nodes[node_idx]
            .find_port(port_ref.port, Kind::Audio, direction)
            .ok_or_else(|| EngineError::NotFound(format!("external reference '{entry}' did not resolve to a port")))?;

        let linkage = &nodes[node_idx].port_links[port_index];
        let already_bound = linkage.external.is_some() || linkage.input_link.is_some() || !linkage.output_links.is_empty();
        if already_bound {
            return Err(match direction {
                Direction::In => EngineError::busy_fan_in(format!("'{entry}' already bound")),
                Direction::Out => EngineError::busy_fan_out(format!("'{entry}' already bound")),
            });
        }

        let mut per_instance = Vec::with_capacity(n_hndl);
        for i in 0..n_hndl {
            let slot = pool.allocate();
            per_instance.push(slot);
            match direction {
                Direction::In => planned[node_idx].handles[i].connect_audio_input(port_index, slot),
                Direction::Out => planned[node_idx].handles[i].connect_audio_output(port_index, slot),
            }
            slots.push(ExternalSlot { buffer: Some(slot) });
        }
        nodes[node_idx].port_links[port_index].external = Some(0);
        if direction == Direction::Out {
            planned[node_idx].output_buffers[port_index] = Some(per_instance);
        }
    }
    Ok(slots)
}

/// Bind one already-visited node's audio ports: inputs to their peer's
/// scratch buffer (or leave pre-bound silence/external binding alone),
/// outputs to a freshly allocated scratch buffer when they fan out.
fn wire_node(idx: usize, nodes: &[Node], links: &[Link], planned: &mut [PlannedNode], pool: &mut BufferPool, n_hndl: usize) {
    let node = &nodes[idx];

    for port in node.descriptor.audio_inputs() {
        let linkage = &node.port_links[port.index];
        if linkage.external.is_some() {
            continue;
        }
        let Some(link_idx) = linkage.input_link else { continue };
        let link = links[link_idx];
        let source_slots = planned[link.output_node].output_buffers[link.output_port]
            .clone()
            .expect("producing output port visited before its consumer (topological order)");
        for i in 0..n_hndl {
            planned[idx].handles[i].connect_audio_input(port.index, source_slots[i]);
        }
    }

    for port in node.descriptor.audio_outputs() {
        let linkage = &node.port_links[port.index];
        if linkage.external.is_some() || linkage.output_links.is_empty() {
            continue;
        }
        let mut slots = Vec::with_capacity(n_hndl);
        for i in 0..n_hndl {
            let slot = pool.allocate();
            planned[idx].handles[i].connect_audio_output(port.index, slot);
            slots.push(slot);
        }
        planned[idx].output_buffers[port.index] = Some(slots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::description::GraphDescription;

    fn plan_json(json: &str, capture: usize, playback: usize) -> Result<Graph> {
        let registry = PluginRegistry::new();
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        let draft = GraphBuilder::new(&registry).build(&desc).unwrap();
        GraphPlanner::new(&registry)
            .plan(draft, PlanParams { sample_rate: 48000.0, capture_channels: capture, playback_channels: playback })
    }

    #[test]
    fn identity_copy_single_channel() {
        let graph = plan_json(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 1, 1).unwrap();
        assert_eq!(graph.n_hndl, 1);
        assert_eq!(graph.hndl, vec![(0, 0)]);
        assert_eq!(graph.input.len(), 1);
        assert_eq!(graph.output.len(), 1);
    }

    #[test]
    fn duplication_across_two_channels() {
        let graph = plan_json(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 2, 2).unwrap();
        assert_eq!(graph.n_hndl, 2);
        assert_eq!(graph.hndl, vec![(0, 0), (0, 1)]);
        assert_eq!(graph.input.len(), 2);
    }

    #[test]
    fn mismatched_channel_ratio_is_invalid() {
        let err = plan_json(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 2, 3).unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)));
    }

    #[test]
    fn topological_order_respects_link_direction() {
        let graph = plan_json(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"}
            ],"links":[{"output":"a:Out","input":"b:In"}],
            "inputs":["a:In"],"outputs":["b:Out"]}"#,
            1,
            1,
        )
        .unwrap();
        assert_eq!(graph.hndl, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn cycle_is_rejected() {
        let err = plan_json(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"}
            ],"links":[
                {"output":"a:Out","input":"b:In"},
                {"output":"b:Out","input":"a:In"}
            ],
            "inputs":["a:In"],"outputs":["b:Out"]}"#,
            1,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Invalid(_)));
    }

    #[test]
    fn null_input_slot_leaves_port_silent() {
        let graph = plan_json(
            r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer"}],
               "inputs":["m:In 1","null"],"outputs":["m:Out"]}"#,
            2,
            1,
        )
        .unwrap();
        assert_eq!(graph.input.len(), 2);
        assert!(graph.input[0].buffer.is_some());
        assert!(graph.input[1].buffer.is_none());
    }

    #[test]
    fn fan_in_requires_a_mixer_not_two_links_to_one_input() {
        let err = plan_json(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"},
                {"type":"builtin","name":"c","label":"copy"}
            ],"links":[
                {"output":"a:Out","input":"c:In"},
                {"output":"b:Out","input":"c:In"}
            ]}"#,
            1,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Busy { .. }));
    }

    #[test]
    fn control_port_is_flattened_in_topological_order() {
        let graph = plan_json(
            r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer"}],
               "inputs":["m:In 1"],"outputs":["m:Out"]}"#,
            1,
            1,
        )
        .unwrap();
        assert!(graph.control_port.iter().any(|c| c.port_name == "Gain 1"));
    }

    #[test]
    fn zero_capture_channels_degrades_n_hndl_to_one() {
        let graph = plan_json(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#, 0, 0).unwrap();
        assert_eq!(graph.n_hndl, 1);
    }
}
