//! Graph Builder (§4.2): parses a [`GraphDescription`] into a [`GraphDraft`]
//! of resolved nodes and links.
//!
//! Runs once, on the config thread, before planning. Returns on the first
//! error; partial state (nodes/links already created) remains valid for
//! the caller to drop.

use filterchain_core::descriptor::{Direction, Kind};
use filterchain_core::error::{EngineError, Result};
use filterchain_registry::PluginRegistry;

use crate::description::{GraphDescription, LinkDescription, NodeDescription, PortRef, coerce_control_value};
use crate::draft::{GraphDraft, Link, Node};

/// Parses and resolves a [`GraphDescription`] against a [`PluginRegistry`].
pub struct GraphBuilder<'r> {
    registry: &'r PluginRegistry,
}

impl<'r> GraphBuilder<'r> {
    /// Build against `registry`, which must already have every family the
    /// description's nodes reference (builtin is always present).
    pub fn new(registry: &'r PluginRegistry) -> Self {
        GraphBuilder { registry }
    }

    /// Parse and resolve `description` into a [`GraphDraft`].
    pub fn build(&self, description: &GraphDescription) -> Result<GraphDraft> {
        if description.nodes.is_empty() {
            return Err(EngineError::Invalid("graph must declare at least one node".into()));
        }

        let mut nodes = Vec::with_capacity(description.nodes.len());
        for entry in &description.nodes {
            nodes.push(self.build_node(entry)?);
        }

        let mut draft =
            GraphDraft { nodes, links: Vec::new(), input_refs: description.inputs.clone(), output_refs: description.outputs.clone() };

        for link in &description.links {
            self.add_link(&mut draft, link)?;
        }

        Ok(draft)
    }

    fn build_node(&self, entry: &NodeDescription) -> Result<Node> {
        let family_tag = entry.family.clone();
        let family_path = if entry.family == "builtin" { "builtin".to_string() } else {
            entry
                .plugin
                .clone()
                .ok_or_else(|| EngineError::Invalid(format!("node '{}': non-builtin family requires 'plugin'", entry.name)))?
        };
        let descriptor = self.registry.descriptor(&family_tag, &family_path, &entry.label)?;

        let mut node = Node::new(entry.name.clone(), family_tag, family_path, descriptor, entry.config.clone());

        for (key, value) in &entry.control {
            let port_index = node
                .find_port(key, Kind::Control, Direction::In)
                .ok_or_else(|| EngineError::NotFound(format!("node '{}': no control input port '{key}'", entry.name)))?;
            let numeric = coerce_control_value(value)
                .ok_or_else(|| EngineError::Invalid(format!("node '{}': control '{key}' is not a bool or number", entry.name)))?;
            node.control_values[port_index].as_ref().expect("control port has a value cell").set(numeric);
        }

        Ok(node)
    }

    fn add_link(&self, draft: &mut GraphDraft, link: &LinkDescription) -> Result<()> {
        let (output_node, output_port) =
            self.resolve(draft, &link.output, draft.first_node(), Kind::Audio, Direction::Out)?;
        let (input_node, input_port) = self.resolve(draft, &link.input, draft.last_node(), Kind::Audio, Direction::In)?;

        if output_node == input_node {
            return Err(EngineError::Invalid(format!(
                "link '{}' -> '{}': a node cannot link to itself",
                link.output, link.input
            )));
        }

        let input_linkage = &draft.nodes[input_node].port_links[input_port];
        if input_linkage.external.is_some() || input_linkage.input_link.is_some() {
            return Err(EngineError::busy_fan_in(format!(
                "input '{}:{}' already bound",
                draft.nodes[input_node].name, link.input
            )));
        }

        let link_index = draft.links.len();
        draft.links.push(Link { output_node, output_port, input_node, input_port });
        draft.nodes[input_node].port_links[input_port].input_link = Some(link_index);
        draft.nodes[output_node].port_links[output_port].output_links.push(link_index);
        draft.nodes[input_node].n_deps += 1;
        Ok(())
    }

    /// Resolve a port reference from a `links[]` entry, applying the
    /// contextual default node (first node for outputs, last node for
    /// inputs — §4.2) when the reference omits a node name.
    fn resolve(
        &self,
        draft: &GraphDraft,
        raw: &str,
        default_node: usize,
        kind: Kind,
        direction: Direction,
    ) -> Result<(usize, usize)> {
        let port_ref = PortRef::parse(raw);
        let node_index = match port_ref.node {
            Some(name) => draft.node_index(name).ok_or_else(|| EngineError::NotFound(format!("no node named '{name}'")))?,
            None => default_node,
        };
        let node = &draft.nodes[node_index];
        let port_index = node
            .find_port(port_ref.port, kind, direction)
            .ok_or_else(|| EngineError::NotFound(format!("node '{}': no matching port '{}'", node.name, port_ref.port)))?;
        Ok((node_index, port_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterchain_registry::PluginRegistry;

    fn registry() -> PluginRegistry {
        PluginRegistry::new()
    }

    fn parse(json: &str) -> GraphDescription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_node_no_links() {
        let reg = registry();
        let desc = parse(r#"{"nodes":[{"type":"builtin","name":"cp","label":"copy"}]}"#);
        let draft = GraphBuilder::new(&reg).build(&desc).unwrap();
        assert_eq!(draft.nodes.len(), 1);
        assert!(draft.links.is_empty());
    }

    #[test]
    fn link_wires_two_nodes_and_tracks_deps() {
        let reg = registry();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"}
            ],"links":[{"output":"a:Out","input":"b:In"}]}"#,
        );
        let draft = GraphBuilder::new(&reg).build(&desc).unwrap();
        assert_eq!(draft.links.len(), 1);
        assert_eq!(draft.nodes[1].n_deps, 1);
        assert_eq!(draft.nodes[0].n_deps, 0);
    }

    #[test]
    fn double_binding_an_input_is_busy() {
        let reg = registry();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"},
                {"type":"builtin","name":"c","label":"copy"}
            ],"links":[
                {"output":"a:Out","input":"c:In"},
                {"output":"b:Out","input":"c:In"}
            ]}"#,
        );
        let err = GraphBuilder::new(&reg).build(&desc).unwrap_err();
        assert!(matches!(err, EngineError::Busy { .. }));
    }

    #[test]
    fn unknown_port_is_not_found() {
        let reg = registry();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"copy"}
            ],"links":[{"output":"a:NoSuchPort","input":"b:In"}]}"#,
        );
        let err = GraphBuilder::new(&reg).build(&desc).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn control_values_are_set_by_name() {
        let reg = registry();
        let desc = parse(
            r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer","control":{"Gain 1": 0.5}}]}"#,
        );
        let draft = GraphBuilder::new(&reg).build(&desc).unwrap();
        let port = draft.nodes[0].find_port("Gain 1", Kind::Control, Direction::In).unwrap();
        assert_eq!(draft.nodes[0].control_values[port].as_ref().unwrap().get(), 0.5);
    }

    #[test]
    fn fan_out_from_one_output_is_allowed() {
        let reg = registry();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"b","label":"bq_lowpass"},
                {"type":"builtin","name":"c","label":"bq_highpass"}
            ],"links":[
                {"output":"a:Out","input":"b:In"},
                {"output":"a:Out","input":"c:In"}
            ]}"#,
        );
        let draft = GraphBuilder::new(&reg).build(&desc).unwrap();
        assert_eq!(draft.nodes[0].port_links[draft.nodes[0].find_port("Out", Kind::Audio, Direction::Out).unwrap()]
            .output_links
            .len(), 2);
    }
}
