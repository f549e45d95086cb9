//! The declarative graph description (§6): the authoritative, loosely-typed
//! JSON contract the [`builder`](crate::builder) compiles into a [`GraphDraft`](crate::draft::GraphDraft).
//!
//! ```json
//! {
//!   "nodes": [
//!     { "type": "builtin", "name": "bq", "label": "bq_lowpass",
//!       "config": { "blocksize": 128 }, "control": { "Freq": 0.25 } }
//!   ],
//!   "links": [ { "output": "a:Out", "input": "b:In" } ],
//!   "inputs": [ "bq:In", "null" ],
//!   "outputs": [ "bq:Out" ]
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

/// Top-level description tree (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDescription {
    /// Nodes to instantiate, in declaration order. Declaration order
    /// determines the "first node" / "last node" defaults used for bare
    /// (node-less) port references and for the default `inputs`/`outputs`.
    pub nodes: Vec<NodeDescription>,
    /// Directed audio edges between node ports.
    #[serde(default)]
    pub links: Vec<LinkDescription>,
    /// External graph-input bindings. `None` means "derive from the first
    /// node's audio inputs, in port order" (§4.3 step 1).
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
    /// External graph-output bindings. `None` means "derive from the last
    /// node's audio outputs, in port order".
    #[serde(default)]
    pub outputs: Option<Vec<String>>,
}

/// One `nodes[]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Plugin family tag: `"builtin"`, `"family-a"`, or `"family-b"`.
    #[serde(rename = "type")]
    pub family: String,
    /// User-chosen node identifier, unique within the description.
    pub name: String,
    /// Path/URI the family loader resolves. The literal `"builtin"` is
    /// substituted whenever `family == "builtin"`, regardless of what (if
    /// anything) is written here.
    #[serde(default)]
    pub plugin: Option<String>,
    /// Label within the plugin (e.g. `"bq_lowpass"`, `"mixer"`).
    pub label: String,
    /// Opaque configuration, captured verbatim and handed to `instantiate`.
    #[serde(default)]
    pub config: Option<Box<RawValue>>,
    /// Initial control-port values, by name or dense numeric index.
    #[serde(default)]
    pub control: HashMap<String, Value>,
}

/// One `links[]` entry: a directed audio edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDescription {
    /// Output port reference (`"node:port"`, `"port"`, `"node:idx"`, `"idx"`).
    pub output: String,
    /// Input port reference, same syntax.
    pub input: String,
}

/// A parsed `"node:port"` reference. `node` is `None` when the colon was
/// omitted, in which case the caller supplies the contextual default node
/// (§4.2: first node for link outputs, last node for link inputs, the
/// node itself for control/config, explicit lookup for graph inputs/outputs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRef<'a> {
    pub node: Option<&'a str>,
    pub port: &'a str,
}

impl<'a> PortRef<'a> {
    /// Parse `"node:port"` or bare `"port"`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((node, port)) => PortRef { node: Some(node), port },
            None => PortRef { node: None, port: raw },
        }
    }
}

/// Coerce an inbound control-value JSON literal the way §4.5 specifies:
/// "Booleans map to `value > 0`; integers and doubles coerce to float."
pub fn coerce_control_value(value: &Value) -> Option<f32> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_ref_splits_on_colon() {
        assert_eq!(PortRef::parse("mixer:In 1"), PortRef { node: Some("mixer"), port: "In 1" });
        assert_eq!(PortRef::parse("In 1"), PortRef { node: None, port: "In 1" });
        assert_eq!(PortRef::parse("mixer:0"), PortRef { node: Some("mixer"), port: "0" });
    }

    #[test]
    fn coerces_bool_and_numeric_literals() {
        assert_eq!(coerce_control_value(&Value::Bool(true)), Some(1.0));
        assert_eq!(coerce_control_value(&Value::Bool(false)), Some(0.0));
        assert_eq!(coerce_control_value(&Value::from(2)), Some(2.0));
        assert_eq!(coerce_control_value(&Value::from(0.25)), Some(0.25));
        assert_eq!(coerce_control_value(&Value::String("nope".into())), None);
    }

    #[test]
    fn deserializes_a_minimal_description() {
        let json = r#"{
            "nodes": [
                { "type": "builtin", "name": "cp", "label": "copy" }
            ],
            "links": [],
            "inputs": ["cp:In"],
            "outputs": ["cp:Out"]
        }"#;
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.nodes.len(), 1);
        assert_eq!(desc.inputs.unwrap(), vec!["cp:In".to_string()]);
    }

    #[test]
    fn captures_config_verbatim() {
        let json = r#"{
            "nodes": [
                { "type": "builtin", "name": "d", "label": "delay", "config": { "max-delay": 2.0 } }
            ]
        }"#;
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.nodes[0].config.as_ref().unwrap().get(), r#"{ "max-delay": 2.0 }"#);
    }
}
