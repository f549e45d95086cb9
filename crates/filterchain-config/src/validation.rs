//! Graph description validation.
//!
//! [`GraphBuilder`](filterchain_graph::GraphBuilder) already validates a
//! description as it builds — but it stops at the first problem. This
//! module exists for the CLI's `validate` command and similar pre-flight
//! checks: it walks the whole description up front and collects every
//! problem it finds against a [`PluginRegistry`], so a user fixing a
//! preset sees all of it in one pass rather than one error at a time.

use std::collections::HashSet;

use filterchain_core::descriptor::{Direction, Kind};
use filterchain_graph::description::coerce_control_value;
use filterchain_graph::{GraphDescription, NodeDescription};
use filterchain_registry::PluginRegistry;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A node names a family/label the registry doesn't recognize.
    #[error("node '{node}': unknown family/label '{family}'/'{label}': {reason}")]
    UnknownFamily { node: String, family: String, label: String, reason: String },

    /// A node's `control` map names a port that doesn't exist.
    #[error("node '{node}': unknown control port '{port}'")]
    UnknownControlPort { node: String, port: String },

    /// A control value isn't a bool or number.
    #[error("node '{node}': control '{port}' is not a bool or number")]
    InvalidControlValue { node: String, port: String },

    /// A control value is outside the port's declared range.
    #[error("node '{node}': control '{port}' value {value} out of range [{min}, {max}]")]
    OutOfRange { node: String, port: String, value: f32, min: f32, max: f32 },

    /// A node name is declared more than once.
    #[error("duplicate node name '{0}'")]
    DuplicateNodeName(String),

    /// Multiple validation errors collected from one pass.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate every node in `description` against `registry`, collecting
/// every problem found rather than stopping at the first.
pub fn validate_description(description: &GraphDescription, registry: &PluginRegistry) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut seen_names = HashSet::new();

    for node in &description.nodes {
        if !seen_names.insert(node.name.as_str()) {
            errors.push(ValidationError::DuplicateNodeName(node.name.clone()));
        }
        validate_node(node, registry, &mut errors);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn validate_node(node: &NodeDescription, registry: &PluginRegistry, errors: &mut Vec<ValidationError>) {
    let family_path = if node.family == "builtin" { "builtin" } else { node.plugin.as_deref().unwrap_or("") };

    let descriptor = match registry.descriptor(&node.family, family_path, &node.label) {
        Ok(d) => d,
        Err(e) => {
            errors.push(ValidationError::UnknownFamily {
                node: node.name.clone(),
                family: node.family.clone(),
                label: node.label.clone(),
                reason: e.to_string(),
            });
            return;
        }
    };

    for (key, value) in &node.control {
        let Some(port) = descriptor.find_port(key, Kind::Control, Direction::In) else {
            errors.push(ValidationError::UnknownControlPort { node: node.name.clone(), port: key.clone() });
            continue;
        };
        let Some(numeric) = coerce_control_value(value) else {
            errors.push(ValidationError::InvalidControlValue { node: node.name.clone(), port: key.clone() });
            continue;
        };
        if port.min != port.max && (numeric < port.min || numeric > port.max) {
            errors.push(ValidationError::OutOfRange {
                node: node.name.clone(),
                port: key.clone(),
                value: numeric,
                min: port.min,
                max: port.max,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GraphDescription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_a_well_formed_description() {
        let registry = PluginRegistry::new();
        let desc = parse(
            r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer","control":{"Gain 1":0.5}}]}"#,
        );
        assert!(validate_description(&desc, &registry).is_ok());
    }

    #[test]
    fn reports_unknown_family() {
        let registry = PluginRegistry::new();
        let desc = parse(r#"{"nodes":[{"type":"builtin","name":"m","label":"no_such_label"}]}"#);
        let err = validate_description(&desc, &registry).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownFamily { .. }));
    }

    #[test]
    fn reports_unknown_control_port() {
        let registry = PluginRegistry::new();
        let desc = parse(r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer","control":{"NoSuch":1.0}}]}"#);
        let err = validate_description(&desc, &registry).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownControlPort { .. }));
    }

    #[test]
    fn reports_out_of_range_control_value() {
        let registry = PluginRegistry::new();
        let desc = parse(r#"{"nodes":[{"type":"builtin","name":"m","label":"mixer","control":{"Gain 1":99.0}}]}"#);
        let err = validate_description(&desc, &registry).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn reports_duplicate_node_names() {
        let registry = PluginRegistry::new();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"copy"},
                {"type":"builtin","name":"a","label":"copy"}
            ]}"#,
        );
        let err = validate_description(&desc, &registry).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateNodeName(_)));
    }

    #[test]
    fn collects_multiple_errors_in_one_pass() {
        let registry = PluginRegistry::new();
        let desc = parse(
            r#"{"nodes":[
                {"type":"builtin","name":"a","label":"no_such_label"},
                {"type":"builtin","name":"b","label":"mixer","control":{"NoSuch":1.0}}
            ]}"#,
        );
        let err = validate_description(&desc, &registry).unwrap_err();
        match err {
            ValidationError::Multiple(errs) => assert_eq!(errs.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }
}
