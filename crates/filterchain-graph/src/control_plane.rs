//! Control Plane (§4.5): parameter info publication, snapshotting, update
//! application, and the deactivate/activate state reset used on stream
//! transitions.
//!
//! Every operation here is config-thread-only except reading/writing a
//! single [`ControlValue`](filterchain_core::control::ControlValue) cell,
//! which is the audio thread's single-writer-safe atomic (§5).

use filterchain_core::param_info::{ParamInfo, ParamValue};

use crate::planner::{ControlPortEntry, Graph};

impl Graph {
    /// Published metadata for every control-input port, in `control_port[]`
    /// order. `SAMPLE_RATE`-hinted values are scaled by `self.sample_rate`.
    pub fn param_info(&self) -> Vec<ParamInfo> {
        self.control_port
            .iter()
            .map(|entry| {
                ParamInfo::from_port(&entry.node_name, &entry.port_name, entry.hints, entry.default, entry.min, entry.max, self.sample_rate)
            })
            .collect()
    }

    /// Current value of every control-input port, in `control_port[]` order.
    pub fn snapshot(&self) -> Vec<ParamValue> {
        self.control_port
            .iter()
            .map(|entry| ParamValue { name: format!("{}:{}", entry.node_name, entry.port_name), value: entry.value.get() })
            .collect()
    }

    /// Apply an inbound `(name, value)` update set. Returns the number of
    /// control ports actually changed; unknown names are silently ignored
    /// (§4.5: "forward-compatibility with new graphs").
    ///
    /// `name` is `"<node>:<port>"`, or a bare port name/dense index —
    /// matched against every node's control ports, first match wins.
    pub fn apply_update(&self, updates: &[(String, serde_json::Value)]) -> usize {
        let mut changed = 0;
        for (name, value) in updates {
            let Some(numeric) = crate::description::coerce_control_value(value) else { continue };
            if let Some(entry) = self.resolve_control(name) {
                entry.value.set(numeric);
                changed += 1;
            }
        }
        changed
    }

    fn resolve_control(&self, name: &str) -> Option<&ControlPortEntry> {
        match name.split_once(':') {
            Some((node, port)) => self.control_port.iter().find(|e| e.node_name == node && matches_port(e, port)),
            None => self.control_port.iter().find(|e| matches_port(e, name)),
        }
    }

    /// Discharge every handle's internal state by calling `deactivate` then
    /// `activate`, in topological (`hndl`) order — reverb tails, delay
    /// lines, and the like are cleared without rebuilding the graph.
    pub fn reset(&mut self) {
        for &(node_idx, instance) in &self.hndl {
            let handle = &mut self.nodes[node_idx].handles[instance];
            handle.deactivate();
            handle.activate();
        }
    }
}

fn matches_port(entry: &ControlPortEntry, port: &str) -> bool {
    entry.port_name == port || port.parse::<usize>().ok() == Some(entry.port_index)
}
