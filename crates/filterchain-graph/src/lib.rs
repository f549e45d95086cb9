//! Filterchain Graph — the graph description schema, builder, planner,
//! executor, and control plane for the filter chain engine.
//!
//! This crate implements §4 of the design: compiling a declarative graph
//! description (§6) into an executable, topologically ordered plan, and
//! running that plan once per audio period with strictly bounded,
//! allocation-free work.
//!
//! # Pipeline
//!
//! ```text
//! GraphDescription --[builder]--> GraphDraft --[planner]--> Graph --[executor]--> samples
//! ```
//!
//! - [`description`] — the JSON-shaped description tree (§6) and its port
//!   reference syntax.
//! - [`draft`] — construction-time nodes/links/linkage (§3), produced by
//!   [`builder::GraphBuilder`].
//! - [`planner`] — computes `n_hndl`, topologically orders nodes, allocates
//!   scratch buffers, and produces the execution-ready [`planner::Graph`].
//! - [`executor`] — runs one audio period against a [`planner::Graph`]
//!   (method on [`planner::Graph`] itself; see [`executor::PeriodIo`]).
//! - [`control_plane`] — parameter info/snapshot/update and state reset
//!   (also methods on [`planner::Graph`]).
//!
//! [`build_and_plan`] is the common-case entry point that runs the builder
//! and planner back to back.

pub mod builder;
pub mod control_plane;
pub mod description;
pub mod draft;
pub mod executor;
pub mod planner;

pub use builder::GraphBuilder;
pub use description::{GraphDescription, LinkDescription, NodeDescription, PortRef};
pub use draft::{GraphDraft, Link, Node, PortLinkage};
pub use executor::PeriodIo;
pub use planner::{ControlPortEntry, ExternalSlot, Graph, GraphPlanner, PlanParams, PlannedNode};

use filterchain_core::error::Result;
use filterchain_registry::PluginRegistry;

/// Parse `json`, build, and plan it in one call — the common path for a
/// host that isn't mutating the draft between the two stages.
pub fn build_and_plan(json: &str, registry: &PluginRegistry, params: PlanParams) -> Result<Graph> {
    let description: GraphDescription =
        serde_json::from_str(json).map_err(|e| filterchain_core::error::EngineError::Invalid(e.to_string()))?;
    let draft = GraphBuilder::new(registry).build(&description)?;
    GraphPlanner::new(registry).plan(draft, params)
}
