use serde::{Deserialize, Serialize};

use super::error::OverlayError;

/// A node as handed over by ingestion: just its display label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Label shown for the focused node.
	#[serde(default)]
	pub title: String,
}

/// An edge between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Index of the first endpoint.
	pub source: usize,
	/// Index of the second endpoint.
	pub target: usize,
}

/// The plain graph value a session is launched with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Nodes in index order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Edges by node index; out-of-range ones are dropped at launch.
	#[serde(default)]
	pub edges: Vec<GraphLink>,
}

impl GraphData {
	/// Parses a graph from JSON. Missing arrays default to empty.
	pub fn from_json(json: &str) -> Result<Self, OverlayError> {
		Ok(serde_json::from_str(json)?)
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
