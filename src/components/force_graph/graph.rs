use std::f64::consts::PI;

use log::{debug, warn};

use super::types::GraphData;

/// A simulated node in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Index in the graph.
	pub id: usize,
	/// Display label.
	pub title: String,
	/// World position.
	pub x: f64,
	/// World position.
	pub y: f64,
	/// Velocity in world units per second.
	pub vx: f64,
	/// Velocity in world units per second.
	pub vy: f64,
	/// Exempt from integration.
	pub fixed: bool,
}

/// A validated spring between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	/// First endpoint.
	pub source: usize,
	/// Second endpoint.
	pub target: usize,
}

/// Nodes, edges and the focused node of one session.
///
/// Topology is fixed at construction. Afterwards only positions, velocities
/// (through the simulator) and the focus change.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	focus: Option<usize>,
}

impl Graph {
	/// Builds the graph, seeding nodes evenly on a circle of `seed_radius`.
	/// Edges pointing outside the node list are dropped.
	pub fn new(data: &GraphData, seed_radius: f64) -> Self {
		let count = data.nodes.len();
		let nodes: Vec<Node> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				Node {
					id: i,
					title: node.title.clone(),
					x: seed_radius * angle.cos(),
					y: seed_radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					fixed: false,
				}
			})
			.collect();

		let edges: Vec<Edge> = data
			.edges
			.iter()
			.filter(|link| link.source < count && link.target < count)
			.map(|link| Edge {
				source: link.source,
				target: link.target,
			})
			.collect();

		let dropped = data.edges.len() - edges.len();
		if dropped > 0 {
			warn!("dropped {dropped} edge(s) referencing missing nodes");
		}
		debug!("graph built with {} nodes, {} edges", nodes.len(), edges.len());

		Self {
			nodes,
			edges,
			focus: None,
		}
	}

	/// Nodes in index order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges that survived validation.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Index of the focused node, if any.
	pub fn focus(&self) -> Option<usize> {
		self.focus
	}

	/// Sets or clears the focused node. An index past the end clears it.
	pub fn set_focus(&mut self, index: Option<usize>) {
		self.focus = index.filter(|&i| i < self.nodes.len());
	}

	pub(super) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}
}
