use super::config::SimulationConfig;
use super::graph::Graph;

/// Added to squared distances so coincident nodes never divide by zero.
const DISTANCE_EPSILON_SQ: f64 = 1e-6;
/// Floor for edge lengths before normalising.
const LENGTH_EPSILON: f64 = 1e-6;

/// Advances node velocities and positions one tick at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Simulator {
	config: SimulationConfig,
}

impl Simulator {
	/// A simulator with fixed force constants.
	pub fn new(config: SimulationConfig) -> Self {
		Self { config }
	}

	/// The force constants in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Clamps a frame delta to the integration ceiling.
	pub fn clamp_dt(&self, dt: f64) -> f64 {
		dt.min(self.config.max_dt)
	}

	/// Runs repulsion, springs, focus attraction, then damped integration.
	///
	/// `dt` is clamped to `max_dt`; a non-positive or NaN `dt` leaves the
	/// graph untouched.
	pub fn step(&self, graph: &mut Graph, dt: f64) {
		if !(dt > 0.0) {
			return;
		}
		let dt = self.clamp_dt(dt);
		let SimulationConfig {
			repulsion,
			spring_stiffness,
			rest_length,
			damping,
			focus_pull,
			..
		} = self.config;

		let focus = graph.focus();
		let edges = graph.edges().to_vec();
		let nodes = graph.nodes_mut();
		let count = nodes.len();

		for i in 0..count {
			for j in (i + 1)..count {
				let (dx, dy) = (nodes[i].x - nodes[j].x, nodes[i].y - nodes[j].y);
				let f = repulsion / (dx * dx + dy * dy + DISTANCE_EPSILON_SQ);
				let (fx, fy) = (dx * f, dy * f);
				nodes[i].vx += fx;
				nodes[i].vy += fy;
				nodes[j].vx -= fx;
				nodes[j].vy -= fy;
			}
		}

		for edge in &edges {
			let (a, b) = (edge.source, edge.target);
			let (dx, dy) = (nodes[b].x - nodes[a].x, nodes[b].y - nodes[a].y);
			let len = (dx * dx + dy * dy).sqrt().max(LENGTH_EPSILON);
			let k = spring_stiffness * (len - rest_length);
			let (ux, uy) = (dx / len, dy / len);
			nodes[a].vx += ux * k;
			nodes[a].vy += uy * k;
			nodes[b].vx -= ux * k;
			nodes[b].vy -= uy * k;
		}

		if let Some(f) = focus {
			let (fx, fy) = (nodes[f].x, nodes[f].y);
			for (i, node) in nodes.iter_mut().enumerate() {
				if i == f {
					continue;
				}
				node.vx += (fx - node.x) * focus_pull;
				node.vy += (fy - node.y) * focus_pull;
			}
		}

		for node in nodes.iter_mut() {
			if node.fixed {
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx *= damping;
			node.vy *= damping;
			node.x += node.vx * dt;
			node.y += node.vy * dt;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};
	use proptest::prelude::*;

	fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
		let data = GraphData {
			nodes: (0..n)
				.map(|i| GraphNode {
					title: format!("n{i}"),
				})
				.collect(),
			edges: edges
				.iter()
				.map(|&(source, target)| GraphLink { source, target })
				.collect(),
		};
		Graph::new(&data, 0.6)
	}

	fn distance(graph: &Graph, a: usize, b: usize) -> f64 {
		let (na, nb) = (&graph.nodes()[a], &graph.nodes()[b]);
		((na.x - nb.x).powi(2) + (na.y - nb.y).powi(2)).sqrt()
	}

	fn max_speed(graph: &Graph) -> f64 {
		graph
			.nodes()
			.iter()
			.map(|n| (n.vx * n.vx + n.vy * n.vy).sqrt())
			.fold(0.0, f64::max)
	}

	const TRIANGLE: &[(usize, usize)] = &[(0, 1), (1, 2), (2, 0)];

	#[test]
	fn triangle_settles_at_rest_length_without_repulsion() {
		let sim = Simulator::new(SimulationConfig {
			repulsion: 0.0,
			..Default::default()
		});
		let mut g = graph(3, TRIANGLE);
		for _ in 0..1500 {
			sim.step(&mut g, 0.016);
		}
		for &(a, b) in TRIANGLE {
			assert!((distance(&g, a, b) - 0.18).abs() < 1e-3);
		}
	}

	#[test]
	fn triangle_settles_near_rest_length_with_defaults() {
		let sim = Simulator::default();
		let mut g = graph(3, TRIANGLE);
		for _ in 0..1500 {
			sim.step(&mut g, 0.016);
		}
		// repulsion keeps the edges slightly stretched
		for &(a, b) in TRIANGLE {
			let d = distance(&g, a, b);
			assert!(d > 0.18 && d - 0.18 < 0.025, "edge {a}-{b} at {d}");
		}
	}

	#[test]
	fn velocities_decay_on_a_connected_graph() {
		let sim = Simulator::default();
		let mut g = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)]);
		for _ in 0..50 {
			sim.step(&mut g, 0.016);
		}
		let early = max_speed(&g);
		for _ in 0..3000 {
			sim.step(&mut g, 0.016);
		}
		assert!(early > 1e-3);
		assert!(max_speed(&g) < 1e-6);
	}

	#[test]
	fn focus_pulls_other_nodes_only() {
		let sim = Simulator::new(SimulationConfig {
			repulsion: 0.0,
			..Default::default()
		});
		let mut g = graph(3, &[]);
		g.set_focus(Some(0));
		let before = distance(&g, 0, 1);
		let anchor = (g.nodes()[0].x, g.nodes()[0].y);
		sim.step(&mut g, 0.016);
		assert!(distance(&g, 0, 1) < before);
		assert_eq!((g.nodes()[0].x, g.nodes()[0].y), anchor);
	}

	#[test]
	fn fixed_nodes_do_not_move() {
		let sim = Simulator::default();
		let mut g = graph(2, &[(0, 1)]);
		g.nodes_mut()[0].fixed = true;
		let anchor = (g.nodes()[0].x, g.nodes()[0].y);
		let free_start = g.nodes()[1].x;
		for _ in 0..10 {
			sim.step(&mut g, 0.016);
		}
		assert_eq!((g.nodes()[0].x, g.nodes()[0].y), anchor);
		assert!(g.nodes()[1].x > free_start);
	}

	#[test]
	fn coincident_nodes_and_self_loops_stay_finite() {
		let sim = Simulator::default();
		let mut g = graph(4, &[(0, 0), (1, 2), (2, 3)]);
		for node in g.nodes_mut() {
			node.x = 0.25;
			node.y = -0.1;
		}
		for _ in 0..100 {
			sim.step(&mut g, 0.05);
		}
		assert!(
			g.nodes()
				.iter()
				.all(|n| n.x.is_finite() && n.y.is_finite() && n.vx.is_finite())
		);
	}

	#[test]
	fn long_frames_are_clamped() {
		let sim = Simulator::default();
		let mut slow = graph(3, TRIANGLE);
		let mut capped = slow.clone();
		sim.step(&mut slow, 5.0);
		sim.step(&mut capped, 0.05);
		assert_eq!(slow.nodes(), capped.nodes());
	}

	#[test]
	fn non_positive_dt_is_a_no_op() {
		let sim = Simulator::default();
		let mut g = graph(3, TRIANGLE);
		let before = g.nodes().to_vec();
		sim.step(&mut g, 0.0);
		sim.step(&mut g, -1.0);
		sim.step(&mut g, f64::NAN);
		assert_eq!(g.nodes(), &before[..]);
	}

	#[test]
	fn empty_graph_steps() {
		let mut g = graph(0, &[]);
		Simulator::default().step(&mut g, 0.016);
		assert!(g.is_empty());
	}

	proptest! {
		#[test]
		fn step_never_produces_non_finite_state(
			positions in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 0..12),
			raw_edges in prop::collection::vec((0usize..12, 0usize..12), 0..20),
			focus in prop::option::of(0usize..12),
			dt in 1e-4f64..=0.05,
		) {
			let n = positions.len();
			let edges: Vec<(usize, usize)> = raw_edges
				.into_iter()
				.filter(|&(a, b)| a < n && b < n)
				.collect();
			let mut g = graph(n, &edges);
			for (node, &(x, y)) in g.nodes_mut().iter_mut().zip(&positions) {
				node.x = x;
				node.y = y;
			}
			g.set_focus(focus);
			let sim = Simulator::default();
			for _ in 0..20 {
				sim.step(&mut g, dt);
			}
			for node in g.nodes() {
				prop_assert!(node.x.is_finite() && node.y.is_finite());
				prop_assert!(node.vx.is_finite() && node.vy.is_finite());
			}
		}
	}
}
