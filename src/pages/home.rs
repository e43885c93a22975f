use leptos::html::Div;
use leptos::prelude::*;

use crate::components::force_graph::{GraphData, GraphLink, GraphNode, InteractiveView};

/// Sample graph: a random tree with a few extra cross links.
fn generate_sample_data(n: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| GraphNode {
			title: format!("module_{i}"),
		})
		.collect();

	let tree = (1..n).map(|i| GraphLink {
		source: i,
		target: (rand_simple(i) * (i as f64)) as usize,
	});
	let cross = (0..n / 8).map(|i| GraphLink {
		source: (rand_simple(i + n) * n as f64) as usize,
		target: (rand_simple(i + 2 * n) * n as f64) as usize,
	});

	GraphData {
		nodes,
		edges: tree.chain(cross).collect(),
	}
}

/// A small Graphviz-rendered dependency diagram, read back by the overlay.
const SAMPLE_DIAGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="220" height="150" viewBox="0 0 220 150">
<g class="graph" transform="translate(4 146)">
<title>crate</title>
<g class="node"><title>app</title><ellipse cx="106" cy="-124" rx="30" ry="18" fill="none" stroke="#e8e6e3"/><text x="106" y="-120" text-anchor="middle" fill="#e8e6e3">app</text></g>
<g class="node"><title>overlay</title><ellipse cx="50" cy="-70" rx="38" ry="18" fill="none" stroke="#e8e6e3"/><text x="50" y="-66" text-anchor="middle" fill="#e8e6e3">overlay</text></g>
<g class="node"><title>ingest</title><ellipse cx="162" cy="-70" rx="34" ry="18" fill="none" stroke="#e8e6e3"/><text x="162" y="-66" text-anchor="middle" fill="#e8e6e3">ingest</text></g>
<g class="node"><title>graph</title><ellipse cx="106" cy="-18" rx="32" ry="18" fill="none" stroke="#e8e6e3"/><text x="106" y="-14" text-anchor="middle" fill="#e8e6e3">graph</text></g>
<g class="edge"><title>app&#45;&gt;overlay</title><path d="M94,-107L66,-86" stroke="#ffb450"/></g>
<g class="edge"><title>app&#45;&gt;ingest</title><path d="M118,-107L146,-86" stroke="#ffb450"/></g>
<g class="edge"><title>overlay&#45;&gt;graph</title><path d="M66,-54L92,-34" stroke="#ffb450"/></g>
<g class="edge"><title>ingest&#45;&gt;graph</title><path d="M146,-54L120,-34" stroke="#ffb450"/></g>
</g>
</svg>"##;

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Demo page: describes the sample graph and offers the overlay.
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || generate_sample_data(60));
	let diagram = NodeRef::<Div>::new();
	let summary = move || {
		graph_data.with(|g| format!("{} nodes, {} edges", g.nodes.len(), g.edges.len()))
	};

	view! {
		<div class="graph-page">
			<h1>"Force-Directed Overlay"</h1>
			<p class="subtitle">{summary}</p>
			<InteractiveView data=graph_data />
			<h2>"From a rendered diagram"</h2>
			<div node_ref=diagram class="graph-diagram" inner_html=SAMPLE_DIAGRAM></div>
			<InteractiveView source=diagram label="Interactive View (diagram)" />
			<p class="hint">"Scroll to zoom. Drag to pan. Click a node to focus it. Esc closes."</p>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_edges_stay_in_range() {
		let data = generate_sample_data(60);
		assert_eq!(data.nodes.len(), 60);
		assert!(
			data.edges
				.iter()
				.all(|e| e.source < 60 && e.target < 60)
		);
	}
}
