//! Building a [`GraphData`] from an already rendered Graphviz SVG.
//!
//! Graphviz writes each node and edge as a `<g class="node">` /
//! `<g class="edge">` group whose `<title>` holds the node name or an
//! `a->b` edge label. Matching is best effort: anything that cannot be
//! resolved is skipped, and environment failures yield an empty graph.

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlIFrameElement, HtmlObjectElement};

use super::types::{GraphData, GraphLink, GraphNode};

const EDGE_ARROW: &str = "->";
const EMBED_SELECTORS: &str = r#"iframe[src$=".svg"], object[type="image/svg+xml"]"#;

/// Builds a graph from node titles and `a -> b` edge titles.
///
/// Empty node titles are replaced with `n{index}`. An edge endpoint resolves
/// to the first node whose title contains it.
pub fn graph_from_titles<N, E>(node_titles: N, edge_titles: E) -> GraphData
where
	N: IntoIterator,
	N::Item: AsRef<str>,
	E: IntoIterator,
	E::Item: AsRef<str>,
{
	let nodes: Vec<GraphNode> = node_titles
		.into_iter()
		.enumerate()
		.map(|(i, title)| {
			let title = title.as_ref().trim();
			GraphNode {
				title: if title.is_empty() {
					format!("n{i}")
				} else {
					title.to_string()
				},
			}
		})
		.collect();

	let find = |name: &str| {
		if name.is_empty() {
			return None;
		}
		nodes.iter().position(|n| n.title.contains(name))
	};

	let edges = edge_titles
		.into_iter()
		.filter_map(|title| {
			let parts: Vec<&str> = title.as_ref().split(EDGE_ARROW).collect();
			let [a, b] = parts.as_slice() else {
				return None;
			};
			Some(GraphLink {
				source: find(a.trim())?,
				target: find(b.trim())?,
			})
		})
		.collect();

	GraphData { nodes, edges }
}

fn titles(svg: &Element, selector: &str) -> Vec<String> {
	let Ok(groups) = svg.query_selector_all(selector) else {
		return Vec::new();
	};
	(0..groups.length())
		.filter_map(|i| groups.item(i))
		.filter_map(|group| group.dyn_into::<Element>().ok())
		.map(|group| {
			group
				.query_selector("title")
				.ok()
				.flatten()
				.and_then(|t| t.text_content())
				.unwrap_or_default()
		})
		.collect()
}

/// Reads nodes and edges from an inline Graphviz `<svg>` element.
pub fn read_svg(svg: &Element) -> GraphData {
	graph_from_titles(titles(svg, "g.node"), titles(svg, "g.edge"))
}

fn embedded_document(embed: &Element) -> Option<Document> {
	if let Some(frame) = embed.dyn_ref::<HtmlIFrameElement>() {
		return frame.content_document();
	}
	embed
		.dyn_ref::<HtmlObjectElement>()
		.and_then(|object| object.content_document())
}

fn framed_svg(container: &Element) -> Option<Element> {
	container
		.query_selector(EMBED_SELECTORS)
		.ok()
		.flatten()
		.and_then(|embed| embedded_document(&embed))
		.and_then(|doc| doc.query_selector("svg").ok().flatten())
}

/// Reads the diagram inside `container`: a framed SVG (`<iframe>` or
/// `<object>`) if one is loaded, otherwise an inline `<svg>`. Unloaded or
/// cross-origin documents with no inline fallback produce an empty graph.
pub fn read_embedded(container: &Element) -> GraphData {
	let svg = framed_svg(container).or_else(|| container.query_selector("svg").ok().flatten());
	match svg {
		Some(svg) => read_svg(&svg),
		None => {
			debug!("no readable diagram; using an empty graph");
			GraphData::default()
		}
	}
}


#[cfg(all(test, target_arch = "wasm32"))]
mod dom_tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	const DIAGRAM: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
		<g class="graph"><title>deps</title>
			<g class="node"><title>core</title><ellipse/></g>
			<g class="node"><title>io</title><ellipse/></g>
			<g class="node"><ellipse/></g>
			<g class="edge"><title>io&#45;&gt;core</title><path/></g>
			<g class="edge"><title>core-&gt;missing</title><path/></g>
		</g>
	</svg>"#;

	fn container(html: &str) -> Element {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.expect("browser document");
		let div = document.create_element("div").expect("div");
		div.set_inner_html(html);
		div
	}

	#[wasm_bindgen_test]
	fn reads_nodes_and_edges_from_svg_groups() {
		let host = container(DIAGRAM);
		let svg = host.query_selector("svg").unwrap().unwrap();
		let data = read_svg(&svg);
		let titles: Vec<&str> = data.nodes.iter().map(|n| n.title.as_str()).collect();
		assert_eq!(titles, ["core", "io", "n2"]);
		assert_eq!(data.edges, vec![GraphLink { source: 1, target: 0 }]);
	}

	#[wasm_bindgen_test]
	fn container_falls_back_to_inline_svg() {
		let data = read_embedded(&container(DIAGRAM));
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.edges.len(), 1);
	}

	#[wasm_bindgen_test]
	fn container_without_diagram_is_empty() {
		let data = read_embedded(&container("<p>no graph here</p>"));
		assert!(data.is_empty());
	}
}
