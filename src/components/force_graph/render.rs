use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::{Camera, Viewport};
use super::graph::Graph;

const BACKGROUND_INNER: &str = "#131418";
const BACKGROUND_OUTER: &str = "#08090b";
const EDGE_COLOR: &str = "rgba(255, 180, 80, 0.22)";
const EDGE_WIDTH: f64 = 1.0;
const GLOW_COLOR: &str = "rgba(255, 160, 60, 0.05)";
const GLOW_SCALE: f64 = 5.0;
const NODE_COLOR: &str = "#e8e6e3";
const FOCUS_COLOR: &str = "#ffd87a";
const LABEL_SIZE: f64 = 12.0;

/// Node radius in world units at zoom 1.
pub const NODE_RADIUS: f64 = 0.012;
/// Zoom range the node radius follows; outside it the radius stays put.
const RADIUS_ZOOM_RANGE: (f64, f64) = (0.7, 1.6);

/// 2D drawing target, in CSS pixels.
pub trait Surface {
	/// Current size of the target.
	fn viewport(&self) -> Viewport;
	/// Wipes the whole surface.
	fn clear(&mut self);
	/// Fills the surface with a radial gradient from `inner` at `center` to `outer` at `radius`.
	fn fill_radial_gradient(&mut self, center: (f64, f64), radius: f64, inner: &str, outer: &str);
	/// Strokes a straight line.
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str);
	/// Fills a disc.
	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str);
	/// Draws `text` with its baseline starting at `at`.
	fn fill_text(&mut self, text: &str, at: (f64, f64), size: f64, color: &str);
}

/// On-screen node radius for the current zoom.
pub fn node_radius(camera: &Camera, viewport: &Viewport) -> f64 {
	let (lo, hi) = RADIUS_ZOOM_RANGE;
	NODE_RADIUS * camera.zoom().clamp(lo, hi) * viewport.scale()
}

/// Draws one full frame: background, edges, nodes, then the focus label.
pub fn render<S: Surface + ?Sized>(graph: &Graph, camera: &Camera, surface: &mut S) {
	let viewport = surface.viewport();
	surface.clear();
	draw_background(surface, &viewport);
	draw_edges(graph, camera, surface, &viewport);
	draw_nodes(graph, camera, surface, &viewport);
}

fn draw_background<S: Surface + ?Sized>(surface: &mut S, viewport: &Viewport) {
	let (w, h) = (viewport.width, viewport.height);
	surface.fill_radial_gradient(
		(w * 0.5, h * 0.35),
		w.max(h) * 0.7,
		BACKGROUND_INNER,
		BACKGROUND_OUTER,
	);
}

fn draw_edges<S: Surface + ?Sized>(
	graph: &Graph,
	camera: &Camera,
	surface: &mut S,
	viewport: &Viewport,
) {
	let nodes = graph.nodes();
	for edge in graph.edges() {
		let (a, b) = (&nodes[edge.source], &nodes[edge.target]);
		let from = camera.world_to_screen(a.x, a.y, viewport);
		let to = camera.world_to_screen(b.x, b.y, viewport);
		surface.stroke_line(from, to, EDGE_WIDTH, EDGE_COLOR);
	}
}

fn draw_nodes<S: Surface + ?Sized>(
	graph: &Graph,
	camera: &Camera,
	surface: &mut S,
	viewport: &Viewport,
) {
	let radius = node_radius(camera, viewport);
	let focus = graph.focus();

	for node in graph.nodes() {
		let center = camera.world_to_screen(node.x, node.y, viewport);
		surface.fill_circle(center, radius * GLOW_SCALE, GLOW_COLOR);
		let color = if focus == Some(node.id) {
			FOCUS_COLOR
		} else {
			NODE_COLOR
		};
		surface.fill_circle(center, radius, color);
	}

	// label last so no halo covers it
	if let Some(node) = focus.map(|i| &graph.nodes()[i]) {
		let (x, y) = camera.world_to_screen(node.x, node.y, viewport);
		surface.fill_text(
			&node.title,
			(x + radius + 4.0, y + LABEL_SIZE * 0.35),
			LABEL_SIZE,
			FOCUS_COLOR,
		);
	}
}

/// [`Surface`] over a canvas 2D context whose backing store is
/// `pixel_ratio` times the CSS size.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	viewport: Viewport,
	pixel_ratio: f64,
}

impl CanvasSurface {
	/// Wraps a context whose canvas is already sized for `viewport`.
	pub fn new(ctx: CanvasRenderingContext2d, viewport: Viewport, pixel_ratio: f64) -> Self {
		Self {
			ctx,
			viewport,
			pixel_ratio,
		}
	}

	/// Records a new CSS size and backing-store ratio.
	pub fn resize(&mut self, viewport: Viewport, pixel_ratio: f64) {
		self.viewport = viewport;
		self.pixel_ratio = pixel_ratio;
	}
}

impl Surface for CanvasSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn clear(&mut self) {
		let r = self.pixel_ratio;
		let _ = self.ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);
		self.ctx
			.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}

	fn fill_radial_gradient(&mut self, center: (f64, f64), radius: f64, inner: &str, outer: &str) {
		let (x, y) = center;
		match self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, inner);
				let _ = gradient.add_color_stop(1.0, outer);
				#[allow(deprecated)]
				self.ctx.set_fill_style(&gradient);
			}
			Err(_) => self.ctx.set_fill_style_str(outer),
		}
		self.ctx
			.fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
		self.ctx.set_stroke_style_str(color);
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str) {
		self.ctx.set_fill_style_str(color);
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.ctx.fill();
	}

	fn fill_text(&mut self, text: &str, at: (f64, f64), size: f64, color: &str) {
		self.ctx.set_fill_style_str(color);
		self.ctx.set_font(&format!("{size}px sans-serif"));
		let _ = self.ctx.fill_text(text, at.0, at.1);
	}
}
