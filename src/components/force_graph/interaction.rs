use super::camera::{Camera, Viewport};
use super::graph::Graph;

/// Base of the exponential wheel zoom.
const WHEEL_ZOOM_BASE: f64 = 1.001;
/// Pixels per line for line-mode wheel deltas.
const WHEEL_LINE_PX: f64 = 16.0;
/// Pointer travel (px) past which a press counts as a drag rather than a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Key that closes the overlay.
pub const CLOSE_KEY: &str = "Escape";

/// What the session should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
	/// Keep running.
	Continue,
	/// Tear the session down.
	Close,
}

/// Unit of a wheel delta, as reported by `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelUnit {
	/// `DOM_DELTA_PIXEL`
	Pixel,
	/// `DOM_DELTA_LINE`
	Line,
	/// `DOM_DELTA_PAGE`
	Page,
}

impl WheelUnit {
	/// Maps a DOM delta mode. Unknown modes are read as pixels.
	pub fn from_delta_mode(mode: u32) -> Self {
		match mode {
			1 => Self::Line,
			2 => Self::Page,
			_ => Self::Pixel,
		}
	}

	/// Converts `delta` to pixels; a page is `page_height` pixels.
	pub fn to_pixels(self, delta: f64, page_height: f64) -> f64 {
		match self {
			Self::Pixel => delta,
			Self::Line => delta * WHEEL_LINE_PX,
			Self::Page => delta * page_height,
		}
	}
}

#[derive(Clone, Copy, Debug, Default)]
struct PanState {
	last_x: f64,
	last_y: f64,
	travelled: f64,
}

/// Turns raw pointer, wheel and key input into camera and focus changes.
#[derive(Clone, Debug, Default)]
pub struct Controller {
	pan: Option<PanState>,
	suppress_click: bool,
}

impl Controller {
	/// True while a press has moved past [`DRAG_THRESHOLD`].
	pub fn is_dragging(&self) -> bool {
		self.pan.is_some()
	}

	/// Zooms exponentially in the wheel delta (pixels); scrolling up zooms in.
	pub fn wheel(&mut self, camera: &mut Camera, delta_y: f64) {
		camera.zoom_by(WHEEL_ZOOM_BASE.powf(-delta_y));
	}

	/// Starts a potential drag at `(x, y)`.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pan = Some(PanState {
			last_x: x,
			last_y: y,
			travelled: 0.0,
		});
		self.suppress_click = false;
	}

	/// Pans the camera once the press has become a drag.
	pub fn pointer_move(&mut self, camera: &mut Camera, viewport: &Viewport, x: f64, y: f64) {
		let Some(pan) = self.pan.as_mut() else {
			return;
		};
		let (dx, dy) = (x - pan.last_x, y - pan.last_y);
		pan.last_x = x;
		pan.last_y = y;
		pan.travelled += (dx * dx + dy * dy).sqrt();

		let k = viewport.scale() * camera.zoom();
		camera.pan_by(dx / k, dy / k);
	}

	/// Ends any press.
	pub fn pointer_up(&mut self) {
		if let Some(pan) = self.pan.take() {
			self.suppress_click = pan.travelled > DRAG_THRESHOLD;
		}
	}

	/// Focuses the node nearest to the click. Clicks ending a drag are ignored.
	pub fn click(
		&mut self,
		graph: &mut Graph,
		camera: &Camera,
		viewport: &Viewport,
		x: f64,
		y: f64,
	) -> Option<usize> {
		if std::mem::take(&mut self.suppress_click) {
			return None;
		}
		let hit = hit_test(graph, camera, viewport, x, y)?;
		graph.set_focus(Some(hit));
		Some(hit)
	}

	/// [`InputOutcome::Close`] for [`CLOSE_KEY`], otherwise continue.
	pub fn key_down(&self, key: &str) -> InputOutcome {
		if key == CLOSE_KEY {
			InputOutcome::Close
		} else {
			InputOutcome::Continue
		}
	}
}

/// Index of the node whose projection is nearest to `(x, y)`.
///
/// There is no hit radius: any click on a non-empty graph selects something.
/// Ties go to the lowest index.
pub fn hit_test(
	graph: &Graph,
	camera: &Camera,
	viewport: &Viewport,
	x: f64,
	y: f64,
) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;
	for (i, node) in graph.nodes().iter().enumerate() {
		let (sx, sy) = camera.world_to_screen(node.x, node.y, viewport);
		let d = (sx - x) * (sx - x) + (sy - y) * (sy - y);
		if best.is_none_or(|(_, min)| d < min) {
			best = Some((i, d));
		}
	}
	best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphNode};

	fn graph(n: usize) -> Graph {
		let data = GraphData {
			nodes: (0..n)
				.map(|i| GraphNode {
					title: format!("n{i}"),
				})
				.collect(),
			edges: vec![],
		};
		Graph::new(&data, 0.6)
	}

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0)
	}

	#[test]
	fn wheel_zoom_is_exponential() {
		let mut controller = Controller::default();
		let mut camera = Camera::default();
		controller.wheel(&mut camera, -100.0);
		controller.wheel(&mut camera, -100.0);
		let expected = 1.001f64.powf(200.0);
		assert!((camera.zoom() - expected).abs() < 1e-9);
		controller.wheel(&mut camera, 200.0);
		assert!((camera.zoom() - 1.0).abs() < 1e-9);
	}

	#[test]
	fn wheel_units_scale_to_pixels() {
		assert_eq!(WheelUnit::from_delta_mode(0), WheelUnit::Pixel);
		assert_eq!(WheelUnit::from_delta_mode(1), WheelUnit::Line);
		assert_eq!(WheelUnit::from_delta_mode(2), WheelUnit::Page);
		assert_eq!(WheelUnit::from_delta_mode(7), WheelUnit::Pixel);

		assert_eq!(WheelUnit::Pixel.to_pixels(-120.0, 600.0), -120.0);
		assert_eq!(WheelUnit::Line.to_pixels(3.0, 600.0), 48.0);
		assert_eq!(WheelUnit::Page.to_pixels(-1.0, 600.0), -600.0);
	}

	#[test]
	fn drag_pans_independently_of_zoom() {
		let mut controller = Controller::default();
		let vp = viewport();
		for zoom in [0.5, 1.0, 3.0] {
			let mut camera = Camera::default();
			camera.zoom_by(zoom);
			let before = camera.world_to_screen(0.1, 0.2, &vp);
			controller.pointer_down(10.0, 10.0);
			controller.pointer_move(&mut camera, &vp, 40.0, -5.0);
			controller.pointer_up();
			let after = camera.world_to_screen(0.1, 0.2, &vp);
			assert!((after.0 - before.0 - 30.0).abs() < 1e-9);
			assert!((after.1 - before.1 + 15.0).abs() < 1e-9);
		}
	}

	#[test]
	fn move_without_press_does_nothing() {
		let mut controller = Controller::default();
		let mut camera = Camera::default();
		controller.pointer_move(&mut camera, &viewport(), 50.0, 50.0);
		assert_eq!(camera.pan(), (0.0, 0.0));
	}

	#[test]
	fn click_focuses_nearest_node() {
		let mut controller = Controller::default();
		let mut g = graph(4);
		let camera = Camera::default();
		let vp = viewport();
		let (sx, sy) = camera.world_to_screen(g.nodes()[2].x, g.nodes()[2].y, &vp);
		assert_eq!(controller.click(&mut g, &camera, &vp, sx + 4.0, sy - 3.0), Some(2));
		assert_eq!(g.focus(), Some(2));
	}

	#[test]
	fn far_click_still_selects() {
		let mut controller = Controller::default();
		let mut g = graph(4);
		let camera = Camera::default();
		// node 0 sits at world (0.6, 0), far to the right
		let hit = controller.click(&mut g, &camera, &viewport(), 1.0e6, 300.0);
		assert_eq!(hit, Some(0));
	}

	#[test]
	fn hit_test_is_deterministic() {
		let g = graph(16);
		let camera = Camera::default();
		let vp = viewport();
		let first = hit_test(&g, &camera, &vp, 123.0, 456.0);
		for _ in 0..10 {
			assert_eq!(hit_test(&g, &camera, &vp, 123.0, 456.0), first);
		}
	}

	#[test]
	fn empty_graph_has_no_hit() {
		let mut controller = Controller::default();
		let mut g = graph(0);
		assert_eq!(
			controller.click(&mut g, &Camera::default(), &viewport(), 1.0, 1.0),
			None
		);
		assert_eq!(g.focus(), None);
	}

	#[test]
	fn click_after_drag_keeps_focus() {
		let mut controller = Controller::default();
		let mut g = graph(3);
		g.set_focus(Some(1));
		let mut camera = Camera::default();
		let vp = viewport();
		controller.pointer_down(0.0, 0.0);
		controller.pointer_move(&mut camera, &vp, 20.0, 0.0);
		controller.pointer_up();
		assert_eq!(controller.click(&mut g, &camera, &vp, 700.0, 300.0), None);
		assert_eq!(g.focus(), Some(1));
		// the next plain click works again
		assert_eq!(controller.click(&mut g, &camera, &vp, 700.0, 300.0), Some(0));
	}

	#[test]
	fn jitter_below_threshold_still_clicks() {
		let mut controller = Controller::default();
		let mut g = graph(3);
		let mut camera = Camera::default();
		let vp = viewport();
		controller.pointer_down(0.0, 0.0);
		controller.pointer_move(&mut camera, &vp, 1.0, 1.0);
		controller.pointer_up();
		assert!(controller.click(&mut g, &camera, &vp, 700.0, 300.0).is_some());
	}

	#[test]
	fn escape_closes() {
		let controller = Controller::default();
		assert_eq!(controller.key_down("Escape"), InputOutcome::Close);
		assert_eq!(controller.key_down("a"), InputOutcome::Continue);
	}
}
