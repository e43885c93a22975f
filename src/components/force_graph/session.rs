use log::{debug, info};

use super::camera::{Camera, Viewport};
use super::config::OverlayConfig;
use super::graph::Graph;
use super::interaction::{Controller, InputOutcome, WheelUnit};
use super::render::{self, Surface};
use super::simulation::Simulator;
use super::types::GraphData;

/// Lifecycle of a session. It only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Built, not yet ticking.
	Created,
	/// Ticking and accepting input.
	Running,
	/// Torn down for good.
	Destroyed,
}

/// Everything a session mutates, without any browser handles.
///
/// Calls made outside [`Phase::Running`] are ignored, so nothing moves or
/// draws once the session is destroyed.
pub struct SessionCore {
	graph: Graph,
	camera: Camera,
	controller: Controller,
	simulator: Simulator,
	viewport: Viewport,
	phase: Phase,
	last_frame_ms: Option<f64>,
}

impl SessionCore {
	/// A session in [`Phase::Created`] with a fresh graph and camera.
	pub fn new(data: &GraphData, config: &OverlayConfig, viewport: Viewport) -> Self {
		Self {
			graph: Graph::new(data, config.seed_radius),
			camera: Camera::new(config.zoom),
			controller: Controller::default(),
			simulator: Simulator::new(config.simulation),
			viewport,
			phase: Phase::Created,
			last_frame_ms: None,
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// The simulated graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// The current camera.
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	/// Last known surface size.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Moves from [`Phase::Created`] to [`Phase::Running`].
	pub fn start(&mut self) {
		if self.phase == Phase::Created {
			self.phase = Phase::Running;
			info!(
				"graph session running: {} nodes, {} edges",
				self.graph.len(),
				self.graph.edges().len()
			);
		}
	}

	/// One tick: step the simulation by the clamped elapsed time, then draw.
	/// Returns `false` when the session is not running.
	pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> bool {
		if self.phase != Phase::Running {
			return false;
		}
		let elapsed = self
			.last_frame_ms
			.map(|last| ((now_ms - last) / 1000.0).max(0.0))
			.unwrap_or(0.0);
		self.last_frame_ms = Some(now_ms);

		let dt = self.simulator.clamp_dt(elapsed);
		self.simulator.step(&mut self.graph, dt);
		render::render(&self.graph, &self.camera, surface);
		true
	}

	/// Adopts a new surface size.
	pub fn resize(&mut self, viewport: Viewport) {
		if self.phase != Phase::Destroyed {
			self.viewport = viewport;
		}
	}

	/// Wheel input. Line and page deltas are scaled to pixels first.
	pub fn wheel(&mut self, delta_y: f64, unit: WheelUnit) {
		if self.phase == Phase::Running {
			let pixels = unit.to_pixels(delta_y, self.viewport.height);
			self.controller.wheel(&mut self.camera, pixels);
		}
	}

	/// Primary button pressed at a surface-local point.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if self.phase == Phase::Running {
			self.controller.pointer_down(x, y);
		}
	}

	/// Pointer moved to a surface-local point.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.phase == Phase::Running {
			self.controller
				.pointer_move(&mut self.camera, &self.viewport, x, y);
		}
	}

	/// Primary button released.
	pub fn pointer_up(&mut self) {
		if self.phase == Phase::Running {
			self.controller.pointer_up();
		}
	}

	/// Click at a surface-local point; returns the newly focused node.
	pub fn click(&mut self, x: f64, y: f64) -> Option<usize> {
		if self.phase != Phase::Running {
			return None;
		}
		let hit = self
			.controller
			.click(&mut self.graph, &self.camera, &self.viewport, x, y);
		if let Some(index) = hit {
			debug!("focused node {index}: {}", self.graph.nodes()[index].title);
		}
		hit
	}

	/// Key press by DOM key name.
	pub fn key_down(&mut self, key: &str) -> InputOutcome {
		if self.phase != Phase::Running {
			return InputOutcome::Continue;
		}
		self.controller.key_down(key)
	}

	/// Moves to [`Phase::Destroyed`]. Returns `true` only on the first call.
	pub fn destroy(&mut self) -> bool {
		if self.phase == Phase::Destroyed {
			return false;
		}
		self.phase = Phase::Destroyed;
		self.last_frame_ms = None;
		true
	}
}
