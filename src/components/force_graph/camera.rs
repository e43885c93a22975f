use log::warn;

use super::config::ZoomLimits;

/// Size of the drawing surface in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// A viewport of the given CSS size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Screen point the world origin maps to when unpanned.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Pixels per world unit at zoom 1: half the shorter side.
	pub fn scale(&self) -> f64 {
		(self.width.min(self.height) / 2.0).max(f64::EPSILON)
	}
}

/// Pan offset and zoom factor mapping world space onto a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pan_x: f64,
	pan_y: f64,
	zoom: f64,
	limits: ZoomLimits,
}

impl Camera {
	/// Camera at the origin with zoom 1 (clamped). Invalid limits fall back
	/// to the defaults.
	pub fn new(limits: ZoomLimits) -> Self {
		let limits = if limits.is_valid() {
			limits
		} else {
			warn!("ignoring invalid zoom limits {limits:?}");
			ZoomLimits::default()
		};
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			zoom: 1.0_f64.clamp(limits.min, limits.max),
			limits,
		}
	}

	/// Current zoom factor.
	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	/// Current pan offset in world units.
	pub fn pan(&self) -> (f64, f64) {
		(self.pan_x, self.pan_y)
	}

	/// The zoom range in effect.
	pub fn limits(&self) -> ZoomLimits {
		self.limits
	}

	/// Multiplies the zoom by `factor`, clamped to the configured range.
	pub fn zoom_by(&mut self, factor: f64) {
		let next = self.zoom * factor;
		if next.is_nan() {
			return;
		}
		self.zoom = next.clamp(self.limits.min, self.limits.max);
	}

	/// Pans by a world-space offset.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if !(dx.is_finite() && dy.is_finite()) {
			return;
		}
		self.pan_x += dx;
		self.pan_y += dy;
	}

	/// Maps a world point to CSS pixels.
	pub fn world_to_screen(&self, x: f64, y: f64, viewport: &Viewport) -> (f64, f64) {
		let (cx, cy) = viewport.center();
		let k = self.zoom * viewport.scale();
		(cx + (x + self.pan_x) * k, cy + (y + self.pan_y) * k)
	}

	/// Exact inverse of [`Camera::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64, viewport: &Viewport) -> (f64, f64) {
		let (cx, cy) = viewport.center();
		let k = self.zoom * viewport.scale();
		((sx - cx) / k - self.pan_x, (sy - cy) / k - self.pan_y)
	}
}

impl Default for Camera {
	fn default() -> Self {
		Self::new(ZoomLimits::default())
	}
}
