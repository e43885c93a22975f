use serde::{Deserialize, Serialize};

use super::error::OverlayError;

/// Force constants, fixed for the lifetime of a session.
///
/// The defaults are aesthetic tuning for graphs of a few hundred nodes laid
/// out in a unit-ish world, not a physical model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Pairwise repulsion strength (inverse-square).
	pub repulsion: f64,
	/// Edge spring constant.
	pub spring_stiffness: f64,
	/// Edge rest length in world units.
	pub rest_length: f64,
	/// Velocity retained per tick, in `[0, 1)`.
	pub damping: f64,
	/// Pull of the focused node toward the origin.
	pub focus_pull: f64,
	/// Longest step integrated in one tick, in seconds.
	pub max_dt: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			repulsion: 0.00035,
			spring_stiffness: 0.1,
			rest_length: 0.18,
			damping: 0.9,
			focus_pull: 0.002,
			max_dt: 0.05,
		}
	}
}

/// Allowed zoom range, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
	/// Most zoomed out.
	pub min: f64,
	/// Most zoomed in.
	pub max: f64,
}

impl ZoomLimits {
	/// A finite, positive, non-empty range.
	pub fn is_valid(&self) -> bool {
		self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
	}
}

impl Default for ZoomLimits {
	fn default() -> Self {
		Self {
			min: 0.25,
			max: 3.5,
		}
	}
}

/// Everything a session is configured with at launch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
	/// Force constants.
	pub simulation: SimulationConfig,
	/// Camera zoom range.
	pub zoom: ZoomLimits,
	/// Radius of the circle nodes are seeded on, in world units.
	pub seed_radius: f64,
	/// Cap on the canvas backing-store ratio.
	pub max_device_pixel_ratio: f64,
}

impl Default for OverlayConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			zoom: ZoomLimits::default(),
			seed_radius: 0.6,
			max_device_pixel_ratio: 2.0,
		}
	}
}

impl OverlayConfig {
	/// Rejects values the simulation or camera cannot work with.
	pub fn validate(&self) -> Result<(), OverlayError> {
		let sim = &self.simulation;
		let values = [
			("repulsion", sim.repulsion),
			("spring_stiffness", sim.spring_stiffness),
			("rest_length", sim.rest_length),
			("damping", sim.damping),
			("focus_pull", sim.focus_pull),
			("max_dt", sim.max_dt),
			("zoom.min", self.zoom.min),
			("zoom.max", self.zoom.max),
			("seed_radius", self.seed_radius),
			("max_device_pixel_ratio", self.max_device_pixel_ratio),
		];
		if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
			return Err(OverlayError::Config(format!("{name} must be finite")));
		}
		if !self.zoom.is_valid() {
			return Err(OverlayError::Config(format!(
				"zoom range [{}, {}] is empty or not positive",
				self.zoom.min, self.zoom.max
			)));
		}
		if !(0.0..1.0).contains(&sim.damping) {
			return Err(OverlayError::Config(format!(
				"damping {} must lie in [0, 1)",
				sim.damping
			)));
		}
		if sim.max_dt <= 0.0 {
			return Err(OverlayError::Config("max_dt must be positive".into()));
		}
		if self.max_device_pixel_ratio <= 0.0 {
			return Err(OverlayError::Config(
				"max_device_pixel_ratio must be positive".into(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert!(OverlayConfig::default().validate().is_ok());
	}

	#[test]
	fn rejects_inverted_zoom_range() {
		let config = OverlayConfig {
			zoom: ZoomLimits { min: 2.0, max: 1.0 },
			..Default::default()
		};
		assert!(matches!(config.validate(), Err(OverlayError::Config(_))));
	}

	#[test]
	fn rejects_undamped_simulation() {
		let mut config = OverlayConfig::default();
		config.simulation.damping = 1.0;
		assert!(config.validate().is_err());
	}

	#[test]
	fn rejects_non_finite_values() {
		let mut config = OverlayConfig::default();
		config.simulation.repulsion = f64::NAN;
		let err = config.validate().unwrap_err();
		assert!(err.to_string().contains("repulsion"));
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config: OverlayConfig =
			serde_json::from_str(r#"{"simulation":{"rest_length":0.3}}"#).unwrap();
		assert_eq!(config.simulation.rest_length, 0.3);
		assert_eq!(config.simulation.damping, 0.9);
		assert_eq!(config.zoom, ZoomLimits::default());
	}
}
