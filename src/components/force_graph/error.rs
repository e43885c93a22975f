use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures that keep a session from starting.
#[derive(Debug, Error)]
pub enum OverlayError {
	/// Not running in a browser.
	#[error("no browser window available")]
	NoWindow,
	/// The window has no document.
	#[error("window has no document with a body")]
	NoDocument,
	/// The overlay, canvas or 2D context could not be created or sized.
	#[error("failed to create drawing surface: {0}")]
	Surface(String),
	/// An input listener could not be registered.
	#[error("failed to bind `{event}` listener: {reason}")]
	Listener {
		/// DOM event name.
		event: &'static str,
		/// What the browser threw.
		reason: String,
	},
	/// `requestAnimationFrame` refused the callback.
	#[error("failed to schedule frame: {0}")]
	Schedule(String),
	/// [`OverlayConfig::validate`](super::OverlayConfig::validate) rejected the configuration.
	#[error("invalid configuration: {0}")]
	Config(String),
	/// A graph value could not be parsed.
	#[error("malformed graph value: {0}")]
	Graph(#[from] serde_json::Error),
}

/// Renders a thrown JS value for an error message.
pub(crate) fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
