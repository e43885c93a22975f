use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::error;
use wasm_bindgen::prelude::*;

use super::error::{OverlayError, describe};

#[derive(Default)]
struct FrameHandle {
	pending: Cell<Option<i32>>,
	cancelled: Cell<bool>,
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameHandle {
	fn schedule(&self) -> Result<(), OverlayError> {
		let window = web_sys::window().ok_or(OverlayError::NoWindow)?;
		if let Some(ref cb) = *self.callback.borrow() {
			let id = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map_err(|e| OverlayError::Schedule(describe(&e)))?;
			self.pending.set(Some(id));
		}
		Ok(())
	}
}

/// A repeating `requestAnimationFrame` task.
///
/// The tick receives the frame timestamp in milliseconds. Cancelling (or
/// dropping) stops the loop; cancelling twice is harmless.
pub struct FrameLoop {
	handle: Rc<FrameHandle>,
}

impl FrameLoop {
	/// Schedules `tick` on every animation frame until cancelled.
	pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self, OverlayError> {
		let handle = Rc::new(FrameHandle::default());
		let weak: Weak<FrameHandle> = Rc::downgrade(&handle);
		*handle.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let Some(handle) = weak.upgrade() else {
				return;
			};
			handle.pending.set(None);
			if handle.cancelled.get() {
				return;
			}
			tick(timestamp);
			if handle.cancelled.get() {
				return;
			}
			if let Err(e) = handle.schedule() {
				error!("frame loop stopped: {e}");
			}
		}));
		handle.schedule()?;
		Ok(Self { handle })
	}

	/// True once [`FrameLoop::cancel`] has run.
	pub fn is_cancelled(&self) -> bool {
		self.handle.cancelled.get()
	}

	/// Cancels the pending frame and stops rescheduling.
	pub fn cancel(&self) {
		if self.handle.cancelled.replace(true) {
			return;
		}
		if let (Some(id), Some(window)) = (self.handle.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}
