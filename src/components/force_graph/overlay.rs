use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, Document, Element, Event, EventTarget,
	HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, Node, WheelEvent, Window,
};

use super::camera::Viewport;
use super::config::OverlayConfig;
use super::error::{OverlayError, describe};
use super::frame_loop::FrameLoop;
use super::interaction::{InputOutcome, WheelUnit};
use super::render::CanvasSurface;
use super::session::{Phase, SessionCore};
use super::types::GraphData;

const OVERLAY_STYLE: &str = "position: fixed; inset: 0; z-index: 10000; background: #08090b;";
const CANVAS_STYLE: &str = "display: block; width: 100%; height: 100%; cursor: grab;";
const CLOSE_STYLE: &str = "position: absolute; top: 12px; right: 12px; padding: 6px 12px; \
	border: 1px solid rgba(255, 180, 80, 0.4); border-radius: 4px; background: #131418; \
	color: #e8e6e3; font: 13px sans-serif; cursor: pointer;";
const HINT_STYLE: &str = "position: absolute; left: 12px; bottom: 12px; \
	color: rgba(232, 230, 227, 0.55); font: 12px sans-serif; pointer-events: none;";
const CLOSE_TEXT: &str = "Close (Esc)";
const HINT_TEXT: &str = "Scroll: zoom · Drag: pan · Click: focus";

/// An event listener that unregisters itself when dropped.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn bind(
		target: &EventTarget,
		event: &'static str,
		passive: Option<bool>,
		callback: Closure<dyn FnMut(Event)>,
	) -> Result<Self, OverlayError> {
		let function: &js_sys::Function = callback.as_ref().unchecked_ref();
		let bound = match passive {
			Some(passive) => {
				let options = AddEventListenerOptions::new();
				options.set_passive(passive);
				target.add_event_listener_with_callback_and_add_event_listener_options(
					event, function, &options,
				)
			}
			None => target.add_event_listener_with_callback(event, function),
		};
		bound.map_err(|e| OverlayError::Listener {
			event,
			reason: describe(&e),
		})?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

struct OverlayDom {
	overlay: HtmlElement,
	canvas: HtmlCanvasElement,
	close: HtmlElement,
}

impl OverlayDom {
	fn build(document: &Document) -> Result<Self, OverlayError> {
		let surface_err = |e: JsValue| OverlayError::Surface(describe(&e));
		let element = |tag: &str, class: &str, style: &str| -> Result<Element, OverlayError> {
			let el = document.create_element(tag).map_err(surface_err)?;
			el.set_class_name(class);
			el.set_attribute("style", style).map_err(surface_err)?;
			Ok(el)
		};

		let overlay: HtmlElement = element("div", "graph-overlay", OVERLAY_STYLE)?.unchecked_into();
		let canvas: HtmlCanvasElement =
			element("canvas", "graph-overlay-canvas", CANVAS_STYLE)?.unchecked_into();
		let close: HtmlElement =
			element("button", "graph-overlay-close", CLOSE_STYLE)?.unchecked_into();
		close.set_text_content(Some(CLOSE_TEXT));
		let hint = element("div", "graph-overlay-hint", HINT_STYLE)?;
		hint.set_text_content(Some(HINT_TEXT));

		let children: [&Node; 3] = [canvas.as_ref(), close.as_ref(), hint.as_ref()];
		for child in children {
			overlay.append_child(child).map_err(surface_err)?;
		}
		Ok(Self {
			overlay,
			canvas,
			close,
		})
	}
}

struct Shared {
	core: RefCell<SessionCore>,
	surface: RefCell<CanvasSurface>,
	dom: OverlayDom,
	window: Window,
	max_pixel_ratio: f64,
	frame_loop: RefCell<Option<FrameLoop>>,
	listeners: RefCell<Vec<Listener>>,
	on_close: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// CSS size of the overlay and the backing-store ratio to use for it.
fn measure(
	window: &Window,
	overlay: &HtmlElement,
	max_pixel_ratio: f64,
) -> Result<(Viewport, f64), OverlayError> {
	let (mut w, mut h) = (overlay.client_width() as f64, overlay.client_height() as f64);
	if w <= 0.0 || h <= 0.0 {
		let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(w, h) = (inner(window.inner_width()), inner(window.inner_height()));
	}
	if w <= 0.0 || h <= 0.0 {
		return Err(OverlayError::Surface(format!("overlay has no area ({w}x{h})")));
	}
	let ratio = match window.device_pixel_ratio() {
		r if r > 0.0 => r.min(max_pixel_ratio),
		_ => 1.0,
	};
	Ok((Viewport::new(w, h), ratio))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: &Viewport, ratio: f64) {
	canvas.set_width((viewport.width * ratio).round() as u32);
	canvas.set_height((viewport.height * ratio).round() as u32);
}

impl Shared {
	fn tick(&self, timestamp: f64) {
		let mut surface = self.surface.borrow_mut();
		self.core.borrow_mut().frame(timestamp, &mut *surface);
	}

	fn resize(&self) {
		match measure(&self.window, &self.dom.overlay, self.max_pixel_ratio) {
			Ok((viewport, ratio)) => {
				size_canvas(&self.dom.canvas, &viewport, ratio);
				self.surface.borrow_mut().resize(viewport, ratio);
				self.core.borrow_mut().resize(viewport);
			}
			Err(e) => warn!("keeping previous size: {e}"),
		}
	}

	fn local_point(&self, ev: &MouseEvent) -> (f64, f64) {
		let rect = self.dom.canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	}

	/// Tears the session down from outside any of its own listeners.
	fn request_close(this: &Rc<Self>) {
		let weak = Rc::downgrade(this);
		let deferred = Closure::once_into_js(move || {
			if let Some(shared) = weak.upgrade() {
				shared.destroy();
			}
		});
		if let Err(e) = this
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				deferred.unchecked_ref::<js_sys::Function>(),
				0,
			) {
			error!("failed to schedule overlay close: {}", describe(&e));
		}
	}

	fn destroy(&self) {
		if !self.core.borrow_mut().destroy() {
			return;
		}
		let frame_loop = self.frame_loop.borrow_mut().take();
		if let Some(frame_loop) = frame_loop {
			frame_loop.cancel();
		}
		let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
		drop(listeners);
		self.dom.overlay.remove();
		info!("graph overlay closed");

		let on_close = self.on_close.borrow_mut().take();
		if let Some(on_close) = on_close {
			on_close();
		}
	}

	fn listen<E: JsCast + 'static>(
		this: &Rc<Self>,
		target: &EventTarget,
		event: &'static str,
		passive: Option<bool>,
		handler: impl Fn(&Rc<Self>, E) + 'static,
	) -> Result<(), OverlayError> {
		let weak = Rc::downgrade(this);
		let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let (Some(shared), Ok(ev)) = (weak.upgrade(), ev.dyn_into::<E>()) else {
				return;
			};
			handler(&shared, ev);
		});
		let listener = Listener::bind(target, event, passive, callback)?;
		this.listeners.borrow_mut().push(listener);
		Ok(())
	}

	fn bind_listeners(this: &Rc<Self>) -> Result<(), OverlayError> {
		let canvas: &EventTarget = this.dom.canvas.as_ref();
		let window: &EventTarget = this.window.as_ref();

		Self::listen(this, canvas, "wheel", Some(false), |s, ev: WheelEvent| {
			ev.prevent_default();
			let unit = WheelUnit::from_delta_mode(ev.delta_mode());
			s.core.borrow_mut().wheel(ev.delta_y(), unit);
		})?;
		Self::listen(this, canvas, "mousedown", None, |s, ev: MouseEvent| {
			let (x, y) = s.local_point(&ev);
			s.core.borrow_mut().pointer_down(x, y);
		})?;
		Self::listen(this, window, "mousemove", None, |s, ev: MouseEvent| {
			let (x, y) = s.local_point(&ev);
			s.core.borrow_mut().pointer_move(x, y);
		})?;
		Self::listen(this, window, "mouseup", None, |s, _: MouseEvent| {
			s.core.borrow_mut().pointer_up();
		})?;
		Self::listen(this, canvas, "click", None, |s, ev: MouseEvent| {
			let (x, y) = s.local_point(&ev);
			s.core.borrow_mut().click(x, y);
		})?;
		Self::listen(this, window, "keydown", None, |s, ev: KeyboardEvent| {
			let outcome = s.core.borrow_mut().key_down(&ev.key());
			if outcome == InputOutcome::Close {
				ev.prevent_default();
				Self::request_close(s);
			}
		})?;
		Self::listen(this, this.dom.close.as_ref(), "click", None, |s, ev: MouseEvent| {
			ev.stop_propagation();
			Self::request_close(s);
		})?;
		Self::listen(this, window, "resize", None, |s, _: Event| s.resize())?;
		Ok(())
	}
}

/// A running graph overlay, owned by whoever launched it.
///
/// Dropping the session tears it down just like [`GraphSession::destroy`].
pub struct GraphSession {
	shared: Rc<Shared>,
}

impl GraphSession {
	/// Opens the overlay inside `container` and starts the frame loop.
	///
	/// `on_close` fires once when the session ends, whether by the close
	/// button, the Escape key, [`GraphSession::destroy`] or drop. On error any
	/// partially built overlay is removed again.
	pub fn launch(
		container: &Element,
		data: &GraphData,
		config: OverlayConfig,
		on_close: impl FnOnce() + 'static,
	) -> Result<Self, OverlayError> {
		config.validate()?;
		let window = web_sys::window().ok_or(OverlayError::NoWindow)?;
		let document = window.document().ok_or(OverlayError::NoDocument)?;
		let dom = OverlayDom::build(&document)?;
		container
			.append_child(&dom.overlay)
			.map_err(|e| OverlayError::Surface(describe(&e)))?;

		let overlay = dom.overlay.clone();
		Self::attach(window, dom, data, config, Box::new(on_close)).inspect_err(|e| {
			error!("graph overlay failed to start: {e}");
			overlay.remove();
		})
	}

	fn attach(
		window: Window,
		dom: OverlayDom,
		data: &GraphData,
		config: OverlayConfig,
		on_close: Box<dyn FnOnce()>,
	) -> Result<Self, OverlayError> {
		let ctx: CanvasRenderingContext2d = dom
			.canvas
			.get_context("2d")
			.map_err(|e| OverlayError::Surface(describe(&e)))?
			.ok_or_else(|| OverlayError::Surface("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| OverlayError::Surface("unexpected context type".into()))?;

		let (viewport, ratio) = measure(&window, &dom.overlay, config.max_device_pixel_ratio)?;
		size_canvas(&dom.canvas, &viewport, ratio);

		let shared = Rc::new(Shared {
			core: RefCell::new(SessionCore::new(data, &config, viewport)),
			surface: RefCell::new(CanvasSurface::new(ctx, viewport, ratio)),
			dom,
			window,
			max_pixel_ratio: config.max_device_pixel_ratio,
			frame_loop: RefCell::new(None),
			listeners: RefCell::new(Vec::new()),
			on_close: RefCell::new(Some(on_close)),
		});
		Shared::bind_listeners(&shared)?;
		shared.core.borrow_mut().start();

		let weak = Rc::downgrade(&shared);
		let frame_loop = FrameLoop::start(move |timestamp| {
			if let Some(shared) = weak.upgrade() {
				shared.tick(timestamp);
			}
		})?;
		*shared.frame_loop.borrow_mut() = Some(frame_loop);

		info!("graph overlay launched ({}x{} @{ratio}x)", viewport.width, viewport.height);
		Ok(Self { shared })
	}

	/// True until the session is destroyed.
	pub fn is_active(&self) -> bool {
		self.shared.core.borrow().phase() == Phase::Running
	}

	/// Index of the focused node, if any.
	pub fn focus(&self) -> Option<usize> {
		self.shared.core.borrow().graph().focus()
	}

	/// Stops the frame loop, unbinds listeners and removes the overlay.
	/// Calling it again does nothing.
	pub fn destroy(&self) {
		self.shared.destroy();
	}
}

impl Drop for GraphSession {
	fn drop(&mut self) {
		self.shared.destroy();
	}
}
