use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;
use log::{error, warn};

use super::config::OverlayConfig;
use super::ingest;
use super::overlay::GraphSession;
use super::types::GraphData;

/// Holds the live session. The hook handed to the session's close callback
/// empties it, so nothing of a closed session is kept around.
struct SessionSlot<T>(Rc<RefCell<Option<T>>>);

impl<T: 'static> SessionSlot<T> {
	fn new() -> Self {
		Self(Rc::new(RefCell::new(None)))
	}

	fn fill(&self, value: T) {
		let previous = self.0.borrow_mut().replace(value);
		drop(previous);
	}

	#[cfg(test)]
	fn is_filled(&self) -> bool {
		self.0.borrow().is_some()
	}

	/// Empties the slot when called, unless it is already gone or borrowed
	/// (it is then being replaced or dropped anyway).
	fn release_hook(&self) -> impl FnOnce() + 'static {
		let slot = Rc::downgrade(&self.0);
		move || {
			let released = slot
				.upgrade()
				.and_then(|slot| slot.try_borrow_mut().ok().and_then(|mut s| s.take()));
			drop(released);
		}
	}
}

/// A toolbar button that opens a graph in a full-window overlay.
///
/// With `source` set, the diagram inside that element is read when the
/// button is pressed (see [`ingest::read_embedded`]); otherwise `data` is
/// used. The button stays disabled while the overlay is open.
#[component]
pub fn InteractiveView(
	/// A ready-made graph.
	#[prop(optional, into)]
	data: Option<Signal<GraphData>>,
	/// Element holding a rendered diagram to read at launch.
	#[prop(optional)]
	source: Option<NodeRef<Div>>,
	/// Overlay tuning.
	#[prop(optional)]
	config: OverlayConfig,
	/// Button text.
	#[prop(default = "Interactive View")]
	label: &'static str,
) -> impl IntoView {
	let slot: SessionSlot<GraphSession> = SessionSlot::new();
	let active = RwSignal::new(false);

	let on_launch = move |_| {
		let Some(body) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.body())
		else {
			error!("no document body to host the graph overlay");
			return;
		};
		let graph = match (source, data) {
			(Some(source), _) => match source.get_untracked() {
				Some(host) => ingest::read_embedded(host.as_ref()),
				None => {
					warn!("diagram source is not mounted; opening an empty graph");
					GraphData::default()
				}
			},
			(None, Some(data)) => data.get_untracked(),
			(None, None) => GraphData::default(),
		};
		let release = slot.release_hook();
		let on_close = move || {
			let _ = active.try_set(false);
			release();
		};
		match GraphSession::launch(&body, &graph, config, on_close) {
			Ok(launched) => {
				slot.fill(launched);
				active.set(true);
			}
			Err(e) => error!("could not open interactive view: {e}"),
		}
	};

	view! {
		<div class="graph-toolbar">
			<button
				class="graph-toolbar-button"
				on:click=on_launch
				disabled=move || active.get()
			>
				{label}
			</button>
		</div>
	}
}
