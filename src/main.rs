//! Browser entry point: mounts the demo app.

use force_graph_overlay::{App, init_logging};
use leptos::mount::mount_to_body;

fn main() {
	init_logging();
	mount_to_body(App);
}
