mod camera;
mod component;
mod config;
mod error;
mod frame_loop;
mod graph;
pub mod ingest;
mod interaction;
mod overlay;
mod render;
mod session;
mod simulation;
mod types;

pub use camera::{Camera, Viewport};
pub use component::InteractiveView;
pub use config::{OverlayConfig, SimulationConfig, ZoomLimits};
pub use error::OverlayError;
pub use frame_loop::FrameLoop;
pub use graph::{Edge, Graph, Node};
pub use interaction::{Controller, InputOutcome, WheelUnit, hit_test};
pub use overlay::GraphSession;
pub use render::{CanvasSurface, Surface, render};
pub use session::{Phase, SessionCore};
pub use simulation::Simulator;
pub use types::{GraphData, GraphLink, GraphNode};
