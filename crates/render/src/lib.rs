//! Rendering adapter: renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers read the scene after the tick's updates complete and never
//!   mutate it.
//! - The view derives from the camera rig's state.
//!
//! The GPU backend lives outside this workspace; the text and report
//! renderers cover headless use.

mod renderer;

pub use renderer::{
    DebugTextRenderer, FrameReport, RenderView, Renderer, ReportRenderer, TerrainReport,
};

pub fn crate_info() -> &'static str {
    "wayfarer-render v0.1.0"
}
