//! Rendering pipeline: engine, pipeline registry, and the WGSL shaders.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
