//! # Graphics Module
//!
//! Everything render-related: the fixed-aim camera, procedural primitive
//! geometry, the owning scene tree, GPU resources (materials, textures,
//! global uniforms) and the wgpu render engine with its shadow pass.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::render_engine::RenderEngine;
