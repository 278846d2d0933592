//! # Scene Management Module
//!
//! The owning scene tree and its vertex data. Nodes form a strict tree:
//! every node is owned by exactly one parent (or sits at the scene root),
//! and world transforms are the composition of the ancestor chain.

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{DrawNode, Mesh, Node};
pub use scene::Scene;
pub use vertex::Vertex3D;
