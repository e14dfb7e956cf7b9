//! WebGPU rendering module
//!
//! A single color-vertex pipeline: the scene builder flattens game state
//! into triangles, the pipeline maps playfield coordinates to NDC and draws.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
