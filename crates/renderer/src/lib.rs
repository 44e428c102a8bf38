//! Rendering system using wgpu for Starfolio.

pub mod camera;
pub mod pipeline;
pub mod renderer;
pub mod text;
pub mod vertex;

pub use camera::*;
pub use pipeline::*;
pub use renderer::*;
pub use text::*;
pub use vertex::*;
