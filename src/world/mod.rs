//! World module - meshes and scene files
//!
//! Plain data consumed by the camera each frame:
//! - Indexed triangle meshes with a wireframe/filled flag
//! - RON scene files describing the camera and the meshes

mod mesh;
mod scene;

pub use mesh::*;
pub use scene::*;
