//! Minimal software rasterizer
//!
//! Features:
//! - Pinhole camera with a fixed basis and translate-only movement
//! - DDA line drawing
//! - Scanline triangle fill (wireframe or solid)
//! - Packed RGBA8888 framebuffer with clipped, bounds-checked writes

mod camera;
mod framebuffer;
mod math;
mod types;

pub use camera::*;
pub use framebuffer::*;
pub use math::*;
pub use types::*;

/// Default framebuffer dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
