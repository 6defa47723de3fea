//! Core types for the rasterizer

use serde::{Serialize, Deserialize};

/// RGBA color (0-255 per channel)
///
/// This is the in-core representation. The framebuffer stores colors as
/// packed RGBA8888 cells, produced by [`Color::pack`] at write time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const ORANGE: Color = Color { r: 255, g: 192, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack into an RGBA8888 cell: red in the most significant byte,
    /// alpha in the least. Does not depend on host byte order.
    pub const fn pack(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    /// Inverse of [`Color::pack`]
    pub const fn unpack(cell: u32) -> Self {
        Self {
            r: (cell >> 24) as u8,
            g: (cell >> 16) as u8,
            b: (cell >> 8) as u8,
            a: cell as u8,
        }
    }

    /// Bytes in display order [r, g, b, a]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A rounded pixel coordinate. Origin top-left, x right, y down.
///
/// May lie outside the framebuffer; drawing clips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Largest image side; display textures use 16-bit dimensions
pub const MAX_IMAGE_SIDE: usize = u16::MAX as usize;

/// Why a camera could not be built
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    EmptyImage { width: usize, height: usize },
    /// Larger than a display texture can hold
    ImageTooLarge { width: usize, height: usize },
    InvalidFov(f32),
    /// Origin and look target coincide, so there is no view direction
    ZeroFocalLength,
    /// Up hint is parallel to the view direction
    DegenerateBasis,
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::EmptyImage { width, height } => {
                write!(f, "image size {}x{} has no pixels", width, height)
            }
            CameraError::ImageTooLarge { width, height } => {
                write!(f, "image size {}x{} exceeds {}x{}", width, height, MAX_IMAGE_SIDE, MAX_IMAGE_SIDE)
            }
            CameraError::InvalidFov(fov) => {
                write!(f, "vertical fov {} is outside (0, 180) degrees", fov)
            }
            CameraError::ZeroFocalLength => write!(f, "camera origin equals look target"),
            CameraError::DegenerateBasis => write!(f, "up vector is parallel to view direction"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Why a world point could not be projected to the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectError {
    /// Camera-relative depth is zero or negative
    BehindCamera { z: f32 },
    NonFinite,
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::BehindCamera { z } => write!(f, "point at depth {} is not in front of the camera", z),
            ProjectError::NonFinite => write!(f, "projection is not finite"),
        }
    }
}

impl std::error::Error for ProjectError {}
