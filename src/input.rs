//! Keyboard state for camera movement and render toggles

use macroquad::prelude::*;
use crate::rasterizer::Vec3;

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub right: bool,   // D
    pub left: bool,    // A
    pub up: bool,      // Q
    pub down: bool,    // E
    pub forward: bool, // W
    pub back: bool,    // S
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

impl MoveKeys {
    pub fn poll() -> Self {
        Self {
            right: is_key_down(KeyCode::D),
            left: is_key_down(KeyCode::A),
            up: is_key_down(KeyCode::Q),
            down: is_key_down(KeyCode::E),
            forward: is_key_down(KeyCode::W),
            back: is_key_down(KeyCode::S),
        }
    }

    /// Unscaled world-space direction; opposing keys cancel
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.back),
        )
    }
}

/// Everything the frame loop reads from the keyboard
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub keys: MoveKeys,
    /// Left shift held: draw meshes as outlines
    pub wireframe: bool,
    pub screenshot: bool,
    pub quit: bool,
}

impl FrameInput {
    pub fn poll() -> Self {
        Self {
            keys: MoveKeys::poll(),
            wireframe: is_key_down(KeyCode::LeftShift),
            screenshot: is_key_pressed(KeyCode::F12),
            quit: is_key_pressed(KeyCode::Escape),
        }
    }

    /// Camera translation for this frame
    pub fn movement(&self, speed: f32) -> Vec3 {
        self.keys.direction() * speed
    }
}
