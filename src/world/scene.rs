//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Camera, CameraError, Color, Vec3, HEIGHT, WIDTH};
use super::mesh::{Mesh, MeshError, Triangle};

/// Camera construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub origin: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub width: usize,
    pub height: usize,
}

/// Display window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window pixels per framebuffer pixel
    pub zoom: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Camera".to_string(),
            zoom: 3.0,
        }
    }
}

/// Serialized form of a [`Mesh`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
    #[serde(default)]
    pub wireframe: bool,
}

impl MeshConfig {
    pub fn build(&self) -> Result<Mesh, MeshError> {
        let mut mesh = Mesh::new(self.vertices.clone(), self.triangles.clone())?;
        mesh.wireframe = self.wireframe;
        Ok(mesh)
    }
}

impl From<&Mesh> for MeshConfig {
    fn from(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices().to_vec(),
            triangles: mesh.triangles().to_vec(),
            wireframe: mesh.wireframe,
        }
    }
}

fn default_move_speed() -> f32 {
    0.05
}

/// Everything needed to start rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub camera: CameraConfig,
    #[serde(default)]
    pub window: WindowConfig,
    /// World units the camera moves per frame while a key is held
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    pub meshes: Vec<MeshConfig>,
}

impl Scene {
    /// Camera at the origin looking down +z, one colored cube in front of it
    pub fn demo() -> Self {
        let cube = Mesh::cuboid(
            Vec3::new(-2.0, -0.5, 5.0),
            Vec3::new(-1.0, 0.5, 6.0),
            [Color::WHITE, Color::WHITE, Color::RED, Color::ORANGE, Color::GREEN, Color::BLUE],
        );

        Self {
            camera: CameraConfig {
                origin: Vec3::ZERO,
                look_at: Vec3::FORWARD,
                up: Vec3::UP,
                vfov: 70.0,
                width: WIDTH,
                height: HEIGHT,
            },
            window: WindowConfig::default(),
            move_speed: default_move_speed(),
            meshes: vec![MeshConfig::from(&cube)],
        }
    }

    pub fn build_camera(&self) -> Result<Camera, SceneError> {
        let c = &self.camera;
        Ok(Camera::new(c.origin, c.look_at, c.up, c.vfov, c.width, c.height)?)
    }

    pub fn build_meshes(&self) -> Result<Vec<Mesh>, SceneError> {
        self.meshes
            .iter()
            .map(|m| m.build().map_err(SceneError::from))
            .collect()
    }
}

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    CameraError(CameraError),
    MeshError(MeshError),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl From<CameraError> for SceneError {
    fn from(e: CameraError) -> Self {
        SceneError::CameraError(e)
    }
}

impl From<MeshError> for SceneError {
    fn from(e: MeshError) -> Self {
        SceneError::MeshError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SceneError::CameraError(e) => write!(f, "Camera error: {}", e),
            SceneError::MeshError(e) => write!(f, "Mesh error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Load a scene from a RON string
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    fs::write(path, scene_to_string(scene)?)?;
    Ok(())
}

pub fn scene_to_string(scene: &Scene) -> Result<String, SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    Ok(ron::ser::to_string_pretty(scene, config)?)
}
