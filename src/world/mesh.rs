//! Indexed triangle meshes
//!
//! Pure data: no projection or drawing happens here.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Vec3};

/// A triangle face (indices into the mesh's vertex list) with one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub i0: usize,
    pub i1: usize,
    pub i2: usize,
    pub color: Color,
}

impl Triangle {
    pub const fn new(i0: usize, i1: usize, i2: usize, color: Color) -> Self {
        Self { i0, i1, i2, color }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.i0, self.i1, self.i2]
    }
}

/// Error type for mesh construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IndexOutOfRange { triangle, index, vertex_count } => write!(
                f,
                "triangle {} references vertex {} but the mesh has {} vertices",
                triangle, index, vertex_count
            ),
        }
    }
}

impl std::error::Error for MeshError {}

/// Vertex list plus indexed, colored triangles
///
/// Triangle indices are checked once at construction. Vertex positions may
/// be moved afterwards but the lists never grow or shrink.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    triangles: Vec<Triangle>,
    /// Draw outlines instead of filled triangles
    pub wireframe: bool,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Result<Self, MeshError> {
        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.indices().iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    triangle: t,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        log::info!("New mesh with {} vertices and {} triangles", vertices.len(), triangles.len());

        Ok(Self {
            vertices,
            triangles,
            wireframe: false,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vec3] {
        &mut self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Axis-aligned box between `min` and `max`, two triangles per side.
    ///
    /// `face_colors` order: near (z = min), far (z = max), left, right,
    /// bottom, top.
    pub fn cuboid(min: Vec3, max: Vec3, face_colors: [Color; 6]) -> Self {
        let vertices = vec![
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, min.y, max.z),
        ];

        let [near, far, left, right, bottom, top] = face_colors;
        let triangles = vec![
            Triangle::new(1, 0, 2, near),
            Triangle::new(3, 0, 2, near),
            Triangle::new(5, 4, 6, far),
            Triangle::new(7, 4, 6, far),
            Triangle::new(1, 0, 5, left),
            Triangle::new(4, 0, 5, left),
            Triangle::new(2, 3, 6, right),
            Triangle::new(7, 3, 6, right),
            Triangle::new(4, 0, 7, bottom),
            Triangle::new(3, 0, 7, bottom),
            Triangle::new(5, 1, 6, top),
            Triangle::new(2, 1, 6, top),
        ];

        log::info!("New mesh with {} vertices and {} triangles", vertices.len(), triangles.len());

        Self {
            vertices,
            triangles,
            wireframe: false,
        }
    }
}
