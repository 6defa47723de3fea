//! Pinhole camera: view frame construction and perspective projection
//!
//! The camera owns the framebuffer it draws into. Its basis is derived once
//! from the look target and never changes; `translate` only moves the
//! origin.

use super::framebuffer::Framebuffer;
use super::math::Vec3;
use super::types::{CameraError, Color, ProjectError, ScreenPoint, MAX_IMAGE_SIDE};
use crate::world::Mesh;

/// Counts from one `render` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// Translate-only camera
pub struct Camera {
    fb: Framebuffer,

    origin: Vec3,
    look_at: Vec3,
    up: Vec3,

    // Orthonormal frame: right, up, backward
    u: Vec3,
    v: Vec3,
    w: Vec3,

    vfov: f32,
    aspect: f32,
    focal: f32,
    viewport_width: f32,
    viewport_height: f32,

    pixel_du: Vec3,
    pixel_dv: Vec3,
    /// Pixel (0,0) sample location relative to the origin
    pixel00_offset: Vec3,
}

impl Camera {
    pub fn new(
        origin: Vec3,
        look_at: Vec3,
        up: Vec3,
        vfov_degrees: f32,
        image_width: usize,
        image_height: usize,
    ) -> Result<Self, CameraError> {
        if image_width == 0 || image_height == 0 {
            return Err(CameraError::EmptyImage { width: image_width, height: image_height });
        }
        if image_width > MAX_IMAGE_SIDE || image_height > MAX_IMAGE_SIDE {
            return Err(CameraError::ImageTooLarge { width: image_width, height: image_height });
        }
        if !(vfov_degrees > 0.0 && vfov_degrees < 180.0) {
            return Err(CameraError::InvalidFov(vfov_degrees));
        }

        let back = origin - look_at;
        let focal = back.len();
        if !(focal > 0.0) || !focal.is_finite() {
            return Err(CameraError::ZeroFocalLength);
        }

        let w = back.normalize();
        let right = up.normalize().cross(w);
        if right.len() < 1e-6 {
            return Err(CameraError::DegenerateBasis);
        }
        let u = right.normalize();
        let v = w.cross(u).normalize();

        let aspect = image_width as f32 / image_height as f32;
        let half_height = (vfov_degrees.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * focal * half_height;
        let viewport_width = viewport_height * aspect;

        // Screen rows grow downward while v points up
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_du = viewport_u / image_width as f32;
        let pixel_dv = viewport_v / image_height as f32;

        let upper_left = -(focal * w) - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_offset = upper_left + 0.5 * (pixel_du + pixel_dv);

        log::debug!(
            "camera at ({}, {}, {}) focal {} viewport {}x{}",
            origin.x, origin.y, origin.z, focal, viewport_width, viewport_height
        );

        Ok(Self {
            fb: Framebuffer::new(image_width, image_height),
            origin,
            look_at,
            up,
            u,
            v,
            w,
            vfov: vfov_degrees,
            aspect,
            focal,
            viewport_width,
            viewport_height,
            pixel_du,
            pixel_dv,
            pixel00_offset,
        })
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.fb
    }

    pub fn image_width(&self) -> usize {
        self.fb.width()
    }

    pub fn image_height(&self) -> usize {
        self.fb.height()
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// (u, v, w): right, up, backward
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// (width, height) in world units
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn pixel_delta_u(&self) -> Vec3 {
        self.pixel_du
    }

    pub fn pixel_delta_v(&self) -> Vec3 {
        self.pixel_dv
    }

    /// World location of the center of pixel (0,0). Follows the origin.
    pub fn pixel00_location(&self) -> Vec3 {
        self.origin + self.pixel00_offset
    }

    /// Move the origin. The basis and viewport are left untouched.
    pub fn translate(&mut self, delta: Vec3) {
        self.origin += delta;
    }

    /// Project a world point to a pixel coordinate.
    ///
    /// The point is made origin-relative but not rotated into the camera
    /// frame, so the result is exact only for a camera looking down +z with
    /// +y up. Points at or behind the origin plane (`z <= 0`) are rejected.
    /// The result is not clamped to the image.
    pub fn project(&self, point: Vec3) -> Result<ScreenPoint, ProjectError> {
        let rel = point - self.origin;
        if !rel.is_finite() {
            return Err(ProjectError::NonFinite);
        }
        if rel.z <= 0.0 {
            return Err(ProjectError::BehindCamera { z: rel.z });
        }

        let scale = self.focal / rel.z;
        let x = rel.x * scale;
        let y = rel.y * scale;

        let width = self.fb.width();
        let height = self.fb.height();
        let nx = x * width as f32 / self.viewport_width + (width / 2) as f32;
        let ny = y * height as f32 / self.viewport_height + (height / 2) as f32;
        if !nx.is_finite() || !ny.is_finite() {
            return Err(ProjectError::NonFinite);
        }

        Ok(ScreenPoint::new((nx + 0.5).floor() as i32, (ny + 0.5).floor() as i32))
    }

    pub fn clear(&mut self) {
        self.fb.clear();
    }

    pub fn point(&mut self, pt: Vec3, color: Color) -> Result<(), ProjectError> {
        let p = self.project(pt)?;
        self.fb.pixel(p.x, p.y, color);
        Ok(())
    }

    pub fn line(&mut self, pt0: Vec3, pt1: Vec3, color: Color) -> Result<(), ProjectError> {
        let p0 = self.project(pt0)?;
        let p1 = self.project(pt1)?;
        self.fb.line(p0, p1, color);
        Ok(())
    }

    pub fn triangle_wireframe(&mut self, pt0: Vec3, pt1: Vec3, pt2: Vec3, color: Color) -> Result<(), ProjectError> {
        let p0 = self.project(pt0)?;
        let p1 = self.project(pt1)?;
        let p2 = self.project(pt2)?;
        self.fb.triangle_wireframe(p0, p1, p2, color);
        Ok(())
    }

    pub fn triangle_filled(&mut self, pt0: Vec3, pt1: Vec3, pt2: Vec3, color: Color) -> Result<(), ProjectError> {
        let p0 = self.project(pt0)?;
        let p1 = self.project(pt1)?;
        let p2 = self.project(pt2)?;
        self.fb.triangle_filled(p0, p1, p2, color);
        Ok(())
    }

    /// Draw every triangle of a mesh in order, using the mesh's current
    /// wireframe flag. Each vertex is projected once. Triangles touching a
    /// vertex that failed to project are skipped.
    pub fn render(&mut self, mesh: &Mesh) -> RenderStats {
        let projected: Vec<Option<ScreenPoint>> = mesh
            .vertices()
            .iter()
            .map(|v| match self.project(*v) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::trace!("vertex ({}, {}, {}) not projected: {}", v.x, v.y, v.z, e);
                    None
                }
            })
            .collect();

        let mut stats = RenderStats::default();
        for tri in mesh.triangles() {
            let corners = (
                projected.get(tri.i0).copied().flatten(),
                projected.get(tri.i1).copied().flatten(),
                projected.get(tri.i2).copied().flatten(),
            );
            let (Some(p0), Some(p1), Some(p2)) = corners else {
                stats.skipped += 1;
                continue;
            };

            if mesh.wireframe {
                self.fb.triangle_wireframe(p0, p1, p2, tri.color);
            } else {
                self.fb.triangle_filled(p0, p1, p2, tri.color);
            }
            stats.drawn += 1;
        }
        stats
    }
}
