//! Orthographic camera whose clip planes follow the viewport.
//!
//! The camera sits on the +Z axis looking at the origin with +Y up. Its
//! left/right/top/bottom planes are derived from the viewport through a
//! [`Frustum`]; changing them marks the projection dirty and
//! [`OrthographicCamera::update_projection_matrix`] recomputes it.

use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::viewport::Viewport;

/// How clip planes are derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frustum {
    /// Half extents are `max(side - inset, 1) * scale`.
    Viewport { scale: f64, inset: f64 },
    /// Planes at `±half_width`, `±half_height` regardless of viewport.
    Fixed { half_width: f64, half_height: f64 },
}

impl Default for Frustum {
    fn default() -> Self {
        Frustum::Viewport {
            scale: 0.5,
            inset: 0.0,
        }
    }
}

impl Frustum {
    pub fn half_extents(&self, viewport: &Viewport) -> (f64, f64) {
        match *self {
            Frustum::Viewport { scale, inset } => (
                (viewport.width() - inset).max(1.0) * scale,
                (viewport.height() - inset).max(1.0) * scale,
            ),
            Frustum::Fixed { half_width, half_height } => (half_width, half_height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub near: f64,
    pub far: f64,
}

impl ClipPlanes {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    planes: ClipPlanes,
    frustum: Frustum,
    position: Point3<f32>,
    target: Point3<f32>,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    projection_dirty: bool,
}

impl OrthographicCamera {
    pub fn new(viewport: &Viewport, frustum: Frustum, near: f64, far: f64, distance: f64) -> Self {
        let (half_w, half_h) = frustum.half_extents(viewport);
        let mut camera = Self {
            planes: ClipPlanes {
                left: -half_w,
                right: half_w,
                top: half_h,
                bottom: -half_h,
                near,
                far,
            },
            frustum,
            position: Point3::new(0.0, 0.0, distance as f32),
            target: Point3::origin(),
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            projection_dirty: true,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix();
        camera
    }

    /// Recomputes the clip planes for `viewport` and marks the projection dirty.
    pub fn fit_viewport(&mut self, viewport: &Viewport) {
        let (half_w, half_h) = self.frustum.half_extents(viewport);
        self.planes.left = -half_w;
        self.planes.right = half_w;
        self.planes.top = half_h;
        self.planes.bottom = -half_h;
        self.projection_dirty = true;
    }

    pub fn set_frustum(&mut self, frustum: Frustum, viewport: &Viewport) {
        self.frustum = frustum;
        self.fit_viewport(viewport);
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    pub fn update_projection_matrix(&mut self) {
        let p = &self.planes;
        self.projection = Matrix4::new_orthographic(
            p.left as f32,
            p.right as f32,
            p.bottom as f32,
            p.top as f32,
            p.near as f32,
            p.far as f32,
        );
        self.projection_dirty = false;
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    pub fn planes(&self) -> ClipPlanes {
        self.planes
    }

    /// Width over height of the clip volume.
    pub fn aspect(&self) -> f64 {
        self.planes.width() / self.planes.height()
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.update_view_matrix();
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
        self.update_view_matrix();
    }

    fn update_view_matrix(&mut self) {
        // Degenerate when eye and target coincide; keep the previous view.
        if self.position == self.target {
            return;
        }
        self.view =
            Isometry3::look_at_rh(&self.position, &self.target, &Vector3::y()).to_homogeneous();
    }
}
