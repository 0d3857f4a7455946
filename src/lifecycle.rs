//! The construct → render → resize → dispose lifecycle of one scene.

use crate::camera::OrthographicCamera;
use crate::color::Color;
use crate::config::SceneConfig;
use crate::dispose::{dispose_graph, dispose_node};
use crate::error::SceneError;
use crate::graph::{Node, SceneGraph};
use crate::surface::RenderSurface;
use crate::viewport::Viewport;

/// Owns a render surface, an orthographic camera and the scene graph drawn
/// through them.
///
/// After [`SceneLifecycle::dispose`] the surface is detached and every call
/// that would touch it returns [`SceneError::Disposed`].
pub struct SceneLifecycle<S: RenderSurface> {
    surface: S,
    camera: OrthographicCamera,
    graph: SceneGraph,
    viewport: Viewport,
    background: Color,
    disposed: bool,
}

impl<S: RenderSurface> SceneLifecycle<S> {
    pub fn new(
        mut surface: S,
        viewport: Viewport,
        config: SceneConfig,
    ) -> Result<Self, SceneError> {
        config.validate()?;

        let camera = OrthographicCamera::new(
            &viewport,
            config.frustum,
            config.near,
            config.far,
            config.camera_distance,
        );
        surface.resize(viewport);
        surface.set_background(config.background);

        Ok(Self {
            surface,
            camera,
            graph: SceneGraph::new(),
            viewport,
            background: config.background,
            disposed: false,
        })
    }

    /// Draws the graph once.
    pub fn render(&mut self) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        if self.camera.is_projection_dirty() {
            self.camera.update_projection_matrix();
        }
        self.surface.draw(&self.graph, &self.camera);
        Ok(())
    }

    /// Refits camera and surface to `viewport`; neither changes on error.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        self.camera.fit_viewport(&viewport);
        self.camera.update_projection_matrix();
        self.surface.resize(viewport);
        self.viewport = viewport;
        log::debug!("resized to {}x{}", viewport.width(), viewport.height());
        Ok(())
    }

    /// Validates the raw size before touching anything.
    pub fn resize_to(&mut self, width: f64, height: f64) -> Result<(), SceneError> {
        let viewport = Viewport::new(width, height)?;
        self.resize(viewport)
    }

    /// Releases every graph resource, then detaches the surface.
    ///
    /// Safe to call any number of times.
    pub fn dispose(&mut self) {
        dispose_graph(&mut self.graph, &mut self.surface);
        if !self.disposed {
            self.surface.detach();
            self.disposed = true;
            log::info!("scene disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn add(&mut self, node: Node) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        self.graph.add(node);
        Ok(())
    }

    /// Detaches the root child at `index` and releases its resources to the
    /// surface. Returns `false` when there is no such child.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.graph.len() {
            return false;
        }
        let mut node = self.graph.children_mut().remove(index);
        dispose_node(&mut node, &mut self.surface);
        true
    }

    /// Releases every node while keeping the surface attached.
    pub fn clear(&mut self) {
        dispose_graph(&mut self.graph, &mut self.surface);
    }

    pub fn set_background(&mut self, color: Color) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        self.background = color;
        self.surface.set_background(color);
        Ok(())
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrthographicCamera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
