use crate::camera::OrthographicCamera;
use crate::color::Color;
use crate::dispose::ReleaseResources;
use crate::graph::SceneGraph;
use crate::viewport::Viewport;

/// A drawable target attached to some host display tree.
///
/// Implementations own their graphics context outright; the lifecycle
/// manager is their only caller.
pub trait RenderSurface: ReleaseResources {
    /// Matches the surface to `viewport` (CSS pixels).
    fn resize(&mut self, viewport: Viewport);

    fn set_background(&mut self, color: Color);

    /// One synchronous draw of `graph` through `camera`.
    fn draw(&mut self, graph: &SceneGraph, camera: &OrthographicCamera);

    /// Releases the context and removes the surface from its host.
    /// Calling it again does nothing.
    fn detach(&mut self);
}
