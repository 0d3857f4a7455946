use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::frame::{FrameLoop, ViewportSource};
use super::{config_from_element, to_js};
use crate::color::Color;
use crate::error::SceneError;
use crate::graph::{Geometry, Material, Node};
use crate::lifecycle::SceneLifecycle;

/// A mounted scene, as seen by page-level JavaScript components.
///
/// Mount on component mount, `dispose()` (or `free()`) on unmount.
#[wasm_bindgen]
pub struct SceneHandle {
    frames: FrameLoop,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Appends a canvas to `mount`, configured from its `data-*` attributes.
    #[wasm_bindgen(constructor)]
    pub fn new(mount: Element) -> Result<SceneHandle, JsValue> {
        let config = config_from_element(&mount).map_err(to_js)?;
        let source = ViewportSource::detect(&mount);
        let viewport = source
            .measure()
            .ok_or_else(|| JsValue::from_str("mount element has no size"))?;
        let scene = SceneLifecycle::mount(&mount, viewport, config).map_err(to_js)?;
        Ok(Self {
            frames: FrameLoop::new(scene, source),
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.frames.start(None).map_err(to_js)
    }

    pub fn stop(&mut self) {
        self.frames.stop();
    }

    pub fn render(&self) -> Result<(), JsValue> {
        self.frames.render().map_err(to_js)
    }

    /// Refits the scene to the mount element's current size.
    pub fn resize(&self) -> Result<(), JsValue> {
        self.frames.resize().map_err(to_js)
    }

    pub fn dispose(&mut self) {
        self.frames.dispose();
    }

    #[wasm_bindgen(js_name = isDisposed)]
    pub fn is_disposed(&self) -> bool {
        self.frames.with_scene(|scene| scene.is_disposed()).unwrap_or(true)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    #[wasm_bindgen(js_name = childCount)]
    pub fn child_count(&self) -> usize {
        self.frames.with_scene(|scene| scene.graph().len()).unwrap_or(0)
    }

    /// Removes the root child at `index`, freeing its GPU buffers.
    pub fn remove(&self, index: usize) -> bool {
        self.frames.with_scene(|scene| scene.remove(index)).unwrap_or(false)
    }

    /// Removes every node but keeps the canvas mounted.
    pub fn clear(&self) -> Result<(), JsValue> {
        self.frames.with_scene(|scene| scene.clear()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&self, color: &str) -> Result<(), JsValue> {
        let color = color
            .parse::<Color>()
            .map_err(|err| to_js(SceneError::from(err)))?;
        self.frames
            .with_scene(|scene| scene.set_background(color))
            .and_then(|result| result)
            .map_err(to_js)
    }

    /// Adds filled triangles from flat `xyz` positions.
    #[wasm_bindgen(js_name = addMesh)]
    pub fn add_mesh(
        &self,
        positions: Vec<f32>,
        color: &str,
        opacity: f32,
    ) -> Result<(), JsValue> {
        self.add(Node::mesh, positions, color, |m| m.with_opacity(opacity))
    }

    #[wasm_bindgen(js_name = addLine)]
    pub fn add_line(
        &self,
        positions: Vec<f32>,
        color: &str,
        opacity: f32,
    ) -> Result<(), JsValue> {
        self.add(Node::line, positions, color, |m| m.with_opacity(opacity))
    }

    #[wasm_bindgen(js_name = addPoints)]
    pub fn add_points(
        &self,
        positions: Vec<f32>,
        color: &str,
        size: f32,
    ) -> Result<(), JsValue> {
        self.add(Node::points, positions, color, |m| m.with_point_size(size))
    }
}

impl SceneHandle {
    fn add(
        &self,
        node: fn(Geometry, Material) -> Node,
        positions: Vec<f32>,
        color: &str,
        style: impl FnOnce(Material) -> Material,
    ) -> Result<(), JsValue> {
        let build = || -> Result<Node, SceneError> {
            let geometry = Geometry::from_positions(positions)?;
            let color = color.parse::<Color>()?;
            Ok(node(geometry, style(Material::new(color))))
        };
        let node = build().map_err(to_js)?;
        self.frames
            .with_scene(|scene| scene.add(node))
            .and_then(|result| result)
            .map_err(to_js)
    }
}
