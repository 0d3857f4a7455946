//! Scene lifecycle for embedded graphics demos: an orthographic camera that
//! tracks the viewport, a tagged-variant scene graph, post-order resource
//! disposal and, on wasm32, a WebGL2 surface driven by the browser's frame
//! loop.

pub mod camera;
pub mod color;
pub mod config;
pub mod dispose;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod surface;
pub mod viewport;

pub use camera::{ClipPlanes, Frustum, OrthographicCamera};
pub use color::Color;
pub use config::SceneConfig;
pub use dispose::{dispose_graph, dispose_node, ReleaseResources};
pub use error::{ConfigError, SceneError};
pub use graph::{
    Drawable, Geometry, GeometryId, Material, MaterialId, Node, NodeKind, SceneGraph,
};
pub use lifecycle::SceneLifecycle;
pub use surface::RenderSurface;
pub use viewport::Viewport;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use web_sys::Element;

    use crate::config::SceneConfig;
    use crate::error::SceneError;

    mod demo;
    mod frame;
    mod handle;
    mod render;

    pub use frame::{FrameHook, FrameLoop, ViewportSource};
    pub use handle::SceneHandle;
    pub use render::WebGlSurface;

    thread_local! {
        static DEMO: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        if let Some(mount) = document.get_element_by_id("scene") {
            let frames = demo::mount_rings(mount).map_err(to_js)?;
            DEMO.with(|slot| *slot.borrow_mut() = Some(frames));
        }
        Ok(())
    }

    /// Reads [`SceneConfig`] from the element's `data-*` attributes.
    pub fn config_from_element(element: &Element) -> Result<SceneConfig, SceneError> {
        Ok(SceneConfig::from_lookup(|key| element.get_attribute(&format!("data-{key}")))?)
    }

    pub(crate) fn platform_error(value: JsValue) -> SceneError {
        SceneError::Platform(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }

    pub(crate) fn to_js(err: SceneError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}
