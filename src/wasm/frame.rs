//! Browser frame loop and resize listener for a mounted scene.
//!
//! Both callbacks share the scene through `Rc<RefCell<..>>`; everything runs
//! on the UI thread. [`FrameLoop::stop`] cancels the pending animation frame
//! and unregisters the resize listener, and always runs before disposal.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Element};

use super::platform_error;
use super::render::WebGlSurface;
use crate::error::SceneError;
use crate::lifecycle::SceneLifecycle;
use crate::viewport::Viewport;

/// Called before each render with the frame timestamp in milliseconds.
pub type FrameHook = Box<dyn FnMut(&mut SceneLifecycle<WebGlSurface>, f64)>;

#[derive(Default)]
struct FrameSlot {
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    pending: Cell<Option<i32>>,
    running: Cell<bool>,
}

/// Where resizes take their size from.
///
/// Decided once, before the canvas is appended: a mount sized only by its
/// content would otherwise report the canvas's own height back.
#[derive(Clone, Debug)]
pub enum ViewportSource {
    /// The element has a size of its own; follow its client box.
    Mount(Element),
    /// The element is unsized; follow the window's inner size.
    Window,
}

impl ViewportSource {
    pub fn detect(mount: &Element) -> Self {
        if mount.client_width() > 0 && mount.client_height() > 0 {
            ViewportSource::Mount(mount.clone())
        } else {
            ViewportSource::Window
        }
    }

    /// Current size in CSS pixels, `None` when it is empty.
    pub fn measure(&self) -> Option<Viewport> {
        match self {
            ViewportSource::Mount(mount) => {
                let width = mount.client_width() as f64;
                let height = mount.client_height() as f64;
                Viewport::new(width, height).ok()
            }
            ViewportSource::Window => {
                let window = window()?;
                let width = window.inner_width().ok()?.as_f64()?;
                let height = window.inner_height().ok()?.as_f64()?;
                Viewport::new(width, height).ok()
            }
        }
    }
}

pub struct FrameLoop {
    scene: Rc<RefCell<SceneLifecycle<WebGlSurface>>>,
    source: ViewportSource,
    frame: Rc<FrameSlot>,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

impl FrameLoop {
    pub fn new(scene: SceneLifecycle<WebGlSurface>, source: ViewportSource) -> Self {
        Self {
            scene: Rc::new(RefCell::new(scene)),
            source,
            frame: Rc::new(FrameSlot::default()),
            resize_listener: None,
        }
    }

    /// Starts rendering every animation frame and following window resizes.
    pub fn start(&mut self, hook: Option<FrameHook>) -> Result<(), SceneError> {
        if self.frame.running.get() {
            return Ok(());
        }
        if self.scene.borrow().is_disposed() {
            return Err(SceneError::Disposed);
        }
        let window = window().ok_or_else(|| SceneError::Platform("no window".into()))?;

        let listener = {
            let scene = self.scene.clone();
            let source = self.source.clone();
            Closure::wrap(Box::new(move || {
                let Some(viewport) = source.measure() else {
                    log::debug!("skipping resize to an empty viewport");
                    return;
                };
                let Ok(mut scene) = scene.try_borrow_mut() else {
                    return;
                };
                if let Err(err) = scene.resize(viewport) {
                    log::debug!("resize skipped: {err}");
                }
            }) as Box<dyn FnMut()>)
        };
        window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            .map_err(platform_error)?;
        self.resize_listener = Some(listener);

        // The closure only holds a weak reference to its own slot, so the
        // slot (and the closure inside it) is freed once the loop is dropped.
        let slot: Weak<FrameSlot> = Rc::downgrade(&self.frame);
        let scene = self.scene.clone();
        let mut hook = hook;
        let callback = Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            slot.pending.set(None);
            if !slot.running.get() {
                return;
            }

            if let Ok(mut scene) = scene.try_borrow_mut() {
                if let Some(hook) = hook.as_mut() {
                    hook(&mut *scene, timestamp);
                }
                match scene.render() {
                    Ok(()) => {}
                    Err(SceneError::Disposed) => {
                        slot.running.set(false);
                        return;
                    }
                    Err(err) => {
                        log::error!("render failed: {err}");
                        slot.running.set(false);
                        return;
                    }
                }
            }

            if let Err(err) = schedule(&slot) {
                log::error!("unable to schedule frame: {err}");
                slot.running.set(false);
            }
        }) as Box<dyn FnMut(f64)>);

        *self.frame.callback.borrow_mut() = Some(callback);
        self.frame.running.set(true);
        schedule(&self.frame)
    }

    /// Cancels the pending frame and unregisters the resize listener.
    pub fn stop(&mut self) {
        self.frame.running.set(false);
        if let Some(window) = window() {
            if let Some(handle) = self.frame.pending.take() {
                window.cancel_animation_frame(handle).ok();
            }
            if let Some(listener) = self.resize_listener.as_ref() {
                let callback = listener.as_ref().unchecked_ref();
                window
                    .remove_event_listener_with_callback("resize", callback)
                    .ok();
            }
        }
        self.resize_listener = None;
        self.frame.callback.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.frame.running.get()
    }

    /// Stops the loop, then disposes the scene.
    pub fn dispose(&mut self) {
        self.stop();
        match self.scene.try_borrow_mut() {
            Ok(mut scene) => scene.dispose(),
            Err(_) => log::warn!("scene busy during dispose"),
        }
    }

    pub fn render(&self) -> Result<(), SceneError> {
        self.with_scene(|scene| scene.render())?
    }

    /// Measures the viewport source and resizes the scene to match.
    pub fn resize(&self) -> Result<(), SceneError> {
        let viewport = self.source.measure().ok_or(SceneError::InvalidViewport {
            width: 0.0,
            height: 0.0,
        })?;
        self.with_scene(|scene| scene.resize(viewport))?
    }

    pub fn source(&self) -> &ViewportSource {
        &self.source
    }

    pub fn with_scene<R>(
        &self,
        f: impl FnOnce(&mut SceneLifecycle<WebGlSurface>) -> R,
    ) -> Result<R, SceneError> {
        let mut scene = self
            .scene
            .try_borrow_mut()
            .map_err(|_| SceneError::Platform("scene is busy".into()))?;
        Ok(f(&mut *scene))
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn schedule(slot: &FrameSlot) -> Result<(), SceneError> {
    let callback = slot.callback.borrow();
    let Some(callback) = callback.as_ref() else {
        return Ok(());
    };
    let window = window().ok_or_else(|| SceneError::Platform("no window".into()))?;
    let handle = window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(platform_error)?;
    slot.pending.set(Some(handle));
    Ok(())
}
