use web_sys::Element;

use super::config_from_element;
use super::frame::{FrameLoop, ViewportSource};
use super::render::WebGlSurface;
use crate::color::Color;
use crate::error::SceneError;
use crate::graph::{Geometry, Material, Node};
use crate::lifecycle::SceneLifecycle;

const PALETTE: [u32; 5] = [0x1a357a, 0xa40e00, 0xde661a, 0xf6d83b, 0x229786];

/// Concentric rings drifting around the origin.
pub fn mount_rings(mount: Element) -> Result<FrameLoop, SceneError> {
    let config = config_from_element(&mount)?;
    let source = ViewportSource::detect(&mount);
    let viewport = source.measure().ok_or(SceneError::InvalidViewport {
        width: 0.0,
        height: 0.0,
    })?;
    let mut scene = SceneLifecycle::mount(&mount, viewport, config)?;

    let mut rings = Node::group();
    for (i, &hex) in PALETTE.iter().enumerate() {
        let radius = 40.0 * (i + 1) as f32;
        let material = Material::new(Color::from_hex(hex)).with_opacity(0.85);
        rings.add(Node::line(Geometry::circle(radius, 128), material));
    }
    scene.add(rings)?;

    let mut frames = FrameLoop::new(scene, source);
    frames.start(Some(Box::new(drift)))?;
    log::info!("rings demo running");
    Ok(frames)
}

fn drift(scene: &mut SceneLifecycle<WebGlSurface>, timestamp: f64) {
    let seconds = (timestamp / 1000.0) as f32;
    let Some(rings) = scene.graph_mut().children_mut().first_mut() else {
        return;
    };
    for (i, ring) in rings.children_mut().iter_mut().enumerate() {
        let phase = seconds + i as f32 * 0.6;
        ring.set_position(12.0 * phase.cos(), 12.0 * phase.sin(), 0.0);
    }
}
