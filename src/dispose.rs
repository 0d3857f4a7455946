//! Post-order release of scene graph resources.
//!
//! Children are detached from their parent and disposed before the parent's
//! own geometry and material are handed to the releaser. Empty slots are
//! skipped, so disposing a partially disposed tree is a no-op for the parts
//! already released.

use crate::graph::{Geometry, Material, Node, SceneGraph};

/// Receiver of resources taken out of the graph.
pub trait ReleaseResources {
    fn release_geometry(&mut self, geometry: Geometry);
    fn release_material(&mut self, material: Material);
}

pub fn dispose_node<R: ReleaseResources + ?Sized>(node: &mut Node, releaser: &mut R) {
    for mut child in std::mem::take(node.children_mut()) {
        dispose_node(&mut child, releaser);
    }

    if let Some(drawable) = node.kind_mut().drawable_mut() {
        if let Some(geometry) = drawable.geometry.take() {
            log::trace!("releasing geometry {:?}", geometry.id());
            releaser.release_geometry(geometry);
        }
        if let Some(material) = drawable.material.take() {
            log::trace!("releasing material {:?}", material.id());
            releaser.release_material(material);
        }
    }
}

/// Disposes every node and leaves the graph empty.
pub fn dispose_graph<R: ReleaseResources + ?Sized>(graph: &mut SceneGraph, releaser: &mut R) {
    for mut node in std::mem::take(graph.children_mut()) {
        dispose_node(&mut node, releaser);
    }
}
