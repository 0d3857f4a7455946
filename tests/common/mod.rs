#![allow(dead_code)]

use scene_wasm::{
    ClipPlanes, Color, Geometry, GeometryId, Material, MaterialId, OrthographicCamera,
    ReleaseResources, RenderSurface, SceneGraph, Viewport,
};

/// Everything a surface was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Resize(Viewport),
    Background(Color),
    Draw { planes: ClipPlanes, nodes: usize },
    ReleaseGeometry(GeometryId),
    ReleaseMaterial(MaterialId),
    Detach,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<Event>,
}

impl RecordingSurface {
    pub fn draws(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Draw { .. })).count()
    }

    pub fn detaches(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Detach)).count()
    }

    pub fn releases(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::ReleaseGeometry(_) | Event::ReleaseMaterial(_)))
            .cloned()
            .collect()
    }
}

impl ReleaseResources for RecordingSurface {
    fn release_geometry(&mut self, geometry: Geometry) {
        self.events.push(Event::ReleaseGeometry(geometry.id()));
    }

    fn release_material(&mut self, material: Material) {
        self.events.push(Event::ReleaseMaterial(material.id()));
    }
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.events.push(Event::Resize(viewport));
    }

    fn set_background(&mut self, color: Color) {
        self.events.push(Event::Background(color));
    }

    fn draw(&mut self, graph: &SceneGraph, camera: &OrthographicCamera) {
        assert!(!camera.is_projection_dirty(), "drew with a stale projection");
        self.events.push(Event::Draw {
            planes: camera.planes(),
            nodes: graph.node_count(),
        });
    }

    fn detach(&mut self) {
        self.events.push(Event::Detach);
    }
}

pub fn viewport(width: f64, height: f64) -> Viewport {
    Viewport::new(width, height).unwrap()
}

pub fn square() -> Geometry {
    Geometry::rectangle(10.0, 10.0)
}

pub fn white() -> Material {
    Material::new(Color::WHITE)
}
