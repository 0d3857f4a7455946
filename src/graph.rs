//! Scene graph: a tree of drawable nodes and the resources they own.
//!
//! Resources are held as `Option`s so that disposal can move them out and
//! leave `None` behind; a `None` slot is simply skipped when drawing or
//! disposing again.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering};

use nalgebra::Vector3;

use crate::color::Color;
use crate::error::SceneError;

static NEXT_GEOMETRY: AtomicU32 = AtomicU32::new(1);
static NEXT_MATERIAL: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

/// Vertex positions as flat `xyz` triplets.
#[derive(Debug, PartialEq)]
pub struct Geometry {
    id: GeometryId,
    positions: Vec<f32>,
    version: u32,
}

impl Geometry {
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, SceneError> {
        if positions.len() % 3 != 0 {
            return Err(SceneError::InvalidGeometry {
                len: positions.len(),
            });
        }
        Ok(Self {
            id: GeometryId(NEXT_GEOMETRY.fetch_add(1, Ordering::Relaxed)),
            positions,
            version: 0,
        })
    }

    /// Polyline through `points` on the z = 0 plane.
    pub fn line(points: &[(f32, f32)]) -> Self {
        let positions = points.iter().flat_map(|&(x, y)| [x, y, 0.0]).collect();
        Self::from_trusted(positions)
    }

    /// Closed line strip approximating a circle centred on the origin.
    pub fn circle(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let positions = (0..=segments)
            .flat_map(|i| {
                let theta = TAU * i as f32 / segments as f32;
                [radius * theta.cos(), radius * theta.sin(), 0.0]
            })
            .collect();
        Self::from_trusted(positions)
    }

    /// Axis-aligned rectangle centred on the origin, as two triangles.
    pub fn rectangle(width: f32, height: f32) -> Self {
        let (x, y) = (width / 2.0, height / 2.0);
        #[rustfmt::skip]
        let positions = vec![
            -x, -y, 0.0,   x, -y, 0.0,   x,  y, 0.0,
            -x, -y, 0.0,   x,  y, 0.0,  -x,  y, 0.0,
        ];
        Self::from_trusted(positions)
    }

    fn from_trusted(positions: Vec<f32>) -> Self {
        Self {
            id: GeometryId(NEXT_GEOMETRY.fetch_add(1, Ordering::Relaxed)),
            positions,
            version: 0,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Bumped by every [`Geometry::set_positions`]; backends re-upload on change.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_positions(&mut self, positions: Vec<f32>) -> Result<(), SceneError> {
        if positions.len() % 3 != 0 {
            return Err(SceneError::InvalidGeometry {
                len: positions.len(),
            });
        }
        self.positions = positions;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct Material {
    id: MaterialId,
    pub color: Color,
    opacity: f32,
    pub point_size: f32,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL.fetch_add(1, Ordering::Relaxed)),
            color,
            opacity: 1.0,
            point_size: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }
}

/// Geometry and material slots of a drawable node.
///
/// A node draws with exactly one material; meshes split into per-group
/// materials are not modelled.
#[derive(Debug, Default, PartialEq)]
pub struct Drawable {
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
}

impl Drawable {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry: Some(geometry),
            material: Some(material),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NodeKind {
    /// Filled triangles.
    Mesh(Drawable),
    /// Connected line strip.
    Line(Drawable),
    Points(Drawable),
    /// Holds children only.
    Group,
}

impl NodeKind {
    pub fn drawable(&self) -> Option<&Drawable> {
        match self {
            NodeKind::Mesh(d) | NodeKind::Line(d) | NodeKind::Points(d) => Some(d),
            NodeKind::Group => None,
        }
    }

    pub fn drawable_mut(&mut self) -> Option<&mut Drawable> {
        match self {
            NodeKind::Mesh(d) | NodeKind::Line(d) | NodeKind::Points(d) => Some(d),
            NodeKind::Group => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Node {
    kind: NodeKind,
    position: Vector3<f32>,
    visible: bool,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Vector3::zeros(),
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self::new(NodeKind::Mesh(Drawable::new(geometry, material)))
    }

    pub fn line(geometry: Geometry, material: Material) -> Self {
        Self::new(NodeKind::Line(Drawable::new(geometry, material)))
    }

    pub fn points(geometry: Geometry, material: Material) -> Self {
        Self::new(NodeKind::Points(Drawable::new(geometry, material)))
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn add(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Translation relative to the parent.
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// This node plus all of its descendants.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

/// Root container of a scene.
#[derive(Debug, Default, PartialEq)]
pub struct SceneGraph {
    children: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Number of direct children of the root.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every node in the tree, excluding the root itself.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(Node::node_count).sum()
    }
}
