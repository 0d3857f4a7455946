use scene_wasm::{Color, Geometry, Material, Node, NodeKind, SceneError, SceneGraph};

#[test]
fn geometry_rejects_partial_vertices() {
    assert_eq!(
        Geometry::from_positions(vec![0.0; 7]).unwrap_err(),
        SceneError::InvalidGeometry { len: 7 }
    );
    assert_eq!(Geometry::from_positions(vec![0.0; 9]).unwrap().vertex_count(), 3);
}

#[test]
fn shape_constructors() {
    let circle = Geometry::circle(10.0, 32);
    assert_eq!(circle.vertex_count(), 33);
    let first = &circle.positions()[..3];
    let last = &circle.positions()[circle.positions().len() - 3..];
    assert!((first[0] - last[0]).abs() < 1e-4 && (first[1] - last[1]).abs() < 1e-4);

    assert_eq!(Geometry::circle(1.0, 0).vertex_count(), 4);
    assert_eq!(Geometry::rectangle(2.0, 4.0).vertex_count(), 6);
    assert_eq!(
        Geometry::line(&[(0.0, 0.0), (1.0, 1.0)]).positions(),
        &[0.0f32, 0.0, 0.0, 1.0, 1.0, 0.0][..]
    );
}

#[test]
fn set_positions_bumps_version() {
    let mut geometry = Geometry::rectangle(1.0, 1.0);
    let id = geometry.id();
    assert_eq!(geometry.version(), 0);

    geometry.set_positions(vec![0.0, 0.0, 0.0]).unwrap();
    assert_eq!(geometry.version(), 1);
    assert_eq!(geometry.id(), id);

    assert!(geometry.set_positions(vec![0.0]).is_err());
    assert_eq!(geometry.version(), 1);
}

#[test]
fn ids_are_unique() {
    let a = Geometry::rectangle(1.0, 1.0);
    let b = Geometry::rectangle(1.0, 1.0);
    assert_ne!(a.id(), b.id());
    assert_ne!(Material::new(Color::WHITE).id(), Material::new(Color::WHITE).id());
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(Material::new(Color::WHITE).with_opacity(2.0).opacity(), 1.0);
    assert_eq!(Material::new(Color::WHITE).with_opacity(-1.0).opacity(), 0.0);
    assert_eq!(Material::new(Color::WHITE).with_opacity(f32::NAN).opacity(), 1.0);
}

#[test]
fn node_counts_and_kinds() {
    let mut graph = SceneGraph::new();
    graph.add(
        Node::group()
            .with_position(1.0, 2.0, 0.0)
            .with_child(Node::line(Geometry::circle(1.0, 8), Material::new(Color::BLACK)))
            .with_child(Node::group().with_child(Node::group())),
    );
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.node_count(), 4);

    let root = &graph.children()[0];
    assert!(matches!(root.kind(), NodeKind::Group));
    assert!(root.kind().drawable().is_none());
    assert!(root.children()[0].kind().drawable().is_some());
    assert_eq!(root.position().x, 1.0);
    assert!(root.is_visible());
}
