mod common;

use approx::assert_relative_eq;
use common::{square, viewport, white, Event, RecordingSurface};
use scene_wasm::{Color, ConfigError, Node, SceneConfig, SceneError, SceneLifecycle};

fn scene(width: f64, height: f64) -> SceneLifecycle<RecordingSurface> {
    SceneLifecycle::new(
        RecordingSurface::default(),
        viewport(width, height),
        SceneConfig::default(),
    )
    .unwrap()
}

#[test]
fn construct_sizes_surface_and_sets_background() {
    let scene = scene(800.0, 600.0);
    assert_eq!(
        scene.surface().events,
        vec![
            Event::Resize(viewport(800.0, 600.0)),
            Event::Background(Color::from_hex(0x000011))
        ]
    );
    assert!(!scene.is_disposed());
    assert!(scene.graph().is_empty());
}

#[test]
fn construct_rejects_invalid_config() {
    let config = SceneConfig::default().with_clip_distances(10.0, 5.0);
    let err = SceneLifecycle::new(RecordingSurface::default(), viewport(10.0, 10.0), config)
        .err()
        .unwrap();
    assert_eq!(
        err,
        SceneError::Config(ConfigError::ClipPlanes {
            near: 10.0,
            far: 5.0
        })
    );
}

#[test]
fn resize_then_render_then_dispose() {
    let mut scene = scene(800.0, 600.0);
    let initial = scene.camera().planes();

    scene.resize_to(400.0, 300.0).unwrap();
    let resized = scene.camera().planes();
    assert_relative_eq!(resized.left, initial.left * 0.5);
    assert_relative_eq!(resized.right, initial.right * 0.5);
    assert_relative_eq!(resized.top, initial.top * 0.5);
    assert_relative_eq!(resized.bottom, initial.bottom * 0.5);
    assert_eq!(scene.viewport(), viewport(400.0, 300.0));

    scene.add(Node::mesh(square(), white())).unwrap();
    scene.render().unwrap();
    scene.render().unwrap();
    assert_eq!(scene.surface().draws(), 2);

    scene.dispose();
    assert_eq!(scene.graph().len(), 0);
    assert!(scene.is_disposed());
}

#[test]
fn draws_use_the_resized_planes() {
    let mut scene = scene(800.0, 600.0);
    scene.resize_to(1000.0, 500.0).unwrap();
    scene.render().unwrap();

    let Some(Event::Draw { planes, .. }) = scene.surface().events.last().cloned() else {
        panic!("expected a draw");
    };
    assert_eq!(planes.right, 500.0);
    assert_eq!(planes.top, 250.0);
}

#[test]
fn resize_updates_camera_before_surface() {
    let mut scene = scene(800.0, 600.0);
    scene.resize_to(640.0, 480.0).unwrap();

    assert!(!scene.camera().is_projection_dirty());
    assert_eq!(
        scene.surface().events.last(),
        Some(&Event::Resize(viewport(640.0, 480.0)))
    );
}

#[test]
fn invalid_resize_changes_nothing() {
    let mut scene = scene(800.0, 600.0);
    let planes = scene.camera().planes();
    let events = scene.surface().events.len();

    for (w, h) in [(0.0, 600.0), (800.0, -1.0), (f64::NAN, 600.0), (f64::INFINITY, 1.0)] {
        let err = scene.resize_to(w, h).unwrap_err();
        assert!(matches!(err, SceneError::InvalidViewport { .. }));
    }
    assert_eq!(scene.camera().planes(), planes);
    assert_eq!(scene.surface().events.len(), events);
    assert_eq!(scene.viewport(), viewport(800.0, 600.0));
}

#[test]
fn render_recomputes_a_dirty_projection() {
    let mut scene = scene(800.0, 600.0);
    let v = viewport(200.0, 100.0);
    scene.camera_mut().fit_viewport(&v);
    assert!(scene.camera().is_projection_dirty());

    // RecordingSurface::draw asserts the projection is clean.
    scene.render().unwrap();
    assert!(!scene.camera().is_projection_dirty());
}

#[test]
fn render_after_dispose_is_refused() {
    let mut scene = scene(800.0, 600.0);
    scene.render().unwrap();
    scene.dispose();

    assert_eq!(scene.render(), Err(SceneError::Disposed));
    assert_eq!(scene.surface().draws(), 1);
}

#[test]
fn operations_after_dispose_are_refused() {
    let mut scene = scene(800.0, 600.0);
    scene.dispose();

    assert_eq!(scene.resize_to(10.0, 10.0), Err(SceneError::Disposed));
    assert_eq!(scene.add(Node::group()), Err(SceneError::Disposed));
    assert_eq!(scene.set_background(Color::WHITE), Err(SceneError::Disposed));
    assert!(scene.graph().is_empty());
}

#[test]
fn set_background_reaches_surface() {
    let mut scene = scene(800.0, 600.0);
    let dark = Color::from_hex(0x09090b);
    scene.set_background(dark).unwrap();

    assert_eq!(scene.background(), dark);
    assert_eq!(scene.surface().events.last(), Some(&Event::Background(dark)));
}

#[test]
fn dispose_twice_detaches_once() {
    let mut scene = scene(800.0, 600.0);
    scene.add(Node::line(square(), white())).unwrap();

    scene.dispose();
    assert!(scene.graph().is_empty());
    scene.dispose();
    assert!(scene.graph().is_empty());

    assert_eq!(scene.surface().detaches(), 1);
    assert_eq!(scene.surface().releases().len(), 2);
}

#[test]
fn removing_a_child_releases_it_and_keeps_the_surface() {
    let mut scene = scene(800.0, 600.0);
    scene.add(Node::mesh(square(), white())).unwrap();
    scene.add(Node::line(square(), white())).unwrap();

    assert!(scene.remove(1));
    assert_eq!(scene.graph().len(), 1);
    assert_eq!(scene.surface().releases().len(), 2);
    assert_eq!(scene.surface().detaches(), 0);
    scene.render().unwrap();

    assert!(!scene.remove(1));
    assert_eq!(scene.surface().releases().len(), 2);

    // Nothing taken out of the graph escapes release.
    scene.dispose();
    assert_eq!(scene.surface().releases().len(), 4);
    assert_eq!(scene.surface().detaches(), 1);
}

#[test]
fn clear_releases_everything_and_stays_usable() {
    let mut scene = scene(800.0, 600.0);
    scene
        .add(Node::group().with_child(Node::points(square(), white())))
        .unwrap();
    scene.add(Node::mesh(square(), white())).unwrap();

    scene.clear();
    assert!(scene.graph().is_empty());
    assert_eq!(scene.surface().releases().len(), 4);
    assert!(!scene.is_disposed());

    scene.add(Node::line(square(), white())).unwrap();
    scene.render().unwrap();
    assert_eq!(scene.surface().draws(), 1);

    scene.dispose();
    assert_eq!(scene.surface().releases().len(), 6);
}
