mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cgmath::{InnerSpace, Vector3};

use rotorscope::animation::SequencerEvent;
use rotorscope::build::{Build, CameraConfig, Category, Component};
use rotorscope::gfx::camera::{ViewMode, ViewState};
use rotorscope::{BuildViewer, EngineConfig, RenderContext};

use common::quad_build;

fn messy_build() -> Build {
    Build::new(vec![
        Component::new("frame", Category::Frame),
        Component::new("m1", Category::Motor).with_opacity(3.0),
        Component::new("frame", Category::Battery),
    ])
}

#[test]
fn lenient_build_is_kept_in_corrected_form() {
    rotorscope::init_logging();
    let updates = Rc::new(RefCell::new(Vec::<Build>::new()));
    let sink = updates.clone();
    let mut viewer = BuildViewer::new(RenderContext::headless(800, 600), EngineConfig::default())
        .on_build_update(move |build| sink.borrow_mut().push(build.clone()));

    let report = viewer.set_build(messy_build()).unwrap();
    assert_eq!(report.issues.len(), 2);
    assert_eq!(viewer.build().components.len(), 2);
    assert_eq!(viewer.build().component("frame").unwrap().category, Category::Frame);

    let selected = viewer.select_component(Some("m1")).unwrap().cloned().unwrap();
    assert_eq!(selected.opacity, 1.0);

    viewer.toggle_visibility("m1").unwrap();
    let snapshot = updates.borrow()[0].clone();
    assert_eq!(snapshot.components.len(), 2);
    assert_eq!(snapshot.component("m1").unwrap().opacity, 1.0);
    assert!(snapshot.validate().is_ok());
}

#[test]
fn dropped_duplicate_never_replays_its_step() {
    rotorscope::init_logging();
    let mut viewer = BuildViewer::new(RenderContext::headless(800, 600), EngineConfig::default());
    viewer.set_build(messy_build()).unwrap();

    let started = viewer.play_assembly();
    assert!(matches!(started[..], [SequencerEvent::Started { steps: 2, .. }]));

    let mut frame_done = false;
    while viewer.is_assembling() {
        viewer.tick(Duration::from_millis(16));
        let opacity = viewer.registry().reveal("frame").unwrap().opacity;
        if frame_done {
            assert_eq!(opacity, 1.0, "frame hidden again after its step completed");
        }
        frame_done |= opacity == 1.0;
    }
    assert!(frame_done);
    assert_eq!(viewer.assembly_progress(), 100.0);
}

#[test]
fn build_without_camera_uses_configured_perspective() {
    rotorscope::init_logging();
    let mut config = EngineConfig::default().with_view_distance(20.0);
    config.default_fov = 35.0;
    let mut viewer = BuildViewer::new(RenderContext::headless(800, 600), config);

    viewer.set_build(quad_build()).unwrap();
    let view = viewer.viewpoint();
    assert_eq!(viewer.view_state(), ViewState::Named(ViewMode::Perspective));
    assert!((view.position - Vector3::new(10.0, 10.0, 10.0)).magnitude() < 1e-4);
    assert!((view.fov.0 - 35.0).abs() < 1e-3);

    viewer
        .set_build(quad_build().with_camera(CameraConfig {
            position: [2.0, 3.0, 4.0],
            target: [0.0; 3],
            fov: 60.0,
        }))
        .unwrap();
    assert!((viewer.viewpoint().position - Vector3::new(2.0, 3.0, 4.0)).magnitude() < 1e-4);

    // Dropping the camera block returns to the configured pose
    viewer.set_build(quad_build()).unwrap();
    let view = viewer.viewpoint();
    assert!((view.position - Vector3::new(10.0, 10.0, 10.0)).magnitude() < 1e-4);
    assert!((view.fov.0 - 35.0).abs() < 1e-3);
}
