mod common;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use rotorscope::build::{Build, Category, Component};
use rotorscope::engine::BuildViewer;

use common::{cube_asset, headless_viewer, load_failure, GatedLoader};

const MODELS: [Option<&str>; 4] = [None, None, Some("motor.glb"), Some("frame.obj")];

fn random_build(rng: &mut StdRng) -> Build {
    let mut ids: Vec<usize> = (0..8).collect();
    ids.shuffle(rng);
    let count = rng.random_range(0..=8);

    let components = ids[..count]
        .iter()
        .map(|i| {
            let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
            let mut component = Component::new(format!("c{i}"), category)
                .with_visible(rng.random_bool(0.8))
                .with_opacity(rng.random_range(0.2..=1.0));
            if let Some(model) = MODELS[rng.random_range(0..MODELS.len())] {
                component = component.with_model_ref(model);
            }
            component
        })
        .collect();
    Build::new(components)
}

/// Settle every pending load with a random outcome and apply the results
fn quiesce(viewer: &mut BuildViewer, loader: &GatedLoader, rng: &mut StdRng) {
    while !loader.pending().is_empty() {
        let index = rng.random_range(0..loader.pending().len());
        let reference = loader.pending()[index].clone();
        let result = if rng.random_bool(0.6) { Ok(cube_asset()) } else { load_failure(&reference) };
        loader.complete_at(index, result);
    }
    viewer.tick(Duration::from_millis(16));
    assert!(viewer.registry().is_quiescent());
}

fn assert_single_node_per_component(viewer: &BuildViewer, build: &Build) {
    let stats = viewer.stats();
    assert_eq!(stats.entries, build.components.len());
    assert_eq!(stats.resources.tracked_sets, stats.entries);
    for component in &build.components {
        let node = viewer.registry().node(&component.id).unwrap();
        assert_eq!(node.visible, component.visible);
        assert!(!node.is_pending());
    }
    let rendered = viewer.registry().rendered_nodes().count();
    assert_eq!(rendered, build.components.iter().filter(|c| c.visible).count());
}

#[test]
fn random_syncs_never_leak() {
    let mut rng = StdRng::seed_from_u64(7);
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());

    for _ in 0..200 {
        let build = random_build(&mut rng);
        viewer.set_build(build.clone()).unwrap();

        // Leave some loads in flight across the next sync
        if rng.random_bool(0.7) {
            quiesce(&mut viewer, &loader, &mut rng);
            assert_single_node_per_component(&viewer, &build);
        }

        if rng.random_bool(0.1) {
            viewer.teardown();
            quiesce(&mut viewer, &loader, &mut rng);
            assert_eq!(viewer.stats().entries, 0);
            assert_eq!(viewer.stats().resources.tracked_sets, 0);
            assert_eq!(viewer.stats().resources.live_handles, 0);
        }
    }

    viewer.teardown();
    let resources = viewer.stats().resources;
    assert_eq!(resources.tracked_sets, 0);
    assert_eq!(resources.total_tracked, resources.total_released);
}

#[test]
fn teardown_with_loads_in_flight() {
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());
    let build = Build::new(vec![
        Component::new("frame", Category::Frame).with_model_ref("frame.glb"),
        Component::new("m1", Category::Motor).with_model_ref("motor.glb"),
        Component::new("cam", Category::Camera),
    ]);
    viewer.set_build(build).unwrap();
    assert_eq!(viewer.stats().loader.in_flight, 2);

    viewer.teardown();
    let stats = viewer.stats();
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.resources.tracked_sets, 0);
    assert_eq!(stats.loader.cancelled, 2);

    // Late arrivals have nowhere to go
    assert!(!loader.complete("frame.glb", Ok(cube_asset())));
    let report = viewer.tick(Duration::from_millis(16));
    assert!(report.loads.is_empty());
    assert_eq!(viewer.stats().resources.tracked_sets, 0);
}

#[test]
fn placeholder_geometry_ignores_failed_model() {
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());
    let build = Build::new(vec![
        Component::new("a", Category::Battery),
        Component::new("b", Category::Battery).with_model_ref("pack.glb"),
    ]);
    viewer.set_build(build).unwrap();
    loader.complete("pack.glb", load_failure("pack.glb"));
    viewer.tick(Duration::from_millis(16));

    let registry = viewer.registry();
    let a = registry.node("a").unwrap();
    let b = registry.node("b").unwrap();
    assert_eq!(a.placeholder_shape(), b.placeholder_shape());
    assert_eq!(a.meshes[0].geometry, b.meshes[0].geometry);
}
