mod common;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use rotorscope::build::{Build, Category, Component};
use rotorscope::gfx::geometry::PlaceholderShape;
use rotorscope::gfx::scene::LoadEvent;

use common::{cube_asset, headless_viewer, load_failure, GatedLoader};

fn single(model_ref: &str) -> Build {
    Build::new(vec![Component::new("c1", Category::Frame).with_model_ref(model_ref)])
}

#[test]
fn only_latest_model_assignment_is_observable() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..64 {
        let loader = GatedLoader::new();
        let mut viewer = headless_viewer().with_loader(loader.clone());
        viewer.set_build(single("a.glb")).unwrap();
        viewer.assign_model("c1", Some("b.glb".into())).unwrap();
        assert_eq!(loader.requests(), vec!["a.glb", "b.glb"]);

        let a_succeeds = rng.random_bool(0.5);
        let b_succeeds = rng.random_bool(0.5);
        let mut order = vec!["a.glb", "b.glb"];
        order.shuffle(&mut rng);

        let mut events = Vec::new();
        for reference in order {
            let ok = if reference == "a.glb" { a_succeeds } else { b_succeeds };
            let result = if ok { Ok(cube_asset()) } else { load_failure(reference) };
            assert!(loader.complete(reference, result));
            if rng.random_bool(0.5) {
                events.extend(viewer.tick(Duration::from_millis(16)).loads);
            }
        }
        events.extend(viewer.tick(Duration::from_millis(16)).loads);

        let node = viewer.registry().node("c1").unwrap();
        if b_succeeds {
            assert_eq!(node.asset_reference(), Some("b.glb"), "round {round}");
        } else {
            assert_eq!(node.placeholder_shape(), Some(PlaceholderShape::Plate), "round {round}");
        }
        assert!(events.iter().any(|e| matches!(
            e,
            LoadEvent::Stale { reference, .. } if reference == "a.glb"
        )));
        assert!(!events.iter().any(|e| matches!(
            e,
            LoadEvent::Ready { reference, .. } | LoadEvent::Fallback { reference, .. } if reference == "a.glb"
        )));

        let stats = viewer.stats();
        assert_eq!(stats.resources.tracked_sets, stats.entries);
        assert_eq!(stats.loader.stale, 1);
    }
}

#[test]
fn removed_component_ignores_its_late_load() {
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());
    viewer.set_build(single("frame.glb")).unwrap();
    viewer.set_build(Build::default()).unwrap();

    loader.complete("frame.glb", Ok(cube_asset()));
    let report = viewer.tick(Duration::from_millis(16));

    assert!(matches!(report.loads[..], [LoadEvent::Stale { .. }]));
    assert_eq!(viewer.stats().entries, 0);
    assert_eq!(viewer.stats().resources.tracked_sets, 0);
}

#[test]
fn clearing_model_ref_wins_over_pending_load() {
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());
    viewer.set_build(single("a.glb")).unwrap();
    viewer.assign_model("c1", None).unwrap();
    assert!(viewer.registry().entry("c1").unwrap().pending.is_none());

    loader.complete("a.glb", Ok(cube_asset()));
    viewer.tick(Duration::from_millis(16));
    assert!(viewer.registry().node("c1").unwrap().is_placeholder());
}

#[test]
fn host_resupplying_snapshot_is_a_no_op() {
    let snapshots = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = snapshots.clone();
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer()
        .with_loader(loader.clone())
        .on_build_update(move |build| sink.borrow_mut().push(build.clone()));
    viewer.set_build(single("a.glb")).unwrap();
    viewer.assign_model("c1", Some("b.glb".into())).unwrap();

    let snapshot = snapshots.borrow().last().cloned().unwrap();
    let report = viewer.set_build(snapshot).unwrap();
    assert!(!report.changed());
    assert_eq!(loader.requests().len(), 2);
    assert_eq!(snapshots.borrow().len(), 1);
}
