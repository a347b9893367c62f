mod common;

use std::time::Duration;

use rotorscope::animation::SequencerEvent;
use rotorscope::build::{AnimationConfig, AnimationStep, RevealStyle};
use rotorscope::gfx::geometry::PlaceholderShape;

use common::{headless_viewer, quad_build, GatedLoader};

fn five_step_build() -> rotorscope::Build {
    let build = quad_build();
    let steps = build
        .components
        .iter()
        .map(|c| AnimationStep::new(c.id.clone(), Duration::ZERO, Duration::from_millis(200)))
        .collect();
    build.with_animation(AnimationConfig::sequential(steps))
}

#[test]
fn assembly_reports_progress_in_fifths() {
    let loader = GatedLoader::new();
    let mut viewer = headless_viewer().with_loader(loader.clone());
    viewer.set_build(five_step_build()).unwrap();

    viewer.play_assembly();
    let mut progress = vec![viewer.assembly_progress()];
    let mut frames = 0;
    while viewer.is_assembling() {
        let report = viewer.tick(Duration::from_millis(16));
        progress.extend(report.animation.iter().filter_map(|event| match event {
            SequencerEvent::StepCompleted { progress, .. } => Some(*progress),
            _ => None,
        }));
        frames += 1;
        assert!(frames < 1000, "assembly never finished");
    }

    assert_eq!(progress, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

    let stats = viewer.stats();
    assert_eq!(stats.entries, 5);
    assert_eq!(stats.rendered, 5);
    assert_eq!(stats.placeholders, 5);
    assert_eq!(stats.loader.attempts, 0);
    assert_eq!(stats.loader.failures, 0);
    assert!(loader.requests().is_empty());

    let shapes: Vec<_> = viewer
        .registry()
        .entries()
        .map(|e| e.node.placeholder_shape().unwrap())
        .collect();
    assert_eq!(shapes.iter().filter(|s| **s == PlaceholderShape::Plate).count(), 1);
    assert_eq!(shapes.iter().filter(|s| **s == PlaceholderShape::Cylinder).count(), 4);
    assert!(viewer.registry().entries().all(|e| e.node.reveal.is_rest()));
}

#[test]
fn progress_never_decreases_with_uneven_frames() {
    let mut viewer = headless_viewer();
    let build = quad_build();
    let steps = build
        .components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            AnimationStep::new(c.id.clone(), Duration::from_millis(30 * i as u64), Duration::from_millis(120))
                .with_reveal_style(RevealStyle::SlideIn)
        })
        .collect();
    viewer.set_build(build).unwrap();
    viewer.play_steps(steps);

    let mut last = viewer.assembly_progress();
    for frame in 0..200u64 {
        let report = viewer.tick(Duration::from_millis(1 + frame % 37));
        assert!(report.progress >= last);
        last = report.progress;
    }
    assert_eq!(last, 100.0);
}

#[test]
fn stopping_mid_run_leaves_every_component_visible() {
    for stop_after in [0u64, 50, 150, 420, 900] {
        let mut viewer = headless_viewer();
        viewer.set_build(five_step_build()).unwrap();
        viewer.play_assembly();

        let mut elapsed = 0;
        while elapsed < stop_after {
            viewer.tick(Duration::from_millis(10));
            elapsed += 10;
        }
        let stopped = viewer.stop_assembly();
        assert!(matches!(stopped, Some(SequencerEvent::Stopped { .. })));

        assert_eq!(viewer.stats().rendered, 5, "stopped after {stop_after}ms");
        assert!(viewer
            .registry()
            .entries()
            .all(|e| e.node.reveal.is_rest() && e.node.effective_opacity() == 1.0));

        // Nothing keeps running after a stop
        let report = viewer.tick(Duration::from_secs(10));
        assert!(report.animation.is_empty());
    }
}

#[test]
fn replay_while_running_restarts() {
    let mut viewer = headless_viewer();
    viewer.set_build(five_step_build()).unwrap();
    viewer.play_assembly();
    viewer.tick(Duration::from_millis(450));
    assert_eq!(viewer.assembly_progress(), 40.0);

    let events = viewer.play_assembly();
    assert!(matches!(events[..], [SequencerEvent::Started { steps: 5, .. }]));
    assert_eq!(viewer.assembly_progress(), 0.0);
    assert_eq!(viewer.stats().rendered, 0);
}

#[test]
fn default_sequence_covers_every_component() {
    let mut viewer = headless_viewer();
    viewer.set_build(quad_build()).unwrap();
    let events = viewer.play_assembly();
    assert!(matches!(events[..], [SequencerEvent::Started { steps: 5, .. }]));

    viewer.tick(Duration::from_secs(60));
    assert!(!viewer.is_assembling());
    assert_eq!(viewer.assembly_progress(), 100.0);
}
