//! # Assembly Sequencer
//!
//! Reveals components one step at a time. Steps run strictly in order: a
//! step waits out its `delay` once the previous step has finished, then
//! spends `duration` moving its target from the style's hidden start state
//! to rest. The whole queue is advanced by [`AssemblySequencer::tick`], so
//! stopping is just dropping back to idle; there is nothing left scheduled
//! that could touch the scene afterwards.

use std::time::Duration;

use crate::build::AnimationStep;
use crate::gfx::scene::node::Reveal;
use crate::gfx::scene::registry::SceneRegistry;

use super::reveal::RevealParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    Started {
        run: u64,
        steps: usize,
    },
    StepStarted {
        run: u64,
        index: usize,
        component_id: String,
    },
    StepCompleted {
        run: u64,
        index: usize,
        component_id: String,
        /// Percent of steps completed, including this one
        progress: f32,
    },
    Finished {
        run: u64,
    },
    Stopped {
        run: u64,
        progress: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Delay,
    Reveal,
}

#[derive(Debug, Default)]
pub struct AssemblySequencer {
    run: u64,
    state: SequencerState,
    steps: Vec<AnimationStep>,
    current: usize,
    phase: Option<Phase>,
    phase_elapsed: Duration,
    completed: usize,
    params: RevealParams,
}

impl AssemblySequencer {
    pub fn new(params: RevealParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn set_params(&mut self, params: RevealParams) {
        self.params = params;
    }

    /// Start a run from step 0, restarting any run in progress. Every step
    /// target is put into its hidden start state.
    pub fn play(&mut self, steps: Vec<AnimationStep>, registry: &mut SceneRegistry) -> Vec<SequencerEvent> {
        if self.state == SequencerState::Running {
            log::debug!("restarting assembly run {}", self.run);
        }

        self.run += 1;
        self.steps = steps;
        self.current = 0;
        self.completed = 0;
        self.phase_elapsed = Duration::ZERO;

        for step in &self.steps {
            registry.set_reveal(&step.component_id, self.params.start(step.reveal_style));
        }

        let mut events = vec![SequencerEvent::Started {
            run: self.run,
            steps: self.steps.len(),
        }];
        if self.steps.is_empty() {
            self.finish(&mut events);
        } else {
            self.state = SequencerState::Running;
            self.phase = Some(Phase::Delay);
            log::info!("assembly run {} started with {} steps", self.run, self.steps.len());
        }
        events
    }

    /// Advance the run by `dt`. Does nothing while idle.
    pub fn tick(&mut self, dt: Duration, registry: &mut SceneRegistry) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        let mut budget = dt;

        while self.state == SequencerState::Running {
            let (Some(phase), Some(step)) = (self.phase, self.steps.get(self.current)) else {
                self.finish(&mut events);
                break;
            };

            match phase {
                Phase::Delay => {
                    let remaining = step.delay.saturating_sub(self.phase_elapsed);
                    if budget < remaining {
                        self.phase_elapsed += budget;
                        break;
                    }
                    budget -= remaining;

                    let component_id = step.component_id.clone();
                    let start = self.params.start(step.reveal_style);
                    events.push(SequencerEvent::StepStarted {
                        run: self.run,
                        index: self.current,
                        component_id: component_id.clone(),
                    });
                    self.phase = Some(Phase::Reveal);
                    self.phase_elapsed = Duration::ZERO;

                    if !registry.set_reveal(&component_id, start) {
                        log::debug!("assembly step {} targets unknown `{component_id}`", self.current);
                        self.complete_step(registry, &mut events);
                    }
                }
                Phase::Reveal => {
                    let remaining = step.duration.saturating_sub(self.phase_elapsed);
                    if budget < remaining {
                        self.phase_elapsed += budget;
                        let t = self.phase_elapsed.as_secs_f32() / step.duration.as_secs_f32();
                        let reveal = self.params.reveal_at(step.reveal_style, t);
                        registry.set_reveal(&step.component_id, reveal);
                        break;
                    }
                    budget -= remaining;
                    self.complete_step(registry, &mut events);
                }
            }
        }

        events
    }

    fn complete_step(&mut self, registry: &mut SceneRegistry, events: &mut Vec<SequencerEvent>) {
        let Some(step) = self.steps.get(self.current) else {
            return;
        };
        registry.set_reveal(&step.component_id, Reveal::REST);
        self.completed += 1;
        events.push(SequencerEvent::StepCompleted {
            run: self.run,
            index: self.current,
            component_id: step.component_id.clone(),
            progress: self.progress(),
        });
        log::debug!("assembly step {} done ({:.0}%)", self.current, self.progress());

        self.current += 1;
        self.phase = Some(Phase::Delay);
        self.phase_elapsed = Duration::ZERO;
        if self.current >= self.steps.len() {
            self.finish(events);
        }
    }

    fn finish(&mut self, events: &mut Vec<SequencerEvent>) {
        self.state = SequencerState::Idle;
        self.phase = None;
        events.push(SequencerEvent::Finished { run: self.run });
        log::info!("assembly run {} finished", self.run);
    }

    /// Drop to idle and put every step target at rest, whatever it reached.
    /// Returns `None` when nothing was running.
    pub fn stop(&mut self, registry: &mut SceneRegistry) -> Option<SequencerEvent> {
        if self.state != SequencerState::Running {
            return None;
        }
        for step in &self.steps {
            registry.set_reveal(&step.component_id, Reveal::REST);
        }
        self.state = SequencerState::Idle;
        self.phase = None;
        log::info!("assembly run {} stopped at {:.0}%", self.run, self.progress());
        Some(SequencerEvent::Stopped {
            run: self.run,
            progress: self.progress(),
        })
    }

    /// `completed / total * 100`; a run with no steps counts as complete
    pub fn progress(&self) -> f32 {
        if self.steps.is_empty() {
            return if self.run == 0 { 0.0 } else { 100.0 };
        }
        self.completed as f32 * 100.0 / self.steps.len() as f32
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    /// Identifier of the latest run; zero before the first `play`
    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// Index of the step being waited on or revealed
    pub fn current_step(&self) -> Option<usize> {
        self.is_running().then_some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Build, Category, Component, RevealStyle};
    use crate::config::EngineConfig;
    use crate::animation::easing::Easing;
    use crate::context::RenderContext;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn scene(ids: &[&str]) -> SceneRegistry {
        let mut registry = SceneRegistry::new(&EngineConfig::default(), None);
        let build = Build::new(ids.iter().map(|id| Component::new(*id, Category::Motor)).collect());
        registry
            .sync(&RenderContext::headless(64, 64), &build)
            .unwrap();
        registry
    }

    fn linear() -> AssemblySequencer {
        AssemblySequencer::new(RevealParams {
            easing: Easing::Linear,
            slide_distance: 1.0,
            rotate_degrees: 90.0,
        })
    }

    fn progress_of(events: &[SequencerEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                SequencerEvent::StepCompleted { progress, .. } => Some(*progress),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_play_hides_targets_until_their_step() {
        let mut registry = scene(&["a", "b"]);
        let mut sequencer = linear();
        sequencer.play(
            vec![
                AnimationStep::new("a", ms(0), ms(100)),
                AnimationStep::new("b", ms(0), ms(100)),
            ],
            &mut registry,
        );

        assert!(sequencer.is_running());
        assert_eq!(registry.reveal("b").unwrap().opacity, 0.0);
        assert_eq!(registry.rendered_nodes().count(), 0);

        sequencer.tick(ms(50), &mut registry);
        assert!((registry.reveal("a").unwrap().opacity - 0.5).abs() < 1e-4);
        assert_eq!(registry.reveal("b").unwrap().opacity, 0.0);
    }

    #[test]
    fn test_delay_counts_from_previous_completion() {
        let mut registry = scene(&["a", "b"]);
        let mut sequencer = linear();
        sequencer.play(
            vec![
                AnimationStep::new("a", ms(0), ms(100)),
                AnimationStep::new("b", ms(100), ms(100)),
            ],
            &mut registry,
        );

        let events = sequencer.tick(ms(150), &mut registry);
        assert_eq!(progress_of(&events), vec![50.0]);
        assert!(!events
            .iter()
            .any(|e| matches!(e, SequencerEvent::StepStarted { index: 1, .. })));

        let events = sequencer.tick(ms(60), &mut registry);
        assert!(events
            .iter()
            .any(|e| matches!(e, SequencerEvent::StepStarted { index: 1, .. })));
        assert!((registry.reveal("b").unwrap().opacity - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_large_tick_completes_everything_in_order() {
        let mut registry = scene(&["a", "b", "c", "d"]);
        let mut sequencer = linear();
        let steps = ["a", "b", "c", "d"]
            .iter()
            .map(|id| AnimationStep::new(*id, ms(10), ms(20)))
            .collect();
        sequencer.play(steps, &mut registry);

        let events = sequencer.tick(Duration::from_secs(5), &mut registry);
        assert_eq!(progress_of(&events), vec![25.0, 50.0, 75.0, 100.0]);
        assert!(matches!(events.last(), Some(SequencerEvent::Finished { .. })));
        assert_eq!(sequencer.state(), SequencerState::Idle);
        assert!(registry.entries().all(|e| e.node.reveal.is_rest()));
    }

    #[test]
    fn test_stop_leaves_everything_at_rest() {
        let mut registry = scene(&["a", "b", "c"]);
        let mut sequencer = linear();
        let steps = ["a", "b", "c"]
            .iter()
            .map(|id| AnimationStep::new(*id, ms(0), ms(100)).with_reveal_style(RevealStyle::ScaleIn))
            .collect();
        sequencer.play(steps, &mut registry);
        sequencer.tick(ms(130), &mut registry);

        let stopped = sequencer.stop(&mut registry);
        assert!(matches!(stopped, Some(SequencerEvent::Stopped { progress, .. }) if progress > 33.0));
        assert_eq!(registry.rendered_nodes().count(), 3);
        assert!(sequencer.tick(ms(500), &mut registry).is_empty());
        assert!(sequencer.stop(&mut registry).is_none());
    }

    #[test]
    fn test_replay_restarts_from_first_step() {
        let mut registry = scene(&["a", "b"]);
        let mut sequencer = linear();
        let steps = vec![
            AnimationStep::new("a", ms(0), ms(100)),
            AnimationStep::new("b", ms(0), ms(100)),
        ];
        sequencer.play(steps.clone(), &mut registry);
        sequencer.tick(ms(150), &mut registry);
        assert_eq!(sequencer.progress(), 50.0);

        sequencer.play(steps, &mut registry);
        assert_eq!(sequencer.run_id(), 2);
        assert_eq!(sequencer.progress(), 0.0);
        assert_eq!(sequencer.current_step(), Some(0));
        assert_eq!(registry.reveal("a").unwrap().opacity, 0.0);
    }

    #[test]
    fn test_missing_target_completes_immediately() {
        let mut registry = scene(&["a"]);
        let mut sequencer = linear();
        sequencer.play(
            vec![
                AnimationStep::new("ghost", ms(0), ms(1000)),
                AnimationStep::new("a", ms(0), ms(100)),
            ],
            &mut registry,
        );
        let events = sequencer.tick(ms(1), &mut registry);
        assert_eq!(progress_of(&events), vec![50.0]);
    }

    #[test]
    fn test_empty_run_finishes_on_play() {
        let mut registry = scene(&[]);
        let mut sequencer = linear();
        assert_eq!(sequencer.progress(), 0.0);
        let events = sequencer.play(Vec::new(), &mut registry);
        assert!(matches!(events.last(), Some(SequencerEvent::Finished { .. })));
        assert_eq!(sequencer.progress(), 100.0);
        assert!(!sequencer.is_running());
    }
}
