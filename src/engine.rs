//! # Build Viewer
//!
//! The engine instance a host embeds. [`BuildViewer`] owns the render
//! context, the scene registry, the view controller and the assembly
//! sequencer, and relays user interaction back to the host through two
//! callbacks:
//!
//! - `on_component_select` fires when the selection changes
//! - `on_build_update` fires once per visibility toggle or model assignment
//!   with the engine's updated copy of the build
//!
//! The host owns the canonical [`Build`]. The viewer keeps a derived copy and
//! never writes to the host's value.
//!
//! ```rust
//! use std::time::Duration;
//! use rotorscope::prelude::*;
//!
//! let mut viewer = BuildViewer::new(RenderContext::headless(800, 600), EngineConfig::default());
//! viewer
//!     .set_build(Build::new(vec![
//!         Component::new("frame", Category::Frame),
//!         Component::new("m1", Category::Motor),
//!     ]))
//!     .unwrap();
//! viewer.play_assembly();
//! while viewer.is_assembling() {
//!     viewer.tick(Duration::from_millis(16));
//! }
//! assert_eq!(viewer.assembly_progress(), 100.0);
//! ```

use std::rc::Rc;
use std::time::Duration;

use crate::animation::{AssemblySequencer, RevealParams, SequencerEvent};
use crate::build::{AnimationStep, Build, Component};
use crate::config::EngineConfig;
use crate::context::RenderContext;
use crate::error::EngineError;
use crate::gfx::assets::{AssetLoader, LoaderStats};
use crate::gfx::camera::{CameraUniform, ViewController, ViewMode, ViewState, Viewpoint};
use crate::gfx::picking::{self, PickResult};
use crate::gfx::resources::tracker::ResourceStats;
use crate::gfx::scene::{LoadEvent, SceneRegistry, SyncReport};

pub type ComponentSelectCallback = Box<dyn FnMut(Option<&Component>)>;
pub type BuildUpdateCallback = Box<dyn FnMut(&Build)>;

/// What happened during one [`BuildViewer::tick`]
#[derive(Debug, Default)]
pub struct FrameReport {
    pub loads: Vec<LoadEvent>,
    pub animation: Vec<SequencerEvent>,
    /// Assembly progress after the tick, in percent
    pub progress: f32,
    pub pending_loads: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStats {
    pub entries: usize,
    pub rendered: usize,
    pub placeholders: usize,
    pub loaded_assets: usize,
    pub triangles: usize,
    pub resources: ResourceStats,
    pub loader: LoaderStats,
    pub view: ViewState,
    pub assembly_progress: f32,
}

pub struct BuildViewer {
    ctx: RenderContext,
    config: EngineConfig,
    build: Build,
    registry: SceneRegistry,
    views: ViewController,
    sequencer: AssemblySequencer,
    on_component_select: Option<ComponentSelectCallback>,
    on_build_update: Option<BuildUpdateCallback>,
    has_build: bool,
}

impl BuildViewer {
    pub fn new(ctx: RenderContext, config: EngineConfig) -> Self {
        let views = ViewController::new(&config, ctx.aspect());
        Self {
            registry: SceneRegistry::new(&config, None),
            sequencer: AssemblySequencer::new(RevealParams::from_config(&config)),
            views,
            ctx,
            config,
            build: Build::default(),
            on_component_select: None,
            on_build_update: None,
            has_build: false,
        }
    }

    /// Install the host's asset loader. Without one every `modelRef` falls
    /// back to its placeholder.
    pub fn with_loader(mut self, loader: Rc<dyn AssetLoader>) -> Self {
        self.registry.set_loader(Some(loader));
        self
    }

    pub fn on_component_select(mut self, callback: impl FnMut(Option<&Component>) + 'static) -> Self {
        self.on_component_select = Some(Box::new(callback));
        self
    }

    pub fn on_build_update(mut self, callback: impl FnMut(&Build) + 'static) -> Self {
        self.on_build_update = Some(Box::new(callback));
        self
    }

    /// Replace the displayed build. The viewpoint only moves when the
    /// build's camera differs from the one already applied; a build without
    /// a camera uses the configured perspective pose.
    ///
    /// A build corrected in lenient mode is kept in its corrected form, so
    /// animation steps, selection and build updates never see the rejected
    /// duplicates or out-of-range opacity.
    pub fn set_build(&mut self, build: Build) -> Result<SyncReport, EngineError> {
        let report = self.registry.sync(&self.ctx, &build)?;
        let build = if report.issues.is_empty() {
            build
        } else {
            build.normalized().0
        };

        if !self.has_build || build.camera != self.build.camera {
            match &build.camera {
                Some(camera) => self.views.apply_build_camera(camera),
                None => self.views.reset_perspective(),
            }
        }
        self.build = build;
        self.has_build = true;
        Ok(report)
    }

    /// Advance one frame: apply settled loads, step the assembly animation,
    /// and push dirty material state to the GPU. Never fails.
    pub fn tick(&mut self, dt: Duration) -> FrameReport {
        let loads = self.registry.process_loads(&self.ctx);
        let animation = self.sequencer.tick(dt, &mut self.registry);
        self.registry.flush(&self.ctx);

        FrameReport {
            loads,
            animation,
            progress: self.sequencer.progress(),
            pending_loads: self.registry.pending_loads(),
        }
    }

    /// Swap in new settings. Build handling applies from the next sync,
    /// reveal parameters from the next step sample, and camera presets
    /// immediately.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.registry.apply_config(&config);
        self.sequencer.set_params(RevealParams::from_config(&config));
        self.views.apply_config(&config);
        self.config = config;
    }

    /// Stop the animation, drop in-flight loads and release every resource.
    /// Safe to call repeatedly; also runs on drop.
    pub fn teardown(&mut self) {
        self.sequencer.stop(&mut self.registry);
        self.registry.teardown();
        self.build = Build::default();
        self.has_build = false;
    }

    /// Select a component, or clear the selection with `None`
    pub fn select_component(&mut self, id: Option<&str>) -> Result<Option<&Component>, EngineError> {
        let component = match id {
            Some(id) => Some(
                self.build
                    .component(id)
                    .ok_or_else(|| EngineError::UnknownComponent(id.to_string()))?,
            ),
            None => None,
        };
        self.registry.set_selected(id);
        if let Some(callback) = self.on_component_select.as_mut() {
            callback(component);
        }
        Ok(component)
    }

    pub fn selected_component(&self) -> Option<&Component> {
        self.registry.selected().and_then(|id| self.build.component(id))
    }

    /// Closest rendered component under a pixel position
    pub fn pick_component(&self, screen_pos: (f32, f32)) -> Option<PickResult> {
        picking::pick_component(screen_pos, self.ctx.size(), self.views.camera(), &self.registry)
    }

    /// Pick and select in one go; a miss clears the selection
    pub fn select_at(&mut self, screen_pos: (f32, f32)) -> Option<PickResult> {
        let hit = self.pick_component(screen_pos);
        let id = hit.as_ref().map(|h| h.component_id.clone());
        // Picked ids always come from the registry, which mirrors the build
        if let Err(err) = self.select_component(id.as_deref()) {
            log::warn!("pick selected an unknown component: {err}");
        }
        hit
    }

    /// Flip a component's visibility and report the updated build.
    /// Returns the new visibility.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, EngineError> {
        let component = self
            .build
            .component_mut(id)
            .ok_or_else(|| EngineError::UnknownComponent(id.to_string()))?;
        component.visible = !component.visible;
        let visible = component.visible;

        self.registry.set_visible(id, visible);
        self.emit_build_update();
        Ok(visible)
    }

    /// Point a component at a new model (or none) and report the updated build
    pub fn assign_model(&mut self, id: &str, model_ref: Option<String>) -> Result<(), EngineError> {
        let mut build = self.build.clone();
        let component = build
            .component_mut(id)
            .ok_or_else(|| EngineError::UnknownComponent(id.to_string()))?;
        component.model_ref = model_ref;

        self.registry.sync(&self.ctx, &build)?;
        self.build = build;
        self.emit_build_update();
        Ok(())
    }

    fn emit_build_update(&mut self) {
        if let Some(callback) = self.on_build_update.as_mut() {
            callback(&self.build);
        }
    }

    pub fn set_wireframe(&mut self, enabled: bool) {
        self.registry.set_wireframe(enabled);
        self.registry.flush(&self.ctx);
    }

    pub fn wireframe(&self) -> bool {
        self.registry.wireframe()
    }

    /// Run the build's assembly animation, or a default one-step-per-component
    /// sequence when it has none. Restarts a run in progress.
    pub fn play_assembly(&mut self) -> Vec<SequencerEvent> {
        let steps = self.build.assembly_steps(&self.config);
        self.play_steps(steps)
    }

    pub fn play_steps(&mut self, steps: Vec<AnimationStep>) -> Vec<SequencerEvent> {
        self.sequencer.play(steps, &mut self.registry)
    }

    pub fn stop_assembly(&mut self) -> Option<SequencerEvent> {
        self.sequencer.stop(&mut self.registry)
    }

    pub fn assembly_progress(&self) -> f32 {
        self.sequencer.progress()
    }

    pub fn is_assembling(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn select_view_mode(&mut self, mode: ViewMode) -> Viewpoint {
        self.views.select_mode(mode);
        self.views.viewpoint()
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.views.orbit(dx, dy);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.views.pan(dx, dy);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.views.zoom(delta);
    }

    pub fn viewpoint(&self) -> Viewpoint {
        self.views.viewpoint()
    }

    pub fn view_state(&self) -> ViewState {
        self.views.state()
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        self.views.uniform()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.views.resize(self.ctx.width, self.ctx.height);
    }

    pub fn stats(&self) -> SceneStats {
        let registry = self.registry.stats();
        SceneStats {
            entries: registry.entries,
            rendered: registry.rendered,
            placeholders: registry.placeholders,
            loaded_assets: registry.loaded_assets,
            triangles: registry.triangles,
            resources: registry.resources,
            loader: registry.loader,
            view: self.views.state(),
            assembly_progress: self.sequencer.progress(),
        }
    }

    /// The engine's derived copy of the current build
    pub fn build(&self) -> &Build {
        &self.build
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Drop for BuildViewer {
    fn drop(&mut self) {
        self.teardown();
    }
}
