//! # Scene Registry
//!
//! Owns the mapping from component id to the render node currently standing
//! in for it, together with the GPU resources behind that node.
//!
//! [`SceneRegistry::sync`] reconciles the registry against a [`Build`]:
//! new components get an entry and a resolution request, a changed
//! `modelRef` bumps the entry's generation and re-resolves, cosmetic changes
//! are applied in place, and entries for components that disappeared are
//! released. Asset loads settle later through [`SceneRegistry::process_loads`],
//! which drops any result whose ticket no longer matches its entry.
//!
//! Every entry holds exactly one tracked resource set, so once no load is in
//! flight the tracker's set count equals the entry count.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::build::{Build, Component};
use crate::config::EngineConfig;
use crate::context::RenderContext;
use crate::error::BuildError;
use crate::gfx::assets::{AssetLoader, AssetResolver, LoadTicket, LoaderStats, Resolution};
use crate::gfx::geometry::placeholder::{create_placeholder, update_placeholder};
use crate::gfx::resources::tracker::{ResourceStats, ResourceTracker};

use super::node::{NodeSource, RenderNode, Reveal};

/// Registry record for one component
#[derive(Debug)]
pub struct SceneEntry {
    /// Snapshot of the component as of the last sync
    pub component: Component,
    pub node: RenderNode,
    /// Unique per entry instance; never reused after removal
    pub epoch: u64,
    /// Bumped whenever the entry starts a new resolution
    pub generation: u64,
    /// Load the entry is currently waiting for
    pub pending: Option<LoadTicket>,
}

/// What a [`SceneRegistry::sync`] call changed
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: usize,
    /// Transform, color, opacity or visibility applied to the existing node
    pub updated: usize,
    /// Placeholder regenerated for a new category
    pub rebuilt: usize,
    /// `modelRef` changed and a new resolution started
    pub reresolved: usize,
    pub removed: usize,
    /// Loads in flight after the sync
    pub pending_loads: usize,
    /// Problems corrected while normalising the build
    pub issues: Vec<BuildError>,
}

impl SyncReport {
    pub fn changed(&self) -> bool {
        self.created + self.updated + self.rebuilt + self.reresolved + self.removed > 0
    }
}

/// Outcome of a settled asset load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// The loaded model replaced the entry's node
    Ready {
        component_id: String,
        reference: String,
    },
    /// The load failed and the entry fell back to its placeholder
    Fallback {
        component_id: String,
        reference: String,
        reason: String,
    },
    /// The result arrived for an entry that moved on and was discarded
    Stale {
        component_id: String,
        reference: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub entries: usize,
    pub rendered: usize,
    pub placeholders: usize,
    pub loaded_assets: usize,
    pub triangles: usize,
    pub resources: ResourceStats,
    pub loader: LoaderStats,
}

pub struct SceneRegistry {
    entries: HashMap<String, SceneEntry>,
    /// Entry ids in build order
    order: Vec<String>,
    tracker: ResourceTracker,
    resolver: AssetResolver,
    next_epoch: u64,
    wireframe: bool,
    selected: Option<String>,
    /// Entries whose material uniforms are out of date on the GPU
    dirty: HashSet<String>,
    placeholder_while_loading: bool,
    strict_builds: bool,
}

impl SceneRegistry {
    pub fn new(config: &EngineConfig, loader: Option<Rc<dyn AssetLoader>>) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            tracker: ResourceTracker::new(),
            resolver: AssetResolver::new(loader),
            next_epoch: 0,
            wireframe: false,
            selected: None,
            dirty: HashSet::new(),
            placeholder_while_loading: config.placeholder_while_loading,
            strict_builds: config.strict_builds,
        }
    }

    pub fn set_loader(&mut self, loader: Option<Rc<dyn AssetLoader>>) {
        self.resolver.set_loader(loader);
    }

    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.placeholder_while_loading = config.placeholder_while_loading;
        self.strict_builds = config.strict_builds;
    }

    /// Reconcile the registry with `build`.
    ///
    /// In strict mode an invalid build is rejected before anything changes.
    /// Otherwise it is normalised first and the corrections are reported.
    pub fn sync(&mut self, ctx: &RenderContext, build: &Build) -> Result<SyncReport, BuildError> {
        let mut report = SyncReport::default();

        let normalized;
        let build = if self.strict_builds {
            build.validate()?;
            build
        } else {
            let (fixed, issues) = build.normalized();
            for issue in &issues {
                log::warn!("normalising build: {issue}");
            }
            report.issues = issues;
            normalized = fixed;
            &normalized
        };

        let live: HashSet<&str> = build.components.iter().map(|c| c.id.as_str()).collect();
        let stale_ids: Vec<String> = self
            .order
            .iter()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale_ids {
            self.remove_entry(&id);
            report.removed += 1;
        }

        for component in &build.components {
            if self.entries.contains_key(&component.id) {
                self.reconcile_entry(ctx, component, &mut report);
            } else {
                self.create_entry(ctx, component);
                report.created += 1;
            }
        }
        self.order = build.components.iter().map(|c| c.id.clone()).collect();
        self.flush(ctx);

        report.pending_loads = self.resolver.in_flight();
        log::info!(
            "scene sync: {} entries ({} created, {} updated, {} rebuilt, {} re-resolved, {} removed, {} loading)",
            self.entries.len(),
            report.created,
            report.updated,
            report.rebuilt,
            report.reresolved,
            report.removed,
            report.pending_loads
        );
        Ok(report)
    }

    fn create_entry(&mut self, ctx: &RenderContext, component: &Component) {
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        let (node, pending) = self.resolve_node(component, epoch, 0);

        let mut entry = SceneEntry {
            component: component.clone(),
            node,
            epoch,
            generation: 0,
            pending,
        };
        self.decorate(&mut entry.node, Reveal::REST);
        self.tracker.track_node(ctx, &component.id, &entry.node);
        self.entries.insert(component.id.clone(), entry);
    }

    fn reconcile_entry(&mut self, ctx: &RenderContext, component: &Component, report: &mut SyncReport) {
        let Some(entry) = self.entries.get(&component.id) else {
            return;
        };
        let previous = &entry.component;

        if previous.model_ref != component.model_ref {
            let (epoch, generation, reveal) = (entry.epoch, entry.generation + 1, entry.node.reveal);
            self.tracker.release(&component.id);
            let (mut node, pending) = self.resolve_node(component, epoch, generation);
            self.decorate(&mut node, reveal);
            self.tracker.track_node(ctx, &component.id, &node);
            if let Some(entry) = self.entries.get_mut(&component.id) {
                entry.component = component.clone();
                entry.node = node;
                entry.generation = generation;
                entry.pending = pending;
            }
            report.reresolved += 1;
            return;
        }

        if previous.category != component.category && entry.node.is_placeholder() {
            let reveal = entry.node.reveal;
            let mut node = create_placeholder(component);
            self.decorate(&mut node, reveal);
            self.tracker.track_node(ctx, &component.id, &node);
            if let Some(entry) = self.entries.get_mut(&component.id) {
                entry.component = component.clone();
                entry.node = node;
            }
            report.rebuilt += 1;
            return;
        }

        let cosmetic = previous.transform != component.transform
            || previous.color != component.color
            || previous.opacity != component.opacity
            || previous.visible != component.visible;

        if let Some(entry) = self.entries.get_mut(&component.id) {
            if cosmetic {
                match entry.node.source {
                    NodeSource::Placeholder(_) => update_placeholder(&mut entry.node, component),
                    NodeSource::Asset { .. } | NodeSource::Pending { .. } => {
                        entry.node.transform = component.transform.to_matrix();
                        entry.node.opacity = component.opacity.clamp(0.0, 1.0);
                    }
                }
                entry.node.visible = component.visible;
                self.dirty.insert(component.id.clone());
                report.updated += 1;
            }
            entry.component = component.clone();
        }
    }

    /// Node to show right after a resolution request, plus the ticket to wait on
    fn resolve_node(
        &mut self,
        component: &Component,
        epoch: u64,
        generation: u64,
    ) -> (RenderNode, Option<LoadTicket>) {
        match self.resolver.resolve(component, epoch, generation) {
            Resolution::Fallback => (create_placeholder(component), None),
            Resolution::Pending(ticket) => {
                let node = if self.placeholder_while_loading {
                    create_placeholder(component)
                } else {
                    let mut node = RenderNode::new(
                        component.id.clone(),
                        NodeSource::Pending {
                            reference: ticket.reference.clone(),
                        },
                    )
                    .with_transform(component.transform.to_matrix());
                    node.opacity = component.opacity.clamp(0.0, 1.0);
                    node.visible = component.visible;
                    node
                };
                (node, Some(ticket))
            }
        }
    }

    /// Apply registry-wide state to a freshly realised node
    fn decorate(&self, node: &mut RenderNode, reveal: Reveal) {
        node.reveal = reveal;
        node.selected = self.selected.as_deref() == Some(node.name.as_str());
        node.set_wireframe(self.wireframe);
    }

    fn remove_entry(&mut self, id: &str) {
        if self.entries.remove(id).is_some() {
            self.tracker.release(id);
            self.dirty.remove(id);
            self.order.retain(|entry_id| entry_id != id);
            if self.selected.as_deref() == Some(id) {
                self.selected = None;
            }
            log::debug!("removed scene entry `{id}`");
        }
    }

    /// Apply every asset load that settled since the last call
    pub fn process_loads(&mut self, ctx: &RenderContext) -> Vec<LoadEvent> {
        let mut events = Vec::new();

        for settled in self.resolver.poll_settled() {
            let ticket = settled.ticket;
            let current = self
                .entries
                .get(&ticket.component_id)
                .filter(|entry| entry.pending.as_ref() == Some(&ticket));

            let Some(entry) = current else {
                log::debug!(
                    "discarding stale load of `{}` for `{}` (epoch {}, generation {})",
                    ticket.reference,
                    ticket.component_id,
                    ticket.epoch,
                    ticket.generation
                );
                self.resolver.record_stale();
                events.push(LoadEvent::Stale {
                    component_id: ticket.component_id,
                    reference: ticket.reference,
                });
                continue;
            };

            let reveal = entry.node.reveal;
            let (mut node, event) = match settled.result {
                Ok(asset) => (
                    asset.into_node(&entry.component, &ticket.reference),
                    LoadEvent::Ready {
                        component_id: ticket.component_id.clone(),
                        reference: ticket.reference.clone(),
                    },
                ),
                Err(err) => {
                    log::warn!(
                        "using placeholder for `{}`: loading `{}` failed: {err}",
                        ticket.component_id,
                        ticket.reference
                    );
                    (
                        create_placeholder(&entry.component),
                        LoadEvent::Fallback {
                            component_id: ticket.component_id.clone(),
                            reference: ticket.reference.clone(),
                            reason: err.to_string(),
                        },
                    )
                }
            };

            self.decorate(&mut node, reveal);
            self.tracker.track_node(ctx, &ticket.component_id, &node);
            if let Some(entry) = self.entries.get_mut(&ticket.component_id) {
                entry.node = node;
                entry.pending = None;
            }
            events.push(event);
        }

        events
    }

    /// Push material changes (opacity, color, wireframe) to the GPU
    pub fn flush(&mut self, ctx: &RenderContext) {
        for id in self.dirty.drain() {
            if let Some(entry) = self.entries.get(&id) {
                self.tracker.write_materials(ctx, &id, &entry.node);
            }
        }
    }

    /// Toggle rendering without touching resources or resolution
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.node.visible = visible;
                entry.component.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn reveal(&self, id: &str) -> Option<Reveal> {
        self.entries.get(id).map(|entry| entry.node.reveal)
    }

    pub fn set_reveal(&mut self, id: &str, reveal: Reveal) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                if entry.node.reveal != reveal {
                    entry.node.reveal = reveal;
                    self.dirty.insert(id.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Mark one component as selected and clear the rest; `None` clears all
    pub fn set_selected(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if !self.entries.contains_key(id) {
                return false;
            }
        }
        self.selected = id.map(str::to_string);
        for (entry_id, entry) in self.entries.iter_mut() {
            entry.node.selected = Some(entry_id.as_str()) == id;
        }
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Global wireframe override; nodes realised later inherit it
    pub fn set_wireframe(&mut self, enabled: bool) {
        self.wireframe = enabled;
        for (id, entry) in self.entries.iter_mut() {
            entry.node.set_wireframe(enabled);
            self.dirty.insert(id.clone());
        }
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Release everything and forget every entry. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.resolver.cancel_all();
        let released = self.tracker.release_all();
        if !self.entries.is_empty() || released > 0 {
            log::info!(
                "scene teardown: {} entries, {released} resources released",
                self.entries.len()
            );
        }
        self.entries.clear();
        self.order.clear();
        self.dirty.clear();
        self.selected = None;
    }

    pub fn entry(&self, id: &str) -> Option<&SceneEntry> {
        self.entries.get(id)
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.entries.get(id).map(|entry| &entry.node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in build order
    pub fn entries(&self) -> impl Iterator<Item = &SceneEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Nodes the host should draw this frame, in build order
    pub fn rendered_nodes(&self) -> impl Iterator<Item = (&str, &RenderNode)> + '_ {
        self.entries()
            .filter(|entry| entry.node.is_rendered())
            .map(|entry| (entry.component.id.as_str(), &entry.node))
    }

    pub fn pending_loads(&self) -> usize {
        self.resolver.in_flight()
    }

    /// No loads in flight
    pub fn is_quiescent(&self) -> bool {
        self.resolver.in_flight() == 0
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            entries: self.entries.len(),
            resources: self.tracker.stats(),
            loader: self.resolver.stats(),
            ..Default::default()
        };
        for entry in self.entries.values() {
            if entry.node.is_placeholder() {
                stats.placeholders += 1;
            }
            if entry.node.asset_reference().is_some() {
                stats.loaded_assets += 1;
            }
            if entry.node.is_rendered() {
                stats.rendered += 1;
                stats.triangles += entry.node.triangle_count();
            }
        }
        stats
    }
}

impl Drop for SceneRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}
