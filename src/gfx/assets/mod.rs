//! # Asset Resolution
//!
//! Turns a component's optional `modelRef` into a render node. Loading goes
//! through the host-supplied [`AssetLoader`] capability, which returns a
//! single-threaded future. The [`AssetResolver`] keeps every in-flight load
//! in a `FuturesUnordered` and polls it once per engine tick with a no-op
//! waker, so completions are picked up in the frame loop in whatever order
//! they settle.
//!
//! Each load carries a [`LoadTicket`] naming the scene entry instance
//! (`epoch`) and its load generation at request time. The resolver does not
//! judge staleness itself: it hands settled tickets back to the
//! [`SceneRegistry`](crate::gfx::scene::SceneRegistry), which drops any
//! result whose ticket no longer matches the entry.
//!
//! Failures never propagate: a failed or unsupported load becomes a
//! placeholder, with the error logged.

pub mod file;
pub mod gltf_scene;
pub mod obj;

use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::noop_waker_ref;
use futures::FutureExt;

use crate::build::Component;
use crate::error::AssetError;
use crate::gfx::resources::material::Material;
use crate::gfx::scene::node::{Mesh, NodeSource, RenderNode};

pub use file::FileAssetLoader;

/// Meshes and materials produced by a loader, in model space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedAsset {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl LoadedAsset {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.triangle_count()).sum()
    }

    /// Root node for `component` with its transform, opacity and visibility applied
    pub fn into_node(self, component: &Component, reference: &str) -> RenderNode {
        let mut node = RenderNode::new(
            component.id.clone(),
            NodeSource::Asset {
                reference: reference.to_string(),
            },
        )
        .with_transform(component.transform.to_matrix());
        node.meshes = self.meshes;
        node.materials = self.materials;
        if node.materials.is_empty() {
            node.materials.push(Material::default());
        }
        node.opacity = component.opacity.clamp(0.0, 1.0);
        node.visible = component.visible;
        node
    }
}

pub type AssetFuture = LocalBoxFuture<'static, Result<LoadedAsset, AssetError>>;

/// Host capability: "load 3D asset from reference"
pub trait AssetLoader {
    fn load(&self, reference: &str) -> AssetFuture;
}

/// Identifies which request a settled load answers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub component_id: String,
    /// Unique per scene entry instance
    pub epoch: u64,
    /// Entry load generation when the request was made
    pub generation: u64,
    pub reference: String,
}

/// Immediate answer from [`AssetResolver::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No model reference; use the placeholder right away
    Fallback,
    /// Load started; the result arrives through [`AssetResolver::poll_settled`]
    Pending(LoadTicket),
}

/// A load that finished, successfully or not
#[derive(Debug)]
pub struct SettledLoad {
    pub ticket: LoadTicket,
    pub result: Result<LoadedAsset, AssetError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Settled loads the registry discarded as stale
    pub stale: u64,
    pub cancelled: u64,
    pub in_flight: usize,
}

pub struct AssetResolver {
    loader: Option<Rc<dyn AssetLoader>>,
    pending: FuturesUnordered<LocalBoxFuture<'static, SettledLoad>>,
    stats: LoaderStats,
}

impl AssetResolver {
    pub fn new(loader: Option<Rc<dyn AssetLoader>>) -> Self {
        Self {
            loader,
            pending: FuturesUnordered::new(),
            stats: LoaderStats::default(),
        }
    }

    pub fn set_loader(&mut self, loader: Option<Rc<dyn AssetLoader>>) {
        self.loader = loader;
    }

    /// Start resolving `component`. Without a `modelRef` the answer is an
    /// immediate fallback and the loader is never touched. Without a loader
    /// the load still goes through the pending queue and settles as `NotFound`
    /// on the next poll, so every referenced model takes the same path.
    pub fn resolve(&mut self, component: &Component, epoch: u64, generation: u64) -> Resolution {
        let Some(reference) = component.model_ref.as_deref() else {
            return Resolution::Fallback;
        };

        let ticket = LoadTicket {
            component_id: component.id.clone(),
            epoch,
            generation,
            reference: reference.to_string(),
        };

        let load = match &self.loader {
            Some(loader) => loader.load(reference),
            None => {
                let reference = reference.to_string();
                async move { Err(AssetError::NotFound(reference)) }.boxed_local()
            }
        };

        let settled_ticket = ticket.clone();
        self.pending.push(
            async move {
                SettledLoad {
                    ticket: settled_ticket,
                    result: load.await,
                }
            }
            .boxed_local(),
        );
        self.stats.attempts += 1;
        log::debug!(
            "loading `{}` for `{}` (generation {})",
            ticket.reference,
            ticket.component_id,
            generation
        );

        Resolution::Pending(ticket)
    }

    /// Drain every load that has settled since the last call. Never blocks.
    ///
    /// Loader futures must wake their waker on completion, as channel and
    /// I/O futures do; a future that is never woken is never polled again.
    pub fn poll_settled(&mut self) -> Vec<SettledLoad> {
        let mut settled = Vec::new();
        let mut cx = Context::from_waker(noop_waker_ref());

        while let Poll::Ready(Some(load)) = self.pending.poll_next_unpin(&mut cx) {
            match &load.result {
                Ok(_) => self.stats.successes += 1,
                Err(_) => self.stats.failures += 1,
            }
            settled.push(load);
        }

        settled
    }

    /// Drop every in-flight future. Their results can never arrive.
    pub fn cancel_all(&mut self) {
        let dropped = self.pending.len();
        if dropped > 0 {
            log::debug!("cancelling {dropped} in-flight asset loads");
        }
        self.stats.cancelled += dropped as u64;
        self.pending = FuturesUnordered::new();
    }

    pub fn record_stale(&mut self) {
        self.stats.stale += 1;
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> LoaderStats {
        LoaderStats {
            in_flight: self.pending.len(),
            ..self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Category;
    use crate::gfx::geometry::generate_cube;
    use futures::channel::oneshot;
    use std::cell::RefCell;

    /// Loader whose results are released by the test
    #[derive(Default)]
    struct GatedLoader {
        senders: RefCell<Vec<(String, oneshot::Sender<Result<LoadedAsset, AssetError>>)>>,
    }

    impl AssetLoader for GatedLoader {
        fn load(&self, reference: &str) -> AssetFuture {
            let (tx, rx) = oneshot::channel();
            self.senders.borrow_mut().push((reference.to_string(), tx));
            let reference = reference.to_string();
            async move { rx.await.unwrap_or(Err(AssetError::Cancelled(reference))) }.boxed_local()
        }
    }

    fn cube_asset() -> LoadedAsset {
        LoadedAsset {
            meshes: vec![Mesh::new("cube", generate_cube())],
            materials: vec![],
        }
    }

    #[test]
    fn test_no_model_ref_never_hits_loader() {
        let loader = Rc::new(GatedLoader::default());
        let mut resolver = AssetResolver::new(Some(loader.clone()));
        let resolution = resolver.resolve(&Component::new("m", Category::Motor), 1, 0);
        assert_eq!(resolution, Resolution::Fallback);
        assert_eq!(resolver.stats().attempts, 0);
        assert!(loader.senders.borrow().is_empty());
    }

    #[test]
    fn test_settles_only_after_completion() {
        let loader = Rc::new(GatedLoader::default());
        let mut resolver = AssetResolver::new(Some(loader.clone()));
        let component = Component::new("m", Category::Motor).with_model_ref("m.glb");

        let Resolution::Pending(ticket) = resolver.resolve(&component, 7, 2) else {
            panic!("expected a pending load");
        };
        assert!(resolver.poll_settled().is_empty());

        let (_, tx) = loader.senders.borrow_mut().remove(0);
        tx.send(Ok(cube_asset())).ok();

        let settled = resolver.poll_settled();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].ticket, ticket);
        assert!(settled[0].result.is_ok());
        assert_eq!(resolver.stats().successes, 1);
        assert_eq!(resolver.in_flight(), 0);
    }

    #[test]
    fn test_missing_loader_settles_as_failure() {
        let mut resolver = AssetResolver::new(None);
        let component = Component::new("c", Category::Camera).with_model_ref("cam.obj");
        assert!(matches!(resolver.resolve(&component, 1, 0), Resolution::Pending(_)));

        let settled = resolver.poll_settled();
        assert!(matches!(settled[0].result, Err(AssetError::NotFound(_))));
        assert_eq!(resolver.stats().failures, 1);
    }

    #[test]
    fn test_cancel_all_drops_pending() {
        let loader = Rc::new(GatedLoader::default());
        let mut resolver = AssetResolver::new(Some(loader.clone()));
        let component = Component::new("m", Category::Motor).with_model_ref("m.glb");
        resolver.resolve(&component, 1, 0);
        resolver.resolve(&component, 1, 1);

        resolver.cancel_all();
        for (_, tx) in loader.senders.borrow_mut().drain(..) {
            // Receiver is gone with the dropped future
            assert!(tx.send(Ok(cube_asset())).is_err());
        }
        assert!(resolver.poll_settled().is_empty());
        assert_eq!(resolver.stats().cancelled, 2);
    }

    #[test]
    fn test_into_node_applies_component_state() {
        let component = Component::new("f", Category::Frame)
            .with_opacity(0.5)
            .with_visible(false)
            .with_transform(crate::build::Transform::from_position(0.0, 2.0, 0.0));
        let node = cube_asset().into_node(&component, "frame.glb");
        assert_eq!(node.asset_reference(), Some("frame.glb"));
        assert_eq!(node.materials.len(), 1);
        assert_eq!(node.opacity, 0.5);
        assert!(!node.visible);
        assert_eq!(node.anchor().y, 2.0);
    }
}
