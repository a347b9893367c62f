#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::FutureExt;

use rotorscope::build::{Build, Category, Component, Transform};
use rotorscope::config::EngineConfig;
use rotorscope::context::RenderContext;
use rotorscope::engine::BuildViewer;
use rotorscope::error::AssetError;
use rotorscope::gfx::assets::{AssetFuture, AssetLoader, LoadedAsset};
use rotorscope::gfx::geometry::generate_cube;
use rotorscope::gfx::scene::Mesh;

type Sender = oneshot::Sender<Result<LoadedAsset, AssetError>>;

/// Loader whose requests stay pending until the test settles them
#[derive(Default)]
pub struct GatedLoader {
    pending: RefCell<Vec<(String, Sender)>>,
    requests: RefCell<Vec<String>>,
}

impl GatedLoader {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Every reference requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn pending(&self) -> Vec<String> {
        self.pending.borrow().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Settle the oldest pending request for `reference`
    pub fn complete(&self, reference: &str, result: Result<LoadedAsset, AssetError>) -> bool {
        let mut pending = self.pending.borrow_mut();
        match pending.iter().position(|(r, _)| r == reference) {
            Some(index) => {
                let (_, tx) = pending.remove(index);
                tx.send(result).is_ok()
            }
            None => false,
        }
    }

    /// Settle the pending request at `index`
    pub fn complete_at(&self, index: usize, result: Result<LoadedAsset, AssetError>) -> bool {
        let (_, tx) = self.pending.borrow_mut().remove(index);
        tx.send(result).is_ok()
    }
}

impl AssetLoader for GatedLoader {
    fn load(&self, reference: &str) -> AssetFuture {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((reference.to_string(), tx));
        self.requests.borrow_mut().push(reference.to_string());
        let reference = reference.to_string();
        async move { rx.await.unwrap_or(Err(AssetError::Cancelled(reference))) }.boxed_local()
    }
}

pub fn cube_asset() -> LoadedAsset {
    LoadedAsset {
        meshes: vec![Mesh::new("cube", generate_cube())],
        materials: vec![],
    }
}

pub fn load_failure(reference: &str) -> Result<LoadedAsset, AssetError> {
    Err(AssetError::NotFound(reference.to_string()))
}

/// One frame and four motors at the arm tips, none with a model
pub fn quad_build() -> Build {
    let mut components = vec![Component::new("frame", Category::Frame).with_name("5\" frame")];
    for (i, (x, z)) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)].into_iter().enumerate() {
        components.push(
            Component::new(format!("motor{i}"), Category::Motor)
                .with_transform(Transform::from_position(x, 0.2, z)),
        );
    }
    Build::new(components)
}

pub fn headless_viewer() -> BuildViewer {
    rotorscope::init_logging();
    BuildViewer::new(RenderContext::headless(800, 600), EngineConfig::default())
}
