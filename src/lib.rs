//! Rotorscope
//!
//! 3D build visualization and assembly animation for drone part builds,
//! built on wgpu and cgmath. A host hands a [`Build`] to a [`BuildViewer`],
//! ticks it once per frame and draws the nodes it exposes.

pub mod animation;
pub mod build;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod prelude;

pub use build::Build;
pub use config::EngineConfig;
pub use context::RenderContext;
pub use engine::BuildViewer;

/// Initialise `env_logger` for hosts and tests. Honours `RUST_LOG` and
/// defaults to `info`; repeated calls are harmless.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("logger already initialised: {e}");
    }
}
