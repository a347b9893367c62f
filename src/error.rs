//! # Error Types
//!
//! Typed errors surfaced by the engine. Only host-facing entry points such as
//! [`Build::from_json`](crate::build::Build::from_json) or a strict
//! [`SceneRegistry::sync`](crate::gfx::scene::SceneRegistry::sync) return these.
//! The per-frame path never does. Asset failures degrade to placeholder geometry
//! and are only logged.

use thiserror::Error;

/// Problems with a host-supplied [`Build`](crate::build::Build).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("duplicate component id `{0}`")]
    DuplicateId(String),

    #[error("component `{id}` has opacity {opacity} outside of [0, 1]")]
    OpacityOutOfRange { id: String, opacity: f32 },

    #[error("invalid color `{0}`, expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("failed to parse build: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why an external model could not be turned into a render node.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{0}` not found")]
    NotFound(String),

    #[error("unsupported asset format for `{0}`")]
    UnsupportedFormat(String),

    #[error("asset load for `{0}` was cancelled")]
    Cancelled(String),

    #[error("asset `{reference}` contains no geometry")]
    Empty { reference: String },

    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

/// Errors returned by the interaction surface.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidBuild(#[from] BuildError),

    #[error("no component with id `{0}` in the current build")]
    UnknownComponent(String),
}
