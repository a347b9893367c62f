//! Filesystem-backed [`AssetLoader`] for native hosts and tests.

use std::path::{Component as PathComponent, Path, PathBuf};

use anyhow::Context;
use futures::FutureExt;

use crate::error::AssetError;

use super::gltf_scene::parse_gltf;
use super::obj::parse_obj;
use super::{AssetFuture, AssetLoader, LoadedAsset};

/// Resolves model references as paths below a root directory.
///
/// `.obj` (with sibling `.mtl`), `.gltf` and `.glb` are supported. References
/// may carry a `file://` prefix; anything that would escape the root is
/// reported as not found.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference.trim_start_matches("file://"));
        let mut path = self.root.clone();
        for part in relative.components() {
            match part {
                PathComponent::Normal(name) => path.push(name),
                PathComponent::CurDir | PathComponent::RootDir => {}
                PathComponent::ParentDir | PathComponent::Prefix(_) => return None,
            }
        }
        Some(path)
    }

    /// Blocking load; the async wrapper in [`AssetLoader::load`] calls this.
    pub fn load_blocking(&self, reference: &str) -> Result<LoadedAsset, AssetError> {
        let path = self
            .resolve_path(reference)
            .ok_or_else(|| AssetError::NotFound(reference.to_string()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| AssetError::UnsupportedFormat(reference.to_string()))?;
        if !matches!(extension.as_str(), "obj" | "gltf" | "glb") {
            return Err(AssetError::UnsupportedFormat(reference.to_string()));
        }
        if !path.is_file() {
            return Err(AssetError::NotFound(reference.to_string()));
        }

        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
        let sidecar = |name: &str| -> Option<Vec<u8>> {
            let relative = Path::new(name);
            if relative
                .components()
                .any(|c| !matches!(c, PathComponent::Normal(_) | PathComponent::CurDir))
            {
                return None;
            }
            std::fs::read(base_dir.join(relative)).ok()
        };

        let asset = match extension.as_str() {
            "obj" => parse_obj(reference, &bytes, &sidecar)?,
            _ => parse_gltf(reference, &bytes, &sidecar)?,
        };

        if asset.meshes.is_empty() {
            return Err(AssetError::Empty {
                reference: reference.to_string(),
            });
        }
        log::info!(
            "loaded `{reference}`: {} meshes, {} triangles",
            asset.meshes.len(),
            asset.triangle_count()
        );
        Ok(asset)
    }
}

impl AssetLoader for FileAssetLoader {
    fn load(&self, reference: &str) -> AssetFuture {
        let loader = self.clone();
        let reference = reference.to_string();
        async move { loader.load_blocking(&reference) }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rotorscope-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let loader = FileAssetLoader::new("/tmp/models");
        assert!(loader.resolve_path("../secret.obj").is_none());
        assert_eq!(
            loader.resolve_path("file://frames/five.glb").unwrap(),
            PathBuf::from("/tmp/models/frames/five.glb")
        );
        assert!(matches!(
            loader.load_blocking("../secret.obj"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let loader = FileAssetLoader::new(scratch_dir("unsupported"));
        assert!(matches!(
            loader.load_blocking("motor.fbx"),
            Err(AssetError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            loader.load_blocking("motor"),
            Err(AssetError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_loads_obj_from_disk() {
        let dir = scratch_dir("obj");
        std::fs::write(
            dir.join("tri.obj"),
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();

        let loader = FileAssetLoader::new(&dir);
        let asset = loader.load_blocking("tri.obj").unwrap();
        assert_eq!(asset.triangle_count(), 1);

        assert!(matches!(
            loader.load_blocking("missing.obj"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_load_error() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("broken.glb"), b"glTF but not really").unwrap();
        let loader = FileAssetLoader::new(&dir);
        assert!(matches!(loader.load_blocking("broken.glb"), Err(AssetError::Load(_))));
    }
}
