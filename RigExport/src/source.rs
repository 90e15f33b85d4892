//! Scene source detection

use std::path::Path;

use crate::error::{Error, Result};
use crate::host::{InMemoryHost, load_gltf};

/// Kind of file a scene can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.gltf` or `.glb`
    Gltf,
    /// JSON scene dump
    SceneDump,
}

impl SourceKind {
    /// Detect the source kind from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "gltf" | "glb" => Some(Self::Gltf),
            "json" => Some(Self::SceneDump),
            _ => None,
        }
    }
}

/// Load a scene host from a glTF/GLB file or a JSON scene dump.
pub fn load_scene(path: &Path) -> Result<InMemoryHost> {
    let kind = SourceKind::from_path(path).ok_or_else(|| Error::UnsupportedSource {
        path: path.to_path_buf(),
    })?;
    tracing::debug!("Loading {:?} scene source: {}", kind, path.display());
    match kind {
        SourceKind::Gltf => load_gltf(path),
        SourceKind::SceneDump => InMemoryHost::load_json(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind() {
        let kind = |path: &str| SourceKind::from_path(Path::new(path));
        assert_eq!(kind("rig.GLB"), Some(SourceKind::Gltf));
        assert_eq!(kind("a/b.gltf"), Some(SourceKind::Gltf));
        assert_eq!(kind("scene.json"), Some(SourceKind::SceneDump));
        assert_eq!(kind("model.fbx"), None);
        assert_eq!(kind("noext"), None);
    }

    #[test]
    fn test_unsupported_source() {
        let err = load_scene(Path::new("model.blend")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource { .. }));
    }
}
