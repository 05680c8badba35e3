//! Buffered, atomic artifact writes.
//!
//! Artifacts are staged in memory and written only on [`OutputEmitter::commit`].
//! Each write goes to a temporary file in the target's directory that is then
//! renamed over the target, so readers see either the old file or the new one.

use owlgen_core::GenerateError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully rendered artifact waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub path: PathBuf,
    pub content: String,
}

/// Collects artifacts and writes them together.
#[derive(Debug, Default)]
pub struct OutputEmitter {
    pending: Vec<StagedArtifact>,
}

impl OutputEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an artifact. Nothing touches the filesystem yet.
    pub fn stage(&mut self, path: impl Into<PathBuf>, content: String) {
        self.pending.push(StagedArtifact {
            path: path.into(),
            content,
        });
    }

    pub fn pending(&self) -> &[StagedArtifact] {
        &self.pending
    }

    /// Write every staged artifact, in staging order.
    ///
    /// Returns the paths written.
    pub fn commit(self) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::with_capacity(self.pending.len());
        for artifact in self.pending {
            write_atomic(&artifact.path, artifact.content.as_bytes())?;
            tracing::info!(
                path = %artifact.path.display(),
                bytes = artifact.content.len(),
                "wrote artifact"
            );
            written.push(artifact.path);
        }
        Ok(written)
    }
}

/// Replace `path` with `content` in one rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), GenerateError> {
    let io_err = |source: std::io::Error| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_err)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(io_err)?;
    temp.write_all(content).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic___creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/model.rs");

        write_atomic(&path, b"pub struct A;\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pub struct A;\n");
    }

    #[test]
    fn write_atomic___replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.rs");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file should be renamed away");
    }

    #[test]
    fn OutputEmitter___stage___does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.rs");
        let mut emitter = OutputEmitter::new();

        emitter.stage(&path, "content".to_string());

        assert!(!path.exists());
        assert_eq!(emitter.pending().len(), 1);
    }

    #[test]
    fn OutputEmitter___commit___writes_all_in_order() {
        let dir = TempDir::new().unwrap();
        let native = dir.path().join("model.rs");
        let stub = dir.path().join("model.pyi.in");
        let mut emitter = OutputEmitter::new();
        emitter.stage(&native, "native".to_string());
        emitter.stage(&stub, "stub".to_string());

        let written = emitter.commit().unwrap();

        assert_eq!(written, vec![native.clone(), stub.clone()]);
        assert_eq!(std::fs::read_to_string(native).unwrap(), "native");
        assert_eq!(std::fs::read_to_string(stub).unwrap(), "stub");
    }

    #[test]
    fn write_atomic___parent_is_a_file___reports_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("model.rs");

        let err = write_atomic(&path, b"x").unwrap_err();

        assert!(matches!(err, GenerateError::Io { path: p, .. } if p == path));
    }
}
