//! Trusted root and path containment.
//!
//! Requested directories are checked twice: once lexically, before
//! anything is read from disk, and again after symlinks have been
//! resolved. Containment is component-wise (`Path::starts_with`), so
//! `/srv/app-evil` is never accepted for a root of `/srv/app`.

use std::path::{Component, Path, PathBuf};

use crate::core::error::{Result, SearchError, SiftError};

/// The directory every search must stay inside
#[derive(Debug, Clone)]
pub struct TrustedRoot {
    /// Absolute, lexically normalized form of the configured path
    configured: PathBuf,

    /// Same directory with symlinks resolved
    canonical: PathBuf,
}

impl TrustedRoot {
    /// Create a trusted root from a configured base directory
    ///
    /// # Errors
    ///
    /// - `InvalidPath`: path doesn't exist or isn't a directory
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let configured = normalize_lexically(&absolute);

        let canonical = configured.canonicalize().map_err(|e| {
            SiftError::InvalidPath(format!("Base directory {path:?} is not accessible: {e}"))
        })?;

        if !canonical.is_dir() {
            return Err(SiftError::InvalidPath(format!(
                "Base directory {path:?} is not a directory"
            )));
        }

        Ok(Self {
            configured,
            canonical,
        })
    }

    /// Canonical path of the root
    pub fn path(&self) -> &Path {
        &self.canonical
    }

    /// Check whether a canonical path lies inside the root
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.canonical)
    }

    /// Check a lexically normalized path against the root, without
    /// reading anything from disk
    ///
    /// Either spelling of the root is accepted: the configured one and
    /// the canonical one.
    pub fn admits(&self, normalized: &Path) -> bool {
        normalized.starts_with(&self.configured) || self.contains(normalized)
    }

    /// Resolve a caller-supplied directory to a canonical path inside
    /// the root
    ///
    /// Relative paths are taken relative to the root. The returned
    /// error never carries the resolved path.
    pub fn resolve(&self, requested: &str) -> std::result::Result<PathBuf, SearchError> {
        let requested = Path::new(requested);
        let joined = if requested.is_absolute() {
            requested.to_path_buf()
        } else {
            self.canonical.join(requested)
        };

        let lexical = normalize_lexically(&joined);
        if !self.admits(&lexical) {
            return Err(SearchError::PolicyViolation);
        }

        // Symlinks below the root may still point outside it
        let resolved = lexical
            .canonicalize()
            .map_err(|e| SearchError::from_io(&e))?;
        if !self.contains(&resolved) {
            return Err(SearchError::PolicyViolation);
        }

        Ok(resolved)
    }
}

/// Resolve `.` and `..` without touching the filesystem
///
/// `..` at the filesystem root stays at the root, matching how the
/// kernel resolves it.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}
