//! Sandboxed directory walker.
//!
//! Lists a directory inside the trusted root, optionally recursing,
//! and returns flat file metadata in pre-order. Failures on the
//! requested directory are reported; failures further down are
//! logged and skipped so one unreadable subtree never sinks the
//! whole search.
//!
//! walkdir never follows links here. When following is enabled, each
//! symlinked directory is vetted first (its target must be inside the
//! root and must not be an ancestor of the current position) and then
//! walked as a nested subtree. Escaping targets are never opened.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::Config;
use crate::core::error::{Result, SearchError};
use crate::core::types::{FileEntry, SearchResult};

use super::sandbox::{normalize_lexically, TrustedRoot};

type WalkResult = std::result::Result<(), SearchError>;

/// Bounds and link policy for a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum entries returned by one search
    pub max_entries: usize,

    /// Maximum depth below the requested directory (1 = children)
    pub max_depth: usize,

    /// Descend into symlinked directories whose target stays inside
    /// the root
    pub follow_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_depth: 32,
            follow_symlinks: false,
        }
    }
}

impl WalkOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_entries: config.limits.max_entries,
            max_depth: config.limits.max_depth,
            follow_symlinks: config.sandbox.follow_symlinks,
        }
    }
}

/// File search confined to a trusted root
#[derive(Debug, Clone)]
pub struct PathSandboxedWalker {
    root: TrustedRoot,
    options: WalkOptions,
}

impl PathSandboxedWalker {
    pub fn new(root: TrustedRoot, options: WalkOptions) -> Self {
        Self { root, options }
    }

    /// Build a walker from the sandbox and limits configuration
    ///
    /// # Errors
    ///
    /// - `InvalidPath`: the configured base directory is unusable
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = TrustedRoot::new(&config.sandbox.base_dir)?;
        Ok(Self::new(root, WalkOptions::from_config(config)))
    }

    pub fn root(&self) -> &TrustedRoot {
        &self.root
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Search a directory
    ///
    /// # Arguments
    ///
    /// * `directory` - Caller-supplied path, absolute or relative to
    ///   the root
    /// * `recursive` - Descend into subdirectories
    ///
    /// # Returns
    ///
    /// Entries in pre-order. `error` is set only when the requested
    /// directory itself is unusable or a resource cap was hit.
    pub fn search(&self, directory: &str, recursive: bool) -> SearchResult {
        let dir = match self.root.resolve(directory) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected search request");
                return SearchResult::failed(e);
            }
        };

        let listing = match open_directory(&dir) {
            Ok(listing) => listing,
            Err(e) => return SearchResult::failed(e),
        };

        let mut entries = Vec::new();
        let outcome = if recursive {
            let mut ancestors = vec![dir.clone()];
            self.walk_tree(&dir, 0, &mut ancestors, &mut entries)
        } else {
            self.list_children(listing, &mut entries)
        };

        let result = SearchResult {
            entries,
            error: outcome.err(),
        };
        tracing::debug!(
            entries = result.entries.len(),
            recursive = recursive,
            truncated = !result.is_ok(),
            "Search completed"
        );
        result
    }

    /// One level only: child directories are reported, never opened
    fn list_children(&self, listing: fs::ReadDir, entries: &mut Vec<FileEntry>) -> WalkResult {
        for child in listing {
            let child = match child {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            let path = child.path();
            let is_symlink = child.file_type().map(|t| t.is_symlink()).unwrap_or(false);
            let follow = is_symlink && self.link_target(&path).is_some();
            self.collect(&path, follow, entries)?;
        }
        Ok(())
    }

    /// Pre-order walk of `dir`, whose own depth is `base_depth`
    ///
    /// `ancestors` holds the search root and the canonical directory
    /// of every link followed on the way down to `dir`.
    fn walk_tree(
        &self,
        dir: &Path,
        base_depth: usize,
        ancestors: &mut Vec<PathBuf>,
        entries: &mut Vec<FileEntry>,
    ) -> WalkResult {
        // One level past the cap so exceeding it is observable
        let max_depth = self
            .options
            .max_depth
            .saturating_add(1)
            .saturating_sub(base_depth);

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            let depth = base_depth + entry.depth();
            if depth > self.options.max_depth {
                return Err(SearchError::ResourceLimitExceeded(format!(
                    "directory depth exceeds {}",
                    self.options.max_depth
                )));
            }

            let path = entry.path();
            let target = if entry.path_is_symlink() {
                self.link_target(path)
            } else {
                None
            };

            // Canonical directory holding a link that will be entered
            let descend_from = match &target {
                Some(target) if target.is_dir() => {
                    match path.parent().and_then(|p| p.canonicalize().ok()) {
                        Some(parent) if !revisits(target, &parent, ancestors) => Some(parent),
                        _ => {
                            tracing::warn!("Skipping symlink cycle: {:?}", path);
                            continue;
                        }
                    }
                }
                _ => None,
            };

            self.collect(path, target.is_some(), entries)?;

            if let Some(parent) = descend_from {
                ancestors.push(parent);
                self.walk_tree(path, depth, ancestors, entries)?;
                ancestors.pop();
            }
        }

        Ok(())
    }

    /// Record one entry, enforcing the entry cap
    fn collect(&self, path: &Path, follow: bool, entries: &mut Vec<FileEntry>) -> WalkResult {
        if entries.len() >= self.options.max_entries {
            return Err(SearchError::ResourceLimitExceeded(format!(
                "more than {} entries",
                self.options.max_entries
            )));
        }

        match file_entry(path, follow) {
            Ok(file) => entries.push(file),
            Err(e) => tracing::warn!("Failed to stat {:?}: {}", path, e),
        }
        Ok(())
    }

    /// Canonical target of a symlink that may be followed
    ///
    /// The link text is checked lexically before anything at the
    /// target is touched. `None` when following is disabled or the
    /// target leaves the root.
    fn link_target(&self, link: &Path) -> Option<PathBuf> {
        if !self.options.follow_symlinks {
            return None;
        }

        let text = fs::read_link(link).ok()?;
        let parent = link.parent()?;
        if !self.root.admits(&normalize_lexically(&parent.join(text))) {
            tracing::warn!("Not following symlink outside the root: {:?}", link);
            return None;
        }

        match link.canonicalize() {
            Ok(target) if self.root.contains(&target) => Some(target),
            Ok(_) => {
                tracing::warn!("Not following symlink outside the root: {:?}", link);
                None
            }
            Err(e) => {
                tracing::warn!("Dangling symlink {:?}: {}", link, e);
                None
            }
        }
    }
}

/// True when entering `target` from `parent` would re-enter a
/// directory the walk is already inside
fn revisits(target: &Path, parent: &Path, ancestors: &[PathBuf]) -> bool {
    parent.starts_with(target) || ancestors.iter().any(|dir| dir.starts_with(target))
}

/// Classify failures on the requested directory itself
fn open_directory(dir: &Path) -> std::result::Result<fs::ReadDir, SearchError> {
    let metadata = fs::metadata(dir).map_err(|e| SearchError::from_io(&e))?;
    if !metadata.is_dir() {
        return Err(SearchError::WrongType);
    }

    fs::read_dir(dir).map_err(|e| SearchError::from_io(&e))
}

fn file_entry(path: &Path, follow: bool) -> io::Result<FileEntry> {
    let metadata = if follow {
        fs::metadata(path)?
    } else {
        fs::symlink_metadata(path)?
    };

    let modified_time = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileEntry {
        name,
        path: path.to_path_buf(),
        is_directory: metadata.is_dir(),
        size: metadata.len(),
        modified_time,
    })
}
