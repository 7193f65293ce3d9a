//! Sandboxed file search.
//!
//! - **sandbox**: trusted root, path resolution, containment
//! - **walker**: bounded pre-order directory listing
//!
//! # Symlinks
//!
//! The requested directory is always canonicalized, so a symlink that
//! points outside the root is rejected before any listing happens.
//! During the walk symlinks are not followed unless
//! `sandbox.follow_symlinks` is set; even then a link is only entered
//! when its target stays inside the root, and cycles are skipped.

pub mod sandbox;
#[allow(clippy::module_inception)]
pub mod walker;

pub use sandbox::TrustedRoot;
pub use walker::{PathSandboxedWalker, WalkOptions};
