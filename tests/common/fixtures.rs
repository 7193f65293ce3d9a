// Test fixtures for integration testing

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory tree fixture rooted in a temporary directory
///
/// The trusted root is `<tmp>/app`; `<tmp>` itself is outside it so
/// tests can place files the sandbox must never reach.
#[allow(dead_code)] // Used in integration tests
pub struct TestTree {
    pub dir: TempDir,
    pub root: PathBuf,
}

impl TestTree {
    /// `app/data/{a.txt, sub/{b.txt}}` plus `secret.txt` outside the root
    #[allow(dead_code)] // Used in integration tests
    pub fn sample() -> Self {
        let tree = Self::with_files(&[
            ("data/a.txt", "alpha"),
            ("data/sub/b.txt", "bravo bravo"),
            ("README.md", "# App"),
        ]);
        fs::write(tree.dir.path().join("secret.txt"), "do not list").unwrap();
        tree
    }

    /// Create with custom files under the root
    #[allow(dead_code)] // Used in integration tests
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(&root).unwrap();

        for (path, content) in files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full_path, content).unwrap();
        }

        let root = root.canonicalize().unwrap();
        Self { dir, root }
    }

    /// Absolute path below the root, as a string
    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self, relative: &str) -> String {
        self.root.join(relative).to_str().unwrap().to_string()
    }

    /// Directory containing the root (outside the sandbox)
    #[allow(dead_code)] // Used in integration tests
    pub fn outside(&self) -> &Path {
        self.dir.path()
    }
}
