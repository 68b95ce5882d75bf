//! [`TestSite`]: a temporary documentation site for navsync scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::html::{page_html, sidebar_html};

/// A temporary directory holding HTML pages and an optional manifest.
///
/// # Example
///
/// ```rust,no_run
/// use navsync_test_utils::TestSite;
///
/// let site = TestSite::new();
/// site.write_page("index.html", &["index.html", "a.html"], None);
/// site.assert_file_contains("index.html", "nav-menu");
/// ```
pub struct TestSite {
    temp_dir: TempDir,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// Create an empty temporary site.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestSite::new: failed to create temp dir"),
        }
    }

    /// Return the root path of the site.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `name` inside the site.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write raw content to `name`.
    pub fn write(&self, name: &str, content: &str) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestSite::write: {}: {e}", path.display()));
    }

    /// Write a full page named `name` whose sidebar lists `destinations`.
    pub fn write_page(&self, name: &str, destinations: &[&str], active: Option<&str>) {
        let sidebar = sidebar_html(destinations, active);
        self.write(name, &page_html(name, &sidebar));
    }

    /// Write `navsync.toml` with the given content.
    pub fn write_manifest(&self, content: &str) {
        self.write("navsync.toml", content);
    }

    /// Read `name` back as text.
    pub fn read(&self, name: &str) -> String {
        let path = self.path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestSite::read: {}: {e}", path.display()))
    }

    /// Assert that the file at `name` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, name: &str, content: &str) {
        let file_content = self.read(name);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            name,
            content,
            file_content
        );
    }

    /// Assert that exactly one entry in `name` is active and that it points
    /// at `destination`.
    pub fn assert_active(&self, name: &str, destination: &str) {
        let content = self.read(name);
        let active_marker = format!(
            "<li class=\"nav-item active\">\n                <a href=\"{destination}\""
        );
        assert_eq!(
            content.matches("nav-item active").count(),
            1,
            "{name}: expected exactly one active entry"
        );
        assert!(
            content.contains(&active_marker),
            "{name}: expected {destination} to be active"
        );
    }
}
