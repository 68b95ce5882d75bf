//! Resolution of the site root and manifest path from global flags

use std::path::Path;

use navsync_core::{MANIFEST_FILE, SyncEngine};
use navsync_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Where the site lives and which manifest describes it
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub root: NormalizedPath,
    /// Manifest given with `--config`, resolved against the working directory
    pub config: Option<NormalizedPath>,
}

impl SiteContext {
    pub fn resolve(root: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;

        let root = NormalizedPath::new(root.map(|p| cwd.join(p)).unwrap_or_else(|| cwd.clone()));
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "Site root {} is not a directory",
                root
            )));
        }

        Ok(Self {
            root: root.canonicalize()?,
            config: config.map(|p| NormalizedPath::new(cwd.join(p))),
        })
    }

    /// The manifest `init` writes and `sync` reads.
    pub fn manifest_path(&self) -> NormalizedPath {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(MANIFEST_FILE))
    }

    pub fn engine(&self) -> Result<SyncEngine> {
        Ok(SyncEngine::open(self.root.clone(), self.config.as_ref())?)
    }
}
