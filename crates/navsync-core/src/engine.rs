//! SyncEngine implementation
//!
//! The SyncEngine reads a site's pages, hands them to the
//! [`Synchronizer`], and persists the results.

use std::collections::BTreeMap;

use navsync_content::{
    CanonicalTemplate, CheckReport, FailureReason, FileDiff, SyncReport, Synchronizer,
    TargetCheck, TargetResult,
};
use navsync_fs::{NormalizedPath, io};

use crate::config::Manifest;
use crate::discovery::discover_targets;
use crate::{Error, Result};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, compute the results without writing any file
    pub dry_run: bool,
}

/// Result of a site-wide sync
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Per-target results, including targets that could not be read or written
    pub report: SyncReport,
    /// Targets whose file was rewritten (or would be, in a dry run)
    pub written: Vec<String>,
    pub dry_run: bool,
}

/// Pages read from disk, split into readable texts and read failures
struct LoadedTargets {
    texts: BTreeMap<String, String>,
    unreadable: BTreeMap<String, FailureReason>,
}

/// Engine for synchronizing the navigation block across a site
pub struct SyncEngine {
    root: NormalizedPath,
    manifest: Manifest,
    synchronizer: Synchronizer,
}

impl SyncEngine {
    /// Create an engine for `root` with an already loaded manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the manifest's patterns or marker rule are
    /// invalid.
    pub fn new(root: NormalizedPath, manifest: Manifest) -> Result<Self> {
        let synchronizer = Synchronizer::new(manifest.sync_config()?);
        Ok(Self {
            root,
            manifest,
            synchronizer,
        })
    }

    /// Create an engine for `root`, loading its manifest.
    pub fn open(root: NormalizedPath, manifest_path: Option<&NormalizedPath>) -> Result<Self> {
        let manifest = Manifest::open(&root, manifest_path)?;
        Self::new(root, manifest)
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    /// Identifiers of the documents this engine updates.
    pub fn targets(&self) -> Result<Vec<String>> {
        discover_targets(&self.root, &self.manifest)
    }

    fn reference_text(&self) -> Result<String> {
        let path = self.root.join(&self.manifest.reference);
        io::read_text(&path).map_err(|source| Error::ReferenceUnreadable {
            path: path.to_native(),
            source,
        })
    }

    fn load_targets(&self) -> Result<LoadedTargets> {
        let mut loaded = LoadedTargets {
            texts: BTreeMap::new(),
            unreadable: BTreeMap::new(),
        };

        for identifier in self.targets()? {
            match io::read_text(&self.root.join(&identifier)) {
                Ok(text) => {
                    loaded.texts.insert(identifier, text);
                }
                Err(e) => {
                    tracing::warn!(target_doc = %identifier, error = %e, "cannot read target");
                    loaded.unreadable.insert(
                        identifier,
                        FailureReason::Unreadable {
                            message: e.to_string(),
                        },
                    );
                }
            }
        }

        Ok(loaded)
    }

    /// Extract the canonical block from the reference page.
    pub fn extract(&self) -> Result<CanonicalTemplate> {
        let reference = self.reference_text()?;
        Ok(self.synchronizer.template(&reference)?)
    }

    /// Synchronize every target and write back the ones that changed.
    ///
    /// Per-target failures (missing block, unreadable or unwritable file)
    /// are recorded in the report; only a broken reference fails the call.
    pub fn sync(&self, options: SyncOptions) -> Result<SyncOutcome> {
        let reference = self.reference_text()?;
        let loaded = self.load_targets()?;

        let mut report = self.synchronizer.synchronize(&reference, &loaded.texts)?;
        for (identifier, reason) in loaded.unreadable {
            report.results.insert(identifier, TargetResult::failed(reason));
        }

        let mut written = Vec::new();
        for (identifier, result) in report.results.iter_mut() {
            if !result.changed {
                continue;
            }
            let Some(text) = result.new_text.as_deref() else {
                continue;
            };

            if options.dry_run {
                tracing::debug!(target_doc = %identifier, "[dry-run] would rewrite");
                written.push(identifier.clone());
                continue;
            }

            match io::write_text(&self.root.join(identifier), text) {
                Ok(()) => {
                    tracing::info!(target_doc = %identifier, "updated navigation block");
                    written.push(identifier.clone());
                }
                Err(e) => {
                    tracing::warn!(target_doc = %identifier, error = %e, "cannot write target");
                    *result = TargetResult::failed(FailureReason::Unwritable {
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            written = written.len(),
            dry_run = options.dry_run,
            "sync finished"
        );

        Ok(SyncOutcome {
            report,
            written,
            dry_run: options.dry_run,
        })
    }

    /// Compare every target's block with what [`SyncEngine::sync`] would write.
    pub fn check(&self) -> Result<CheckReport> {
        let reference = self.reference_text()?;
        let loaded = self.load_targets()?;

        let report = self.synchronizer.check(&reference, &loaded.texts)?;
        if loaded.unreadable.is_empty() {
            return Ok(report);
        }

        let mut targets = report.targets;
        for (identifier, reason) in loaded.unreadable {
            targets.insert(identifier, TargetCheck::missing(reason));
        }
        Ok(CheckReport::from_targets(targets))
    }

    /// Line diffs of the targets `sync` would rewrite.
    pub fn diff(&self) -> Result<Vec<FileDiff>> {
        let reference = self.reference_text()?;
        let loaded = self.load_targets()?;
        let report = self.synchronizer.synchronize(&reference, &loaded.texts)?;

        let diffs = report
            .results
            .iter()
            .filter(|(_, result)| result.changed)
            .filter_map(|(identifier, result)| {
                let old = loaded.texts.get(identifier)?;
                let new = result.new_text.as_deref()?;
                Some(FileDiff::compute(identifier, old, new))
            })
            .collect();

        Ok(diffs)
    }
}
