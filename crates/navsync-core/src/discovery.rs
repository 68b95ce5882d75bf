//! Target discovery

use navsync_fs::{NormalizedPath, io};

use crate::Result;
use crate::config::Manifest;

/// Identifiers of the documents to synchronize, relative to `root`.
///
/// An explicit `targets` list is returned as given (duplicates dropped).
/// Otherwise every file directly in `root` with a listed extension is a
/// target, except names containing an `exclude` marker. The reference page
/// is discovered like any other page and keeps its own entry active.
pub fn discover_targets(root: &NormalizedPath, manifest: &Manifest) -> Result<Vec<String>> {
    if !manifest.targets.is_empty() {
        let mut targets: Vec<String> = Vec::with_capacity(manifest.targets.len());
        for target in &manifest.targets {
            if !targets.contains(target) {
                targets.push(target.clone());
            }
        }
        return Ok(targets);
    }

    let targets: Vec<String> = io::list_files(root)?
        .iter()
        .filter_map(|path| path.file_name().map(str::to_string))
        .filter(|name| has_extension(name, &manifest.extensions))
        .filter(|name| !manifest.exclude.iter().any(|marker| name.contains(marker.as_str())))
        .collect();

    tracing::debug!(root = %root, count = targets.len(), "discovered target documents");
    Ok(targets)
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    NormalizedPath::new(name)
        .extension()
        .map(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
