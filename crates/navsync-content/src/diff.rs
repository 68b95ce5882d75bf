//! Line diffs between a document and its synchronized form

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each hunk
const CONTEXT_LINES: usize = 3;

/// Line-based diff of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDiff {
    pub identifier: String,
    pub insertions: usize,
    pub deletions: usize,
    /// Similarity ratio (0.0 to 1.0)
    pub ratio: f32,
    unified: String,
}

impl FileDiff {
    /// Compute the diff from `old` to `new`.
    pub fn compute(identifier: &str, old: &str, new: &str) -> Self {
        if old == new {
            return Self {
                identifier: identifier.to_string(),
                insertions: 0,
                deletions: 0,
                ratio: 1.0,
                unified: String::new(),
            };
        }

        let text_diff = TextDiff::from_lines(old, new);

        let mut insertions = 0;
        let mut deletions = 0;
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => insertions += 1,
                ChangeTag::Delete => deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        let unified = text_diff
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(&format!("a/{identifier}"), &format!("b/{identifier}"))
            .to_string();

        Self {
            identifier: identifier.to_string(),
            insertions,
            deletions,
            ratio: text_diff.ratio(),
            unified,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }

    /// Unified diff text, empty when nothing changed.
    pub fn unified(&self) -> &str {
        &self.unified
    }
}
