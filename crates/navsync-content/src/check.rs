//! Consistency checking: compare each target's navigation block with what
//! synchronization would produce, without rewriting anything.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::marker::NavEntry;
use crate::matcher::RegionError;
use crate::sync::{FailureReason, Synchronizer};
use crate::template::CanonicalTemplate;

/// Overall status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Every target matches the canonical block
    Healthy,
    /// At least one target differs from the canonical block
    Drifted,
    /// At least one target has no usable navigation block
    Broken,
}

/// Status of a single target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    InSync,
    Drifted,
    Missing,
}

/// A specific way a target's block differs from the expected block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Difference {
    /// Different number of entries
    EntryCount { expected: usize, actual: usize },
    /// Entry at `index` points somewhere else
    Destination {
        index: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
    /// The wrong entries are marked active
    ActiveEntry {
        expected: Vec<Option<String>>,
        actual: Vec<Option<String>>,
    },
    /// Entry at `index` has the right destination but different text
    /// (label, icon, or a section title following it)
    Label {
        index: usize,
        destination: Option<String>,
    },
    /// Same entries, other bytes differ (markup before the first entry,
    /// whitespace)
    Content,
    /// The document contains more than one navigation block
    DuplicateRegion { count: usize },
    /// A later navigation block never closes
    UnbalancedRegion { start: usize, depth: usize },
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn show(dest: &Option<String>) -> &str {
            dest.as_deref().unwrap_or("<none>")
        }

        match self {
            Self::EntryCount { expected, actual } => {
                write!(f, "entry count mismatch: expected {expected}, found {actual}")
            }
            Self::Destination {
                index,
                expected,
                actual,
            } => write!(
                f,
                "entry {} points at {}, expected {}",
                index + 1,
                show(actual),
                show(expected)
            ),
            Self::ActiveEntry { expected, actual } => {
                let list = |items: &[Option<String>]| {
                    if items.is_empty() {
                        "nothing".to_string()
                    } else {
                        items.iter().map(show).collect::<Vec<_>>().join(", ")
                    }
                };
                write!(
                    f,
                    "active entry is {}, expected {}",
                    list(actual.as_slice()),
                    list(expected.as_slice())
                )
            }
            Self::Label { index, destination } => write!(
                f,
                "entry {} ({}) has different text",
                index + 1,
                show(destination)
            ),
            Self::Content => write!(f, "block text differs from the reference"),
            Self::DuplicateRegion { count } => {
                write!(f, "{count} navigation blocks found, only the first is synchronized")
            }
            Self::UnbalancedRegion { start, depth } => write!(
                f,
                "navigation block at byte {start} is unbalanced: {depth} delimiter(s) never closed"
            ),
        }
    }
}

/// Check result for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCheck {
    pub status: TargetStatus,
    pub differences: Vec<Difference>,
    /// Why the block could not be checked, when `status` is `Missing`
    pub reason: Option<FailureReason>,
    /// Checksum of the block currently in the document
    pub checksum: Option<String>,
}

impl TargetCheck {
    pub fn missing(reason: FailureReason) -> Self {
        Self {
            status: TargetStatus::Missing,
            differences: Vec::new(),
            reason: Some(reason),
            checksum: None,
        }
    }
}

/// Report from a consistency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub targets: BTreeMap<String, TargetCheck>,
}

impl CheckReport {
    /// Build a report, deriving the overall status from the targets.
    pub fn from_targets(targets: BTreeMap<String, TargetCheck>) -> Self {
        let statuses: Vec<TargetStatus> = targets.values().map(|t| t.status).collect();
        let status = if statuses.contains(&TargetStatus::Missing) {
            CheckStatus::Broken
        } else if statuses.contains(&TargetStatus::Drifted) {
            CheckStatus::Drifted
        } else {
            CheckStatus::Healthy
        };
        Self { status, targets }
    }

    pub fn count(&self, status: TargetStatus) -> usize {
        self.targets.values().filter(|t| t.status == status).count()
    }
}

impl Synchronizer {
    /// Compare every target's block against the block `synchronize` would
    /// write into it.
    pub fn check(&self, reference: &str, targets: &BTreeMap<String, String>) -> Result<CheckReport> {
        let template = self.template(reference)?;

        let results = targets
            .iter()
            .map(|(identifier, text)| {
                (identifier.clone(), self.check_target(&template, identifier, text))
            })
            .collect();

        Ok(CheckReport::from_targets(results))
    }

    fn check_target(&self, template: &CanonicalTemplate, identifier: &str, text: &str) -> TargetCheck {
        let pattern = &self.config().region;
        let region = match pattern.locate(text, 0) {
            Ok(region) => region,
            Err(err) => return TargetCheck::missing(FailureReason::Region(err)),
        };

        let rule = self.rule();
        let actual = region.text(text);
        let expected = template.customize(identifier, rule).text;

        let mut differences = Vec::new();

        match pattern.locate_all(text) {
            Ok(regions) if regions.len() > 1 => {
                differences.push(Difference::DuplicateRegion {
                    count: regions.len(),
                });
            }
            Ok(_) => {}
            // The first block located cleanly, so this one comes later.
            Err(RegionError::Unbalanced { start, depth }) => {
                differences.push(Difference::UnbalancedRegion { start, depth });
            }
            Err(RegionError::NotFound { .. }) => {}
        }

        if actual != expected {
            let expected_entries = rule.entries(&expected);
            let actual_entries = rule.entries(actual);

            let same_count = expected_entries.len() == actual_entries.len();
            if !same_count {
                differences.push(Difference::EntryCount {
                    expected: expected_entries.len(),
                    actual: actual_entries.len(),
                });
            }

            for (exp, act) in expected_entries.iter().zip(&actual_entries) {
                if exp.destination != act.destination {
                    differences.push(Difference::Destination {
                        index: exp.index,
                        expected: exp.destination.clone(),
                        actual: act.destination.clone(),
                    });
                } else if same_count
                    && entry_text(&expected, &expected_entries, exp.index)
                        != entry_text(actual, &actual_entries, act.index)
                {
                    differences.push(Difference::Label {
                        index: exp.index,
                        destination: exp.destination.clone(),
                    });
                }
            }

            let expected_active = rule.active_destinations(&expected);
            let actual_active = rule.active_destinations(actual);
            if expected_active != actual_active {
                differences.push(Difference::ActiveEntry {
                    expected: expected_active,
                    actual: actual_active,
                });
            }

            let structural = differences.iter().any(|d| {
                !matches!(
                    d,
                    Difference::DuplicateRegion { .. } | Difference::UnbalancedRegion { .. }
                )
            });
            if !structural {
                differences.push(Difference::Content);
            }
        }

        let status = if differences.is_empty() {
            TargetStatus::InSync
        } else {
            TargetStatus::Drifted
        };

        TargetCheck {
            status,
            differences,
            reason: None,
            checksum: Some(region.checksum(text)),
        }
    }
}

/// Text after entry `index`'s marker, up to the next entry's marker.
fn entry_text<'a>(region: &'a str, entries: &[NavEntry], index: usize) -> &'a str {
    let start = entries[index].marker.end;
    let end = entries
        .get(index + 1)
        .map(|next| next.marker.start)
        .unwrap_or(region.len());
    &region[start..end]
}
