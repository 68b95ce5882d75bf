//! The canonical navigation block and its per-document customization.

use serde::{Deserialize, Serialize};

use crate::marker::{MarkerRule, NavEntry};
use crate::matcher::{Region, RegionError, RegionPattern};

/// How serious a [`Notice`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
}

/// Non-fatal conditions found while customizing a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Several entries share the destination; only the first was marked.
    AmbiguousActiveTarget {
        destination: String,
        occurrences: usize,
    },
    /// No entry points at the document, so nothing is marked active.
    NoActiveMatch { identifier: String },
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::AmbiguousActiveTarget { .. } => Severity::Warning,
            Self::NoActiveMatch { .. } => Severity::Info,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousActiveTarget {
                destination,
                occurrences,
            } => write!(
                f,
                "{occurrences} entries point at {destination}; marked the first one"
            ),
            Self::NoActiveMatch { identifier } => {
                write!(f, "no entry points at {identifier}; nothing marked active")
            }
        }
    }
}

/// A customized copy of the canonical block for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customized {
    pub text: String,
    pub active_matched: bool,
    pub notices: Vec<Notice>,
}

/// The navigation block taken from the reference document.
///
/// The active marker is cleared once at extraction; every customization
/// starts from that cleared text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTemplate {
    source: String,
    cleared: String,
    entries: Vec<NavEntry>,
}

impl CanonicalTemplate {
    /// Extract the first region of `reference` matching `pattern`.
    pub fn extract(
        reference: &str,
        pattern: &RegionPattern,
        rule: &dyn MarkerRule,
    ) -> Result<(Self, Region), RegionError> {
        let region = pattern.locate(reference, 0)?;
        let template = Self::from_region_text(region.text(reference), rule);
        Ok((template, region))
    }

    /// Build a template from region text that was already extracted.
    pub fn from_region_text(text: &str, rule: &dyn MarkerRule) -> Self {
        let cleared = rule.clear(text);
        let entries = rule.entries(&cleared);
        Self {
            source: text.to_string(),
            cleared,
            entries,
        }
    }

    /// The region exactly as it appears in the reference document.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The region with every active marker removed.
    pub fn cleared(&self) -> &str {
        &self.cleared
    }

    /// Entries of the cleared region, in menu order.
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Produce the block for the document named `identifier`: only the first
    /// entry whose destination equals `identifier` is marked active.
    pub fn customize(&self, identifier: &str, rule: &dyn MarkerRule) -> Customized {
        let matching: Vec<&NavEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.destination.as_deref() == Some(identifier))
            .collect();

        let Some(first) = matching.first() else {
            return Customized {
                text: self.cleared.clone(),
                active_matched: false,
                notices: vec![Notice::NoActiveMatch {
                    identifier: identifier.to_string(),
                }],
            };
        };

        let mut notices = Vec::new();
        if matching.len() > 1 {
            notices.push(Notice::AmbiguousActiveTarget {
                destination: identifier.to_string(),
                occurrences: matching.len(),
            });
        }

        Customized {
            text: rule.activate(&self.cleared, first),
            active_matched: true,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::TokenMarkerRule;

    fn template(entries: &[&str]) -> CanonicalTemplate {
        let items: String = entries
            .iter()
            .map(|dest| format!("<li class=\"nav-item active\"><a href=\"{dest}\">x</a></li>"))
            .collect();
        CanonicalTemplate::from_region_text(&items, &TokenMarkerRule::sidebar())
    }

    #[test]
    fn test_template_is_cleared_at_extraction() {
        let t = template(&["a.html", "b.html"]);
        assert!(t.source().contains("active"));
        assert!(!t.cleared().contains("active"));
        assert!(t.entries().iter().all(|e| !e.active));
    }

    #[test]
    fn test_customize_marks_matching_entry() {
        let rule = TokenMarkerRule::sidebar();
        let c = template(&["a.html", "b.html"]).customize("b.html", &rule);

        assert!(c.active_matched);
        assert!(c.notices.is_empty());
        assert_eq!(rule.active_destinations(&c.text), vec![Some("b.html".to_string())]);
    }

    #[test]
    fn test_customize_duplicates_marks_first() {
        let rule = TokenMarkerRule::sidebar();
        let c = template(&["x.html", "y.html", "x.html"]).customize("x.html", &rule);

        let entries = rule.entries(&c.text);
        assert!(entries[0].active);
        assert!(!entries[2].active);
        assert_eq!(
            c.notices,
            vec![Notice::AmbiguousActiveTarget {
                destination: "x.html".into(),
                occurrences: 2
            }]
        );
        assert_eq!(c.notices[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_customize_without_match() {
        let rule = TokenMarkerRule::sidebar();
        let t = template(&["a.html"]);
        let c = t.customize("z.html", &rule);

        assert!(!c.active_matched);
        assert_eq!(c.text, t.cleared());
        assert_eq!(c.notices[0].severity(), Severity::Info);
    }
}
