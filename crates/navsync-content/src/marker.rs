//! Navigation entries and the active marker.
//!
//! A [`MarkerRule`] knows how to split a region into entries, read each
//! entry's destination, and add or remove the active marker. The shipped
//! [`TokenMarkerRule`] works on literal opening tags such as
//! `<li class="nav-item">` / `<li class="nav-item active">`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One navigation entry inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Position in menu order, starting at 0.
    pub index: usize,
    /// Span of the entry's marker token within the region text.
    pub marker: Range<usize>,
    /// Destination identifier, if the destination pattern matched.
    pub destination: Option<String>,
    /// Whether the entry currently carries the active marker.
    pub active: bool,
}

/// Extract/inject rules for navigation entries.
pub trait MarkerRule: std::fmt::Debug + Send + Sync {
    /// All entries of `region`, in document order.
    fn entries(&self, region: &str) -> Vec<NavEntry>;

    /// `region` with the active marker removed from every entry.
    fn clear(&self, region: &str) -> String;

    /// `region` with `entry` marked active. `entry` must come from
    /// [`MarkerRule::entries`] on the same text.
    fn activate(&self, region: &str, entry: &NavEntry) -> String;

    /// Destinations of the entries currently marked active.
    fn active_destinations(&self, region: &str) -> Vec<Option<String>> {
        self.entries(region)
            .into_iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.destination)
            .collect()
    }
}

pub const DEFAULT_ACTIVE_TOKEN: &str = r#"<li class="nav-item active">"#;
pub const DEFAULT_INACTIVE_TOKEN: &str = r#"<li class="nav-item">"#;
pub const DEFAULT_DESTINATION_PATTERN: &str = r#"^\s*<a\s+href="(?P<dest>[^"]*)""#;

static DEFAULT_DESTINATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_DESTINATION_PATTERN).expect("valid destination regex"));

/// Marker rule based on two literal tokens.
///
/// Every occurrence of either token starts an entry. The destination is
/// read by applying `destination` to the text between that token and the
/// next one; the named group `dest` is used when present, otherwise group 1.
#[derive(Debug, Clone)]
pub struct TokenMarkerRule {
    active: String,
    inactive: String,
    destination: Regex,
}

impl TokenMarkerRule {
    /// Build a rule from the active token, the inactive token and a
    /// destination regex.
    pub fn new(
        active: impl Into<String>,
        inactive: impl Into<String>,
        destination: &str,
    ) -> Result<Self> {
        let active = active.into();
        let inactive = inactive.into();

        if active.is_empty() || inactive.is_empty() {
            return Err(Error::rule("active and inactive tokens must not be empty"));
        }
        if active == inactive {
            return Err(Error::rule("active and inactive tokens must differ"));
        }

        let destination = Regex::new(destination)?;
        let has_dest = destination.capture_names().any(|name| name == Some("dest"));
        if !has_dest && destination.captures_len() < 2 {
            return Err(Error::rule(
                "destination pattern needs a `dest` group or at least one capture group",
            ));
        }

        Ok(Self {
            active,
            inactive,
            destination,
        })
    }

    /// The `<li class="nav-item">` / `<li class="nav-item active">` rule with
    /// `href` destinations.
    pub fn sidebar() -> Self {
        Self {
            active: DEFAULT_ACTIVE_TOKEN.to_string(),
            inactive: DEFAULT_INACTIVE_TOKEN.to_string(),
            destination: DEFAULT_DESTINATION.clone(),
        }
    }

    pub fn active_token(&self) -> &str {
        &self.active
    }

    pub fn inactive_token(&self) -> &str {
        &self.inactive
    }

    /// Marker spans and their active flag, in order.
    ///
    /// When both tokens start at the same byte the longer one wins, so a
    /// token that is a prefix of the other is never double counted.
    fn markers(&self, region: &str) -> Vec<(Range<usize>, bool)> {
        let mut markers = Vec::new();
        let mut pos = 0;

        while pos < region.len() {
            let next_active = region[pos..].find(&self.active).map(|i| pos + i);
            let next_inactive = region[pos..].find(&self.inactive).map(|i| pos + i);

            let (start, active) = match (next_active, next_inactive) {
                (None, None) => break,
                (Some(a), None) => (a, true),
                (None, Some(i)) => (i, false),
                (Some(a), Some(i)) if a < i => (a, true),
                (Some(a), Some(i)) if i < a => (i, false),
                (Some(a), Some(_)) => (a, self.active.len() > self.inactive.len()),
            };

            let len = if active {
                self.active.len()
            } else {
                self.inactive.len()
            };
            markers.push((start..start + len, active));
            pos = start + len;
        }

        markers
    }

    fn extract_destination(&self, segment: &str) -> Option<String> {
        let caps = self.destination.captures(segment)?;
        caps.name("dest")
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn replace_marker(&self, region: &str, marker: &Range<usize>, token: &str) -> String {
        let mut result = String::with_capacity(region.len() + token.len());
        result.push_str(&region[..marker.start]);
        result.push_str(token);
        result.push_str(&region[marker.end..]);
        result
    }
}

impl Default for TokenMarkerRule {
    fn default() -> Self {
        Self::sidebar()
    }
}

impl MarkerRule for TokenMarkerRule {
    fn entries(&self, region: &str) -> Vec<NavEntry> {
        let markers = self.markers(region);

        markers
            .iter()
            .enumerate()
            .map(|(index, (span, active))| {
                let segment_end = markers
                    .get(index + 1)
                    .map(|(next, _)| next.start)
                    .unwrap_or(region.len());
                NavEntry {
                    index,
                    marker: span.clone(),
                    destination: self.extract_destination(&region[span.end..segment_end]),
                    active: *active,
                }
            })
            .collect()
    }

    fn clear(&self, region: &str) -> String {
        let mut result = String::with_capacity(region.len());
        let mut last = 0;

        for (span, active) in self.markers(region) {
            if active {
                result.push_str(&region[last..span.start]);
                result.push_str(&self.inactive);
                last = span.end;
            }
        }

        result.push_str(&region[last..]);
        result
    }

    fn activate(&self, region: &str, entry: &NavEntry) -> String {
        if entry.active {
            return region.to_string();
        }
        self.replace_marker(region, &entry.marker, &self.active)
    }
}
