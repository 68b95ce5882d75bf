//! Nesting-aware region matching.
//!
//! A region starts at an opening delimiter and ends at the closing delimiter
//! that brings the nesting depth back to zero:
//!
//! ```text
//! <ul class="nav-menu">      depth 1
//!     <ul>                   depth 2
//!     </ul>                  depth 1
//! </ul>                      depth 0, region ends here
//! ```
//!
//! The scan is an explicit loop over delimiter occurrences with an integer
//! depth counter, so arbitrarily deep nesting never grows the stack.

use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// One side of a region boundary: a literal string or a regex.
///
/// Only the validating constructors build one, so a delimiter never matches
/// the empty string.
#[derive(Debug, Clone)]
pub struct Delimiter {
    kind: DelimiterKind,
}

#[derive(Debug, Clone)]
enum DelimiterKind {
    Literal(String),
    Pattern(Regex),
}

impl Delimiter {
    /// Create a literal delimiter. Empty literals are rejected.
    pub fn literal(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::EmptyDelimiter { pattern: text });
        }
        Ok(Self {
            kind: DelimiterKind::Literal(text),
        })
    }

    /// Compile a regex delimiter. Patterns that match the empty string are
    /// rejected, since they cannot mark a boundary.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        if regex.is_match("") {
            return Err(Error::EmptyDelimiter {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self {
            kind: DelimiterKind::Pattern(regex),
        })
    }

    /// The literal text or regex source.
    pub fn as_str(&self) -> &str {
        match &self.kind {
            DelimiterKind::Literal(text) => text,
            DelimiterKind::Pattern(regex) => regex.as_str(),
        }
    }

    /// Find the first non-empty occurrence starting at or after `from`.
    pub fn find(&self, text: &str, from: usize) -> Option<Range<usize>> {
        if from > text.len() {
            return None;
        }
        let from = ceil_char_boundary(text, from);

        match &self.kind {
            DelimiterKind::Literal(literal) => text[from..]
                .find(literal.as_str())
                .map(|offset| from + offset..from + offset + literal.len()),
            DelimiterKind::Pattern(regex) => {
                // find_at keeps look-behind context such as `\b` intact,
                // unlike searching a re-sliced string.
                let mut at = from;
                while let Some(found) = regex.find_at(text, at) {
                    if found.start() < found.end() {
                        return Some(found.range());
                    }
                    if found.end() >= text.len() {
                        return None;
                    }
                    at = ceil_char_boundary(text, found.end() + 1);
                }
                None
            }
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DelimiterKind::Literal(text) => write!(f, "{text:?}"),
            DelimiterKind::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// A matched region within a document.
///
/// Spans are byte offsets into the text the region was located in and are
/// only meaningful until that text is modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Opening delimiter start through closing delimiter end.
    pub span: Range<usize>,
    /// The opening delimiter (or anchor) that started the region.
    pub open: Range<usize>,
    /// The closing delimiter that brought the depth back to zero.
    pub close: Range<usize>,
    /// Deepest nesting level seen while scanning (1 when nothing nests).
    pub max_depth: usize,
}

impl Region {
    /// The full region text, delimiters included.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// The text between the opening and closing delimiters.
    pub fn inner<'a>(&self, source: &'a str) -> &'a str {
        &source[self.open.end..self.close.start]
    }

    /// Replace the region with `replacement`, leaving every byte outside
    /// `span` untouched.
    ///
    /// # Panics
    /// If `source` is not the text the region was located in and `span` is
    /// out of bounds for it.
    pub fn splice(&self, source: &str, replacement: &str) -> String {
        let mut result = String::with_capacity(
            source.len().saturating_sub(self.span.len()) + replacement.len(),
        );
        result.push_str(&source[..self.span.start]);
        result.push_str(replacement);
        result.push_str(&source[self.span.end..]);
        result
    }

    /// SHA-256 of the region text, hex encoded.
    pub fn checksum(&self, source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text(source).as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Why a region could not be located.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionError {
    /// No opening delimiter at or after the start offset.
    #[error("opening delimiter not found at or after byte {from}")]
    NotFound { from: usize },

    /// The text ended while the region was still open.
    #[error("region opened at byte {start} is unbalanced: {depth} delimiter(s) never closed")]
    Unbalanced { start: usize, depth: usize },
}

/// How to find a region: which delimiter starts it, and which delimiters
/// count nesting inside it.
///
/// The anchor exists because navigation blocks are usually identified by a
/// specific opening tag (`<ul class="nav-menu">`) while nested children use
/// the bare tag (`<ul>`). Without an anchor the `open` delimiter starts the
/// region.
#[derive(Debug, Clone)]
pub struct RegionPattern {
    pub anchor: Option<Delimiter>,
    pub open: Delimiter,
    pub close: Delimiter,
}

impl RegionPattern {
    pub fn new(open: Delimiter, close: Delimiter) -> Self {
        Self {
            anchor: None,
            open,
            close,
        }
    }

    pub fn with_anchor(mut self, anchor: Delimiter) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Locate the first region starting at or after `start_offset`.
    pub fn locate(&self, text: &str, start_offset: usize) -> std::result::Result<Region, RegionError> {
        let starter = self.anchor.as_ref().unwrap_or(&self.open);
        locate_with(text, starter, &self.open, &self.close, start_offset)
    }

    /// Locate every region in document order by restarting after each match.
    ///
    /// Stops at the first unbalanced region and returns that error.
    pub fn locate_all(&self, text: &str) -> std::result::Result<Vec<Region>, RegionError> {
        let mut regions = Vec::new();
        let mut offset = 0;

        loop {
            match self.locate(text, offset) {
                Ok(region) => {
                    offset = region.span.end;
                    regions.push(region);
                }
                Err(RegionError::NotFound { .. }) => return Ok(regions),
                Err(err) => return Err(err),
            }
        }
    }
}

/// Find the outermost region opened by the first `open` at or after
/// `start_offset` and closed by the `close` that returns the depth to zero.
///
/// # Example
/// ```
/// use navsync_content::{Delimiter, find_region};
///
/// let text = "x<ul><ul></ul></ul>y";
/// let open = Delimiter::literal("<ul>").unwrap();
/// let close = Delimiter::literal("</ul>").unwrap();
///
/// let region = find_region(text, &open, &close, 0).unwrap();
/// assert_eq!(region.text(text), "<ul><ul></ul></ul>");
/// ```
pub fn find_region(
    text: &str,
    open: &Delimiter,
    close: &Delimiter,
    start_offset: usize,
) -> std::result::Result<Region, RegionError> {
    locate_with(text, open, open, close, start_offset)
}

fn locate_with(
    text: &str,
    starter: &Delimiter,
    open: &Delimiter,
    close: &Delimiter,
    start_offset: usize,
) -> std::result::Result<Region, RegionError> {
    let opening = starter
        .find(text, start_offset)
        .ok_or(RegionError::NotFound { from: start_offset })?;

    let mut depth = 1usize;
    let mut max_depth = 1usize;
    let mut pos = opening.end;

    loop {
        let Some(next_close) = close.find(text, pos) else {
            return Err(RegionError::Unbalanced {
                start: opening.start,
                depth,
            });
        };

        match open.find(text, pos) {
            Some(next_open) if next_open.start < next_close.start => {
                if next_open.is_empty() {
                    pos = next_open.end + 1;
                    continue;
                }
                depth += 1;
                max_depth = max_depth.max(depth);
                pos = next_open.end;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Region {
                        span: opening.start..next_close.end,
                        open: opening,
                        close: next_close,
                        max_depth,
                    });
                }
                pos = next_close.end;
            }
        }
    }
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Delimiter {
        Delimiter::literal(s).unwrap()
    }

    #[test]
    fn test_single_level_region() {
        let text = "before<ul>item</ul>after";
        let region = find_region(text, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        assert_eq!(region.text(text), "<ul>item</ul>");
        assert_eq!(region.inner(text), "item");
        assert_eq!(region.max_depth, 1);
    }

    #[test]
    fn test_three_nested_opens_form_one_region() {
        let text = "<ul><ul><ul>x</ul></ul></ul><ul>next</ul>";
        let region = find_region(text, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        assert_eq!(region.span, 0..28);
        assert_eq!(region.max_depth, 3);
    }

    #[test]
    fn test_missing_open_is_not_found() {
        let err = find_region("no list here", &lit("<ul>"), &lit("</ul>"), 0).unwrap_err();
        assert_eq!(err, RegionError::NotFound { from: 0 });
    }

    #[test]
    fn test_missing_close_is_unbalanced() {
        let err = find_region("a<ul><ul></ul>", &lit("<ul>"), &lit("</ul>"), 0).unwrap_err();
        assert_eq!(err, RegionError::Unbalanced { start: 1, depth: 1 });
    }

    #[test]
    fn test_start_offset_skips_earlier_regions() {
        let text = "<ul>one</ul><ul>two</ul>";
        let region = find_region(text, &lit("<ul>"), &lit("</ul>"), 1).unwrap();
        assert_eq!(region.inner(text), "two");
    }

    #[test]
    fn test_start_offset_past_end_is_not_found() {
        let err = find_region("<ul></ul>", &lit("<ul>"), &lit("</ul>"), 100).unwrap_err();
        assert_eq!(err, RegionError::NotFound { from: 100 });
    }

    #[test]
    fn test_start_offset_inside_multibyte_char() {
        let text = "é<ul>ü</ul>";
        let region = find_region(text, &lit("<ul>"), &lit("</ul>"), 1).unwrap();
        assert_eq!(region.inner(text), "ü");
    }

    #[test]
    fn test_empty_delimiters_rejected() {
        assert!(matches!(Delimiter::literal(""), Err(Error::EmptyDelimiter { .. })));
        assert!(matches!(Delimiter::pattern("x*"), Err(Error::EmptyDelimiter { .. })));
        assert!(matches!(Delimiter::pattern("("), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_zero_width_open_never_counts_as_nesting() {
        let open = Delimiter::pattern(r"\b").unwrap();
        let close = lit("</ul>");

        let err = find_region("ab</ul>", &open, &close, 0).unwrap_err();
        assert_eq!(err, RegionError::NotFound { from: 0 });

        let pattern = RegionPattern::new(open, close).with_anchor(lit("<ul>"));
        let text = "<ul>ab cd</ul>";
        let region = pattern.locate(text, 0).unwrap();
        assert_eq!(region.span, 0..text.len());
        assert_eq!(region.max_depth, 1);
    }

    #[test]
    fn test_splice_applies_span_to_given_text() {
        let long = "0123456789<ul>x</ul>";
        let region = find_region(long, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        let short = "<ul>x</ul>0123456789";
        assert_eq!(region.span, 10..20);
        assert_eq!(region.splice(short, "Y"), "<ul>x</ul>Y");
    }

    #[test]
    fn test_pattern_delimiter_respects_word_boundary() {
        let open = Delimiter::pattern(r"<ul\b").unwrap();
        let text = "<ulx><ul class=\"a\">";
        assert_eq!(open.find(text, 0), Some(5..8));
    }

    #[test]
    fn test_splice_preserves_surroundings() {
        let text = "head<ul>old</ul>tail";
        let region = find_region(text, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        assert_eq!(region.splice(text, "<ul>new</ul>"), "head<ul>new</ul>tail");
    }

    #[test]
    fn test_checksum_tracks_region_text_only() {
        let a = "aaa<ul>x</ul>";
        let b = "bbbbbb<ul>x</ul>zzz";
        let ra = find_region(a, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        let rb = find_region(b, &lit("<ul>"), &lit("</ul>"), 0).unwrap();
        assert_eq!(ra.checksum(a), rb.checksum(b));
    }
}
