//! Manifest parsing for `navsync.toml`
//!
//! Every field has a default, so a site laid out like the documentation the
//! tool was written for needs no manifest at all.

use navsync_content::marker::{
    DEFAULT_ACTIVE_TOKEN, DEFAULT_DESTINATION_PATTERN, DEFAULT_INACTIVE_TOKEN,
};
use navsync_content::sync::{DEFAULT_ANCHOR, DEFAULT_CLOSE, DEFAULT_OPEN_PATTERN};
use navsync_content::{Delimiter, RegionPattern, SyncConfig, TokenMarkerRule};
use navsync_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File name looked up in the site root when no manifest path is given
pub const MANIFEST_FILE: &str = "navsync.toml";

/// Manifest written by `navsync init`
pub const DEFAULT_MANIFEST: &str = r##"# navsync manifest
#
# The navigation block of `reference` is copied into every target page and
# the active entry is recomputed for each page.

reference = "index.html"

# Explicit target list. When empty, every file in the site root whose
# extension is listed in `extensions` is a target.
targets = []
extensions = ["html"]

# File names containing any of these are never picked up as targets.
exclude = [".bak", ".old"]

[region]
# A plain string is matched literally, { regex = "..." } is a pattern.
anchor = '<ul class="nav-menu">'
open = { regex = '<ul\b' }
close = '</ul>'

[marker]
active = '<li class="nav-item active">'
inactive = '<li class="nav-item">'
destination = '^\s*<a\s+href="(?P<dest>[^"]*)"'
"##;

fn default_reference() -> String {
    "index.html".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![".bak".to_string(), ".old".to_string()]
}

fn default_anchor() -> Option<PatternSpec> {
    Some(PatternSpec::literal(DEFAULT_ANCHOR))
}

fn default_open() -> PatternSpec {
    PatternSpec::regex(DEFAULT_OPEN_PATTERN)
}

fn default_close() -> PatternSpec {
    PatternSpec::literal(DEFAULT_CLOSE)
}

fn default_active() -> String {
    DEFAULT_ACTIVE_TOKEN.to_string()
}

fn default_inactive() -> String {
    DEFAULT_INACTIVE_TOKEN.to_string()
}

fn default_destination() -> String {
    DEFAULT_DESTINATION_PATTERN.to_string()
}

/// A delimiter as written in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// Matched verbatim
    Literal(String),
    /// Compiled as a regular expression
    Regex { regex: String },
}

impl PatternSpec {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            regex: pattern.into(),
        }
    }

    pub fn to_delimiter(&self) -> navsync_content::Result<Delimiter> {
        match self {
            Self::Literal(text) => Delimiter::literal(text.as_str()),
            Self::Regex { regex } => Delimiter::pattern(regex),
        }
    }
}

/// `[region]`: where the navigation block starts and how nesting is counted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSection {
    /// Delimiter that starts the block; `open` is used when absent
    #[serde(default = "default_anchor")]
    pub anchor: Option<PatternSpec>,
    #[serde(default = "default_open")]
    pub open: PatternSpec,
    #[serde(default = "default_close")]
    pub close: PatternSpec,
}

impl Default for RegionSection {
    fn default() -> Self {
        Self {
            anchor: default_anchor(),
            open: default_open(),
            close: default_close(),
        }
    }
}

/// `[marker]`: how entries and the active marker look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSection {
    #[serde(default = "default_active")]
    pub active: String,
    #[serde(default = "default_inactive")]
    pub inactive: String,
    /// Regex applied after each marker; the `dest` group (or group 1) is
    /// the entry's destination
    #[serde(default = "default_destination")]
    pub destination: String,
}

impl Default for MarkerSection {
    fn default() -> Self {
        Self {
            active: default_active(),
            inactive: default_inactive(),
            destination: default_destination(),
        }
    }
}

/// Site configuration parsed from `navsync.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Page holding the canonical navigation block, relative to the root
    #[serde(default = "default_reference")]
    pub reference: String,

    /// Pages to update, relative to the root; empty means discover
    #[serde(default)]
    pub targets: Vec<String>,

    /// Extensions considered during discovery
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Substrings that exclude a file name from discovery
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub region: RegionSection,

    #[serde(default)]
    pub marker: MarkerSection,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            targets: Vec::new(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            region: RegionSection::default(),
            marker: MarkerSection::default(),
        }
    }
}

impl Manifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use navsync_core::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// reference = "home.html"
    /// targets = ["a.html", "b.html"]
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.reference, "home.html");
    /// assert_eq!(manifest.extensions, vec!["html".to_string()]);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }

    /// Load a manifest from a TOML, JSON or YAML file
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Load the manifest for the site at `root`.
    ///
    /// An explicit path must exist. Without one, `navsync.toml` in the root
    /// is used if present and the defaults otherwise.
    pub fn open(root: &NormalizedPath, explicit: Option<&NormalizedPath>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::ManifestNotFound {
                    path: path.to_native(),
                });
            }
            return Self::load(path);
        }

        let path = root.join(MANIFEST_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!(root = %root, "no manifest found, using defaults");
            Ok(Self::default())
        }
    }

    /// Build the region pattern and marker rule.
    pub fn sync_config(&self) -> Result<SyncConfig> {
        if self.reference.trim().is_empty() {
            return Err(Error::config("reference must name a document"));
        }

        let delimiter = |field: &str, pattern: &PatternSpec| {
            pattern
                .to_delimiter()
                .map_err(|e| Error::config(format!("region.{field}: {e}")))
        };

        let mut region = RegionPattern::new(
            delimiter("open", &self.region.open)?,
            delimiter("close", &self.region.close)?,
        );
        if let Some(anchor) = &self.region.anchor {
            region = region.with_anchor(delimiter("anchor", anchor)?);
        }

        let rule = TokenMarkerRule::new(
            &self.marker.active,
            &self.marker.inactive,
            &self.marker.destination,
        )
        .map_err(|e| Error::config(format!("marker: {e}")))?;

        Ok(SyncConfig::new(region, rule))
    }
}
