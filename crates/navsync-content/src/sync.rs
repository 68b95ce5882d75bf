//! Propagating the canonical block into target documents.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::marker::{MarkerRule, TokenMarkerRule};
use crate::matcher::{Delimiter, RegionError, RegionPattern};
use crate::template::{CanonicalTemplate, Customized, Notice, Severity};

pub const DEFAULT_ANCHOR: &str = r#"<ul class="nav-menu">"#;
pub const DEFAULT_OPEN_PATTERN: &str = r"<ul\b";
pub const DEFAULT_CLOSE: &str = "</ul>";

static DEFAULT_REGION: LazyLock<RegionPattern> = LazyLock::new(|| {
    RegionPattern::new(
        Delimiter::pattern(DEFAULT_OPEN_PATTERN).expect("valid open pattern"),
        Delimiter::literal(DEFAULT_CLOSE).expect("non-empty close"),
    )
    .with_anchor(Delimiter::literal(DEFAULT_ANCHOR).expect("non-empty anchor"))
});

/// Where the navigation block lives and how its entries are marked.
#[derive(Debug)]
pub struct SyncConfig {
    pub region: RegionPattern,
    pub rule: Box<dyn MarkerRule>,
}

impl SyncConfig {
    pub fn new(region: RegionPattern, rule: impl MarkerRule + 'static) -> Self {
        Self {
            region,
            rule: Box::new(rule),
        }
    }

    /// `<ul class="nav-menu">` blocks with `<li class="nav-item">` entries.
    pub fn sidebar() -> Self {
        Self::new(DEFAULT_REGION.clone(), TokenMarkerRule::sidebar())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::sidebar()
    }
}

/// Why a single target could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The target's own navigation block is missing or malformed.
    Region(RegionError),
    /// The document could not be read.
    Unreadable { message: String },
    /// The rewritten document could not be written back.
    Unwritable { message: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Region(RegionError::NotFound { .. }) => write!(f, "navigation block not found"),
            Self::Region(err @ RegionError::Unbalanced { .. }) => write!(f, "{err}"),
            Self::Unreadable { message } => write!(f, "unreadable: {message}"),
            Self::Unwritable { message } => write!(f, "write failed: {message}"),
        }
    }
}

/// Outcome for one target document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetResult {
    pub success: bool,
    pub reason: Option<FailureReason>,
    /// The rewritten document, present only on success.
    #[serde(skip_serializing)]
    pub new_text: Option<String>,
    pub active_matched: bool,
    /// Whether `new_text` differs from the input text.
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl TargetResult {
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            new_text: None,
            active_matched: false,
            changed: false,
            notices: Vec::new(),
        }
    }

    /// Notices at warning level.
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.severity() == Severity::Warning)
    }
}

/// Per-target results of one synchronization run, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub results: BTreeMap<String, TargetResult>,
}

impl SyncReport {
    pub fn get(&self, identifier: &str) -> Option<&TargetResult> {
        self.results.get(identifier)
    }

    pub fn succeeded(&self) -> usize {
        self.results.values().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.values().filter(|r| !r.success).count()
    }

    pub fn changed(&self) -> usize {
        self.results.values().filter(|r| r.changed).count()
    }

    /// Successful results paired with their rewritten text.
    pub fn new_texts(&self) -> BTreeMap<String, String> {
        self.results
            .iter()
            .filter_map(|(id, r)| r.new_text.clone().map(|text| (id.clone(), text)))
            .collect()
    }
}

/// Copies the reference document's navigation block into target documents.
#[derive(Debug, Default)]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn rule(&self) -> &dyn MarkerRule {
        self.config.rule.as_ref()
    }

    /// Extract the canonical block from the reference document.
    pub fn template(&self, reference: &str) -> Result<CanonicalTemplate> {
        let (template, region) =
            CanonicalTemplate::extract(reference, &self.config.region, self.rule())
                .map_err(Error::Reference)?;

        tracing::debug!(
            span = ?region.span,
            depth = region.max_depth,
            entries = template.entries().len(),
            "extracted canonical navigation block"
        );
        Ok(template)
    }

    /// The block the reference would produce for the document `identifier`.
    pub fn customize(&self, reference: &str, identifier: &str) -> Result<Customized> {
        Ok(self.template(reference)?.customize(identifier, self.rule()))
    }

    /// Synchronize every target against the reference.
    ///
    /// A reference without a usable block fails the whole run. Targets fail
    /// independently of each other.
    pub fn synchronize(
        &self,
        reference: &str,
        targets: &BTreeMap<String, String>,
    ) -> Result<SyncReport> {
        let template = self.template(reference)?;

        let results = targets
            .iter()
            .map(|(identifier, text)| (identifier.clone(), self.apply(&template, identifier, text)))
            .collect();

        Ok(SyncReport { results })
    }

    /// Rewrite one target document from an already extracted template.
    pub fn apply(&self, template: &CanonicalTemplate, identifier: &str, text: &str) -> TargetResult {
        let region = match self.config.region.locate(text, 0) {
            Ok(region) => region,
            Err(err) => {
                tracing::warn!(target_doc = identifier, error = %err, "target has no usable navigation block");
                return TargetResult::failed(FailureReason::Region(err));
            }
        };

        let customized = template.customize(identifier, self.rule());
        for notice in &customized.notices {
            match notice.severity() {
                Severity::Warning => tracing::warn!(target_doc = identifier, "{notice}"),
                Severity::Info => tracing::debug!(target_doc = identifier, "{notice}"),
            }
        }

        let changed = region.text(text) != customized.text;
        let new_text = if changed {
            region.splice(text, &customized.text)
        } else {
            text.to_string()
        };

        TargetResult {
            success: true,
            reason: None,
            new_text: Some(new_text),
            active_matched: customized.active_matched,
            changed,
            notices: customized.notices,
        }
    }
}
