//! Navigation block synchronization for static documentation sites.
//!
//! The crate has two layers:
//!
//! - [`matcher`] finds a nested region such as `<ul class="nav-menu">...</ul>`
//!   by counting opening and closing delimiters instead of relying on a
//!   non-greedy regex, which stops at the first inner `</ul>`.
//! - [`sync`] extracts the canonical region from a reference document and
//!   substitutes a customized copy into every target document, moving the
//!   active marker onto the entry that points at the target itself.
//!
//! [`check`] and [`diff`] build on the same pieces to report drift without
//! rewriting anything. Nothing here touches the filesystem.

pub mod check;
pub mod diff;
pub mod error;
pub mod marker;
pub mod matcher;
pub mod sync;
pub mod template;

pub use check::{CheckReport, CheckStatus, Difference, TargetCheck, TargetStatus};
pub use diff::FileDiff;
pub use error::{Error, Result};
pub use marker::{MarkerRule, NavEntry, TokenMarkerRule};
pub use matcher::{Delimiter, Region, RegionError, RegionPattern, find_region};
pub use sync::{FailureReason, SyncConfig, SyncReport, Synchronizer, TargetResult};
pub use template::{CanonicalTemplate, Customized, Notice, Severity};
