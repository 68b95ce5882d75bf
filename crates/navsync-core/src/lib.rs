//! Site-level driver for navsync
//!
//! `navsync-content` works on strings only. This crate connects it to a
//! documentation directory:
//!
//! - **Manifest**: `navsync.toml` naming the reference page, the targets and
//!   the region/marker patterns
//! - **Discovery**: the target list, either explicit or every page with a
//!   matching extension
//! - **SyncEngine**: reads the pages, runs sync/check/diff and writes back
//!   only the documents that changed
//!
//! ```text
//!               navsync-cli
//!                    |
//!               navsync-core
//!                /        \
//!        navsync-fs    navsync-content
//! ```

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;

pub use config::{DEFAULT_MANIFEST, MANIFEST_FILE, Manifest, MarkerSection, PatternSpec, RegionSection};
pub use discovery::discover_targets;
pub use engine::{SyncEngine, SyncOptions, SyncOutcome};
pub use error::{Error, Result};
