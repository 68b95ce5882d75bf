//! Shared test utilities for the navsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`html`]: builders for sidebar markup and whole pages
//! - [`site`]: [`site::TestSite`], a temporary site directory

pub mod html;
pub mod site;

pub use html::{page_html, sectioned_sidebar_html, sidebar_html};
pub use site::TestSite;
