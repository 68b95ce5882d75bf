//! Command implementations for navsync-cli

pub mod diff;
pub mod extract;
pub mod init;
pub mod sync;

pub use diff::run_diff;
pub use extract::run_extract;
pub use init::run_init;
pub use sync::{run_check, run_sync};
