// (c) 2024 Ross Younger
//! # IPsec configuration resolution
//!
//! Reads an IPsec (`ipsec.conf`-style) configuration tree and extracts the list of
//! connections it declares, for later translation into metrics.
//!
//! Only three directives are interpreted; everything else is ignored as ordinary text:
//!
//! * `conn <name>` declares a connection. Names consist of `A-Z a-z 0-9 . _ -`.
//! * `auto=ignore` marks the most recently declared connection as ignored.
//! * `include <pattern>` pulls in further files. The pattern is a glob, and is taken
//!   verbatim from the rest of the line.
//!
//! Lines whose first character is `#` are comments.
//!
//! ## Example
//!
//! ```text
//! # /etc/ipsec.conf
//! conn office
//!     auto=start
//! conn spare
//!     auto=ignore
//! include /etc/ipsec.d/*.conf
//! ```
//!
//! ## Traps and tips
//! 1. Directives are recognised anywhere on a line, not only at the start.
//! 1. `auto=ignore` applies to whichever connection was declared last, even when that was in
//!    a different file.
//! 1. Included files are processed breadth-first: all files included by one file are queued
//!    before any of their own includes.
//! 1. Relative include patterns are resolved against the current working directory.

mod configuration;
pub use configuration::{Configuration, Connection};

mod errors;
pub use errors::{GlobSyntaxError, ReadError, RootError};

mod extract;
mod glob;
mod lines;

mod loader;
pub use loader::Loader;

mod root;
pub use root::{resolve_root, Root};

/// Loads the IPsec configuration found at `path`.
///
/// This is a convenience wrapper around [`Loader`] for a single, non-glob path.
pub fn load_configuration<P: AsRef<std::path::Path>>(path: P) -> Result<Configuration, ReadError> {
    Loader::for_path(path).load()
}
