//! Top-level configuration path resolution
// (c) 2024 Ross Younger

use std::path::PathBuf;

use tracing::debug;

use super::{glob, lines::read_lossy, RootError};

/// The starting point of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    /// A single configuration file
    Path(PathBuf),
    /// Several configuration fragments, concatenated in memory
    Merged {
        /// Description of where the content came from, for log messages
        name: String,
        /// The concatenated fragments
        content: String,
    },
}

/// Resolves the configured path, which may be a glob pattern.
///
/// If the pattern matches more than one file, the files are read in lexical order and
/// concatenated (each followed by a newline) into a single in-memory configuration.
/// Otherwise the path is used as given; if it names a file that does not exist, the
/// failure is reported when the load reads it.
///
/// Unlike include directives, any error here is fatal.
pub fn resolve_root(pattern: &str) -> Result<Root, RootError> {
    let files = glob::expand(pattern)?;
    if files.len() <= 1 {
        return Ok(Root::Path(PathBuf::from(pattern)));
    }
    debug!("merging {} configuration fragments", files.len());
    let mut content = String::new();
    for file in &files {
        let data = read_lossy(file).map_err(|source| RootError::Read {
            path: file.clone(),
            source,
        })?;
        content.push_str(&data);
        content.push('\n');
    }
    Ok(Root::Merged {
        name: pattern.to_owned(),
        content,
    })
}
