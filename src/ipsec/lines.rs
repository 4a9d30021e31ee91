//! Line splitting and comment removal
// (c) 2024 Ross Younger

use std::path::Path;

/// Reads a whole configuration file.
///
/// Content is not required to be UTF-8; invalid sequences are replaced with U+FFFD, so a
/// stray Latin-1 byte in a comment does not make the file unreadable.
pub(crate) fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Splits file content into lines, dropping comment lines.
///
/// A comment line is one whose very first character is `#`. Indented comments and trailing
/// comments are not recognised as such and pass through unchanged, as does any `\r` left over
/// from CRLF line endings.
pub(crate) fn filter_comments(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .filter(|line| !line.starts_with('#'))
        .collect()
}
