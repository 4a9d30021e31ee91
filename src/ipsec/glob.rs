//! Wildcard expansion for include directives and the top-level configuration path
// (c) 2024 Ross Younger

use std::path::PathBuf;

use glob::{glob_with, MatchOptions};

use super::GlobSyntaxError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_leading_dot: false,
    require_literal_separator: true,
};

/// Rewrites a pattern into the dialect understood by [`glob`].
///
/// Recursive wildcards are not supported; `**` means the same as `*`.
/// Character class negation may be written `[^...]` as well as `[!...]`.
fn normalise_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        if c == '^' && out.ends_with('[') {
            out.push('!');
            continue;
        }
        out.push(c);
    }
    out
}

/// Expands a glob pattern into the list of matching paths, in lexical order.
///
/// A pattern without wildcards yields itself if the file exists.
/// No matches is not an error. Directory entries which cannot be read are skipped.
///
/// # Note
/// Backslash is not an escape character: it is matched literally. To match a
/// metacharacter literally, wrap it in a class, e.g. `[*]` or `[[]`.
pub(crate) fn expand(pattern: &str) -> Result<Vec<PathBuf>, GlobSyntaxError> {
    let effective = normalise_pattern(pattern);
    let paths =
        glob_with(&effective, MATCH_OPTIONS).map_err(|e| GlobSyntaxError::new(pattern, e))?;
    Ok(paths.flatten().collect())
}
