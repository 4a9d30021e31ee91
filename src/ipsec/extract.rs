//! Directive extraction
// (c) 2024 Ross Younger

use lazy_static::lazy_static;
use regex::Regex;

use super::Connection;

// Separators are ASCII whitespace only; other Unicode spaces are ordinary text.
lazy_static! {
    static ref CONN_HEADER: Regex = Regex::new(r"conn[\t\n\f\r ]([.a-zA-Z0-9_-]+)").unwrap();
    static ref INCLUDE: Regex = Regex::new(r"include[\t\n\f\r ](.*)").unwrap();
}

const AUTO_IGNORE: &str = "auto=ignore";

/// Scans a set of (comment-filtered) lines for the directives we care about.
///
/// New connections are appended to `connections`, which is shared across every file in a
/// single load: an `auto=ignore` line applies to whichever connection was most recently
/// appended, even if that was in a different file.
///
/// Returns the include patterns found, in order of appearance.
pub(crate) fn extract<I, S>(lines: I, connections: &mut Vec<Connection>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut includes = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if let Some(name) = CONN_HEADER.captures(line).and_then(|c| c.get(1)) {
            connections.push(Connection::new(name.as_str()));
        }
        if line.contains(AUTO_IGNORE) {
            if let Some(last) = connections.last_mut() {
                last.mark_ignored();
            }
        }
        if let Some(pattern) = INCLUDE.captures(line).and_then(|c| c.get(1)) {
            includes.push(pattern.as_str().to_owned());
        }
    }
    includes
}
