//! Resolved configuration data
// (c) 2024 Ross Younger

use tabled::Tabled;

/// A named tunnel definition, declared by a `conn <name>` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Tabled)]
pub struct Connection {
    /// Connection name, as written after `conn`
    #[tabled(rename = "connection")]
    name: String,
    /// Whether an `auto=ignore` line followed this connection's header
    ignored: bool,
}

impl Connection {
    pub(crate) fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ignored: false,
        }
    }

    /// Connection name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this connection is configured with `auto=ignore`
    #[must_use]
    pub fn ignored(&self) -> bool {
        self.ignored
    }

    /// Marks this connection as ignored. This cannot be undone.
    pub(crate) fn mark_ignored(&mut self) {
        self.ignored = true;
    }
}

/// The outcome of resolving an IPsec configuration tree: every connection found, in the
/// order in which the loader encountered them.
///
/// This struct is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    tunnels: Vec<Connection>,
}

impl Configuration {
    pub(crate) fn new(tunnels: Vec<Connection>) -> Self {
        Self { tunnels }
    }

    /// Returns true if at least one connection was found
    #[must_use]
    pub fn has_tunnels(&self) -> bool {
        !self.tunnels.is_empty()
    }

    /// All connections, including ignored ones
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.tunnels
    }

    /// Iterates over the connections in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.tunnels.iter()
    }

    /// Iterates over the connections which are not marked `auto=ignore`
    pub fn active(&self) -> impl Iterator<Item = &Connection> {
        self.tunnels.iter().filter(|c| !c.ignored)
    }

    /// Number of connections (including ignored ones)
    #[must_use]
    pub fn len(&self) -> usize {
        self.tunnels.len()
    }

    /// Returns true if no connections were found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tunnels.is_empty()
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.tunnels.iter()
    }
}
