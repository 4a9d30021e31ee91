//! The configuration loader
// (c) 2024 Ross Younger

use std::{
    collections::{HashSet, VecDeque},
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use super::{
    extract::extract,
    glob,
    lines::{filter_comments, read_lossy},
    Configuration, ReadError, Root,
};

/// Where a queued configuration comes from
#[derive(Debug)]
enum Source {
    /// Content already in memory (a merged set of top-level fragments)
    Buffer { name: String, content: String },
    File(PathBuf),
}

impl Source {
    fn name(&self) -> String {
        match self {
            Source::Buffer { name, .. } => name.clone(),
            Source::File(p) => p.display().to_string(),
        }
    }
}

/// Walks an IPsec configuration tree, following `include` directives.
///
/// Files are processed first-in first-out: the includes found in one file are appended to the
/// end of the queue once that file has been scanned. Each distinct file (by canonical path) is
/// read at most once per load, so include cycles terminate.
///
/// # Note
/// A loader can only be used once; [`Loader::load`] consumes it. Loaders share no state, but
/// they read the filesystem without locking, so concurrent edits to the tree during a load
/// give unspecified (but memory-safe) results.
#[derive(Debug)]
pub struct Loader {
    queue: VecDeque<Source>,
    seen: HashSet<PathBuf>,
    connections: Vec<super::Connection>,
}

impl Loader {
    /// Creates a loader starting from a root (see [`resolve_root`](super::resolve_root)).
    #[must_use]
    pub fn new(root: Root) -> Self {
        let mut loader = Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            connections: Vec::new(),
        };
        match root {
            Root::Path(p) => loader.enqueue(p),
            Root::Merged { name, content } => {
                loader.queue.push_back(Source::Buffer { name, content });
            }
        }
        loader
    }

    /// Creates a loader for a single file path
    #[must_use]
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Root::Path(path.as_ref().to_path_buf()))
    }

    /// Adds a file to the back of the queue, unless this load has already met it
    fn enqueue(&mut self, path: PathBuf) {
        // A path that cannot be canonicalized is still queued so the read failure surfaces.
        let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if self.seen.insert(key) {
            trace!("queued {}", path.display());
            self.queue.push_back(Source::File(path));
        } else {
            debug!("skipping {}: already loaded", path.display());
        }
    }

    /// Resolves the whole tree.
    ///
    /// On success, returns every connection found, in processing order.
    ///
    /// The first file which cannot be read stops the load. Anything still queued at that point
    /// is not processed, so includes those files would have introduced are never discovered.
    /// The returned [`ReadError`] carries whatever had been gathered before the failure.
    ///
    /// A malformed include pattern is logged and skipped; it does not stop the load.
    pub fn load(mut self) -> Result<Configuration, ReadError> {
        while let Some(source) = self.queue.pop_front() {
            let name = source.name();
            let content = match source {
                Source::Buffer { content, .. } => content,
                Source::File(path) => match read_lossy(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        return Err(ReadError::new(
                            path,
                            e,
                            Configuration::new(self.connections),
                        ));
                    }
                },
            };
            debug!("reading {name}");

            let includes = extract(filter_comments(&content), &mut self.connections);
            for pattern in includes {
                match glob::expand(&pattern) {
                    Ok(paths) => {
                        for p in paths {
                            self.enqueue(p);
                        }
                    }
                    Err(e) => {
                        warn!("Unable to read include pattern '{pattern}' in file '{name}': {e}");
                    }
                }
            }
        }
        Ok(Configuration::new(self.connections))
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use assertables::assert_contains;

    use super::Loader;
    use crate::ipsec::{Configuration, Root};

    fn summary(c: &Configuration) -> Vec<(String, bool)> {
        c.iter()
            .map(|c| (c.name().to_owned(), c.ignored()))
            .collect()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn single_file() {
        let (path, _dir) =
            crate::util::make_test_tempfile("conn a\nconn b\nconn c\n", "ipsec.conf");
        let config = Loader::for_path(path).load().unwrap();
        assert_eq!(
            summary(&config),
            [("a".into(), false), ("b".into(), false), ("c".into(), false)]
        );
    }

    #[test]
    fn missing_root_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Loader::for_path(dir.path().join("absent.conf"))
            .load()
            .unwrap_err();
        assert!(!err.partial().has_tunnels());
        assert_contains!(err.to_string(), "absent.conf");
    }

    #[test]
    fn invalid_utf8_comment_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipsec.conf");
        std::fs::write(&path, b"conn a\n# caf\xe9 comment\nconn b\n").unwrap();
        let config = Loader::for_path(&path).load().unwrap();
        assert_eq!(summary(&config), [("a".into(), false), ("b".into(), false)]);
    }

    #[test]
    fn breadth_first_order() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "root.conf",
            &format!(
                "conn root\ninclude {0}/one.conf\ninclude {0}/two.conf\n",
                d.display()
            ),
        );
        write(
            d,
            "one.conf",
            &format!("conn one\ninclude {}/nested.conf\n", d.display()),
        );
        write(d, "two.conf", "conn two\n");
        write(d, "nested.conf", "conn nested\n");
        let config = Loader::for_path(d.join("root.conf")).load().unwrap();
        let names: Vec<_> = config.iter().map(|c| c.name().to_owned()).collect();
        assert_eq!(names, ["root", "one", "two", "nested"]);
    }

    #[test]
    fn ignore_spans_file_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "root.conf",
            &format!("conn last-in-root\ninclude {}/child.conf\n", d.display()),
        );
        write(d, "child.conf", "  auto=ignore\nconn child\n");
        let config = Loader::for_path(d.join("root.conf")).load().unwrap();
        assert_eq!(
            summary(&config),
            [("last-in-root".into(), true), ("child".into(), false)]
        );
    }

    #[test]
    fn self_include_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "loop.conf",
            &format!("conn looped\ninclude {}/*.conf\n", d.display()),
        );
        let config = Loader::for_path(d.join("loop.conf")).load().unwrap();
        assert_eq!(summary(&config), [("looped".into(), false)]);
    }

    #[test]
    fn mutual_include_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "a.conf",
            &format!("conn a\ninclude {}/b.conf\n", d.display()),
        );
        write(
            d,
            "b.conf",
            &format!("conn b\ninclude {}/a.conf\n", d.display()),
        );
        let config = Loader::for_path(d.join("a.conf")).load().unwrap();
        assert_eq!(summary(&config), [("a".into(), false), ("b".into(), false)]);
    }

    #[test]
    fn bad_include_pattern_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "root.conf",
            &format!(
                "conn a\ninclude {0}/[broken\ninclude {0}/ok.conf\n",
                d.display()
            ),
        );
        write(d, "ok.conf", "conn b\n");
        let config = Loader::for_path(d.join("root.conf")).load().unwrap();
        assert_eq!(summary(&config), [("a".into(), false), ("b".into(), false)]);
    }

    #[test]
    fn merged_root() {
        let root = Root::Merged {
            name: "<merged>".into(),
            content: "conn x\n\nconn y\n  auto=ignore\n".into(),
        };
        let config = Loader::new(root).load().unwrap();
        assert_eq!(summary(&config), [("x".into(), false), ("y".into(), true)]);
    }

    #[test]
    fn idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path();
        write(
            d,
            "root.conf",
            &format!("conn a\nauto=ignore\ninclude {}/frag-*.conf\n", d.display()),
        );
        write(d, "frag-1.conf", "conn b\n");
        write(d, "frag-2.conf", "conn c\n");
        let first = Loader::for_path(d.join("root.conf")).load().unwrap();
        let second = Loader::for_path(d.join("root.conf")).load().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
