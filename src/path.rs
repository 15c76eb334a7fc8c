//! Document locations.
//!
//! A [`Path`] is replayed from the document root one segment at a time: a key segment looks up
//! a mapping entry, an index segment looks up a sequence element.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered segments from the root (root-nearest first). The empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Everything but the last segment (the container of the addressed value).
    pub fn parent(&self) -> Option<Path> {
        let (_, head) = self.segments.split_last()?;
        Some(Path::new(head.to_vec()))
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> Path {
        Path::new(self.segments[..len.min(self.segments.len())].to_vec())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path::new(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(k) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(k)?;
                }
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Build a [`Path`] from keys and indices: `bim_path!["model", "tables", 0, "name"]`.
#[macro_export]
macro_rules! bim_path {
    () => { $crate::Path::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::Path::new(vec![$($crate::PathSegment::from($seg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::{Path, PathSegment};

    #[test]
    fn display_renders_dotted_keys_and_bracketed_indices() {
        let p = bim_path!["model", "tables", 0usize, "name"];
        assert_eq!(p.to_string(), "model.tables[0].name");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn parent_drops_last_segment() {
        let p = bim_path!["model", "tables", 2usize];
        assert_eq!(p.parent(), Some(bim_path!["model", "tables"]));
        assert_eq!(p.last(), Some(&PathSegment::Index(2)));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn collects_from_segments() {
        let p: Path = vec![PathSegment::key("a"), PathSegment::Index(1)]
            .into_iter()
            .collect();
        assert_eq!(p, bim_path!["a", 1usize]);
        assert_eq!(p.prefix(1), bim_path!["a"]);
        assert_eq!(p.prefix(9), p);
    }
}
