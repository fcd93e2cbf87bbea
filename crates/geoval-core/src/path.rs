//! # Diagnostic Paths
//!
//! Every diagnostic is anchored at a location in the input document. A
//! [`JsonPath`] is the sequence of object members and array indices walked
//! from the document root to that location.
//!
//! Two renderings are provided:
//!
//! - `Display`: dotted members with bracketed indices, e.g.
//!   `features[1].geometry.coordinates[0]`. The empty path displays as
//!   `(root)`.
//! - [`JsonPath::to_pointer`]: RFC 6901 JSON Pointer, e.g.
//!   `/features/1/geometry/coordinates/0`.

use std::fmt;

use serde::{Serialize, Serializer};

/// A single step in a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member name.
    Member(String),
    /// An array index.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Member(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A location inside a JSON document, relative to the document root.
///
/// Paths are immutable once built; [`JsonPath::member`] and
/// [`JsonPath::index`] return extended copies so that a validator can hand
/// a child path to a nested call without disturbing its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a copy of this path extended by an object member.
    pub fn member(&self, name: &str) -> Self {
        self.child(PathSegment::Member(name.to_string()))
    }

    /// Returns a copy of this path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    /// Prefix this path with `base`, producing `base` followed by `self`.
    ///
    /// Used to re-root diagnostics produced by the root-relative position
    /// and bbox models.
    pub fn rebase(&self, base: &JsonPath) -> Self {
        let mut segments = base.segments.clone();
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments from root to leaf.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments in the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true when the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as an RFC 6901 JSON Pointer.
    ///
    /// The root renders as the empty string. `~` and `/` inside member names
    /// are escaped as `~0` and `~1`.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Member(name) => {
                    out.push_str(&name.replace('~', "~0").replace('/', "~1"));
                }
                PathSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Member(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_displays_as_marker() {
        assert_eq!(JsonPath::root().to_string(), "(root)");
        assert_eq!(JsonPath::root().to_pointer(), "");
        assert!(JsonPath::root().is_root());
    }

    #[test]
    fn display_mixes_members_and_indices() {
        let path = JsonPath::root()
            .member("features")
            .index(1)
            .member("geometry")
            .member("coordinates")
            .index(0);
        assert_eq!(path.to_string(), "features[1].geometry.coordinates[0]");
        assert_eq!(path.to_pointer(), "/features/1/geometry/coordinates/0");
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn leading_index_has_no_dot() {
        let path = JsonPath::root().index(3).member("type");
        assert_eq!(path.to_string(), "[3].type");
    }

    #[test]
    fn pointer_escapes_reserved_characters() {
        let path = JsonPath::root().member("a/b").member("c~d");
        assert_eq!(path.to_pointer(), "/a~1b/c~0d");
    }

    #[test]
    fn child_paths_do_not_alias_parent() {
        let parent = JsonPath::root().member("geometry");
        let child = parent.member("coordinates");
        assert_eq!(parent.to_string(), "geometry");
        assert_eq!(child.to_string(), "geometry.coordinates");
    }

    #[test]
    fn rebase_prefixes_base() {
        let relative: JsonPath = [PathSegment::Index(2)].into_iter().collect();
        let base = JsonPath::root().member("bbox");
        assert_eq!(relative.rebase(&base).to_string(), "bbox[2]");
    }

    #[test]
    fn serializes_as_display_string() {
        let path = JsonPath::root().member("features").index(0);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"features[0]\"");
    }
}
