//! Paths into a serialized document and their JSON pointer form.
//!
//! A [`JsonPath`] is an ordered list of segments. Its pointer form joins the
//! segments with `/`, escaping `~` as `~0` and `/` as `~1` inside each one.
//! The empty path addresses the document root and its pointer is `""`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Error while parsing a JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// A non-empty pointer must start with `/`.
    #[error("JSON pointer '{pointer}' must be empty or start with '/'")]
    MissingLeadingSlash {
        /// The pointer as given.
        pointer: String,
    },

    /// `~` not followed by `0` or `1`.
    #[error("invalid escape at byte {position} in JSON pointer '{pointer}'")]
    InvalidEscape {
        /// The pointer as given.
        pointer: String,
        /// Byte offset of the `~`.
        position: usize,
    },
}

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member.
    Field(String),
    /// An array element.
    Index(usize),
}

impl PathSegment {
    /// The escaped form of this segment, without the leading `/`.
    pub fn escaped(&self) -> String {
        match self {
            Self::Field(name) => escape(name),
            Self::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location inside a JSON document.
///
/// # Example
///
/// ```ignore
/// let path = JsonPath::from_segments(["filters", "0"]).field("a/b");
/// assert_eq!(path.to_pointer(), "/filters/0/a~1b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments, outermost first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// This path extended by an object member.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Field(name.into()))
    }

    /// This path extended by an array element.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// This path extended by `segment`.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The escaped JSON pointer for this path.
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            pointer.push_str(&segment.escaped());
        }
        pointer
    }

    /// Parse a JSON pointer.
    ///
    /// Segments spelled as canonical non-negative integers become
    /// [`PathSegment::Index`]; pointer lookup treats them the same as a
    /// field of that name when the parent is an object.
    pub fn parse(pointer: &str) -> Result<Self, PointerError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash {
                pointer: pointer.to_string(),
            });
        };

        let mut segments = Vec::new();
        let mut offset = 1;
        for raw in rest.split('/') {
            let name = unescape(raw).map_err(|at| PointerError::InvalidEscape {
                pointer: pointer.to_string(),
                position: offset + at,
            })?;
            segments.push(match as_index(&name) {
                Some(index) => PathSegment::Index(index),
                None => PathSegment::Field(name),
            });
            offset += raw.len() + 1;
        }
        Ok(Self { segments })
    }

    /// The value at this path, if any.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        document.pointer(&self.to_pointer())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl From<&JsonPath> for JsonPath {
    fn from(path: &JsonPath) -> Self {
        path.clone()
    }
}

impl<S: Into<PathSegment>, const N: usize> From<[S; N]> for JsonPath {
    fn from(segments: [S; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl<S: Into<PathSegment>> From<Vec<S>> for JsonPath {
    fn from(segments: Vec<S>) -> Self {
        Self::from_segments(segments)
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

fn escape(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

/// Undo pointer escaping; on failure returns the offset of the bad `~`.
fn unescape(raw: &str) -> Result<String, usize> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            _ => return Err(i),
        }
    }
    Ok(out)
}

fn as_index(name: &str) -> Option<usize> {
    let canonical = name == "0" || (!name.starts_with('0') && !name.is_empty());
    if canonical && name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root() {
        let root = JsonPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_pointer(), "");
        assert_eq!(JsonPath::parse("").unwrap(), root);
    }

    #[test]
    fn test_escaping() {
        let path = JsonPath::from_segments(["a/b", "m~n", "plain"]);
        assert_eq!(path.to_pointer(), "/a~1b/m~0n/plain");
        assert_eq!(JsonPath::from_segments(["~1"]).to_pointer(), "/~01");
        assert_eq!(JsonPath::parse("/~01").unwrap(), JsonPath::from_segments(["~1"]));
    }

    #[test]
    fn test_parse_inverse() {
        let path = JsonPath::root().field("filters").index(3).field("a/b~");
        assert_eq!(JsonPath::parse(&path.to_pointer()).unwrap(), path);
        assert_eq!(
            JsonPath::parse("/01/1").unwrap().segments(),
            [PathSegment::Field("01".into()), PathSegment::Index(1)]
        );
        assert_eq!(JsonPath::parse("/").unwrap().segments(), [PathSegment::Field(String::new())]);
    }

    #[test]
    fn test_parse_rejects() {
        assert!(matches!(
            JsonPath::parse("timeout"),
            Err(PointerError::MissingLeadingSlash { .. })
        ));
        assert_eq!(
            JsonPath::parse("/ok/a~2"),
            Err(PointerError::InvalidEscape {
                pointer: "/ok/a~2".into(),
                position: 5,
            })
        );
        assert!(JsonPath::parse("/trailing~").is_err());
    }

    #[test]
    fn test_resolve() {
        let doc = json!({"a/b": [10, {"c": null}], "": 1});
        assert_eq!(JsonPath::from_segments(["a/b"]).index(0).resolve(&doc), Some(&json!(10)));
        let nested = JsonPath::from_segments(["a/b"]).index(1).field("c");
        assert_eq!(nested.resolve(&doc), Some(&Value::Null));
        assert_eq!(JsonPath::from_segments([""]).resolve(&doc), Some(&json!(1)));
        assert!(JsonPath::from_segments(["missing"]).resolve(&doc).is_none());
        assert_eq!(JsonPath::root().resolve(&doc), Some(&doc));
    }
}
