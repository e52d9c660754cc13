use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Error raised by path parsing and by [`crate::path::set`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The empty string is not a path.
    #[error("path must be non-empty")]
    Empty,

    /// A path such as `a..b` or `a.` contains an empty segment.
    #[error("path \"{path}\" contains an empty segment")]
    EmptySegment {
        /// The offending path text.
        path: String,
    },

    /// A primitive value sits where a container is required.
    #[error("cannot descend into {found} at \"{at}\" while setting \"{path}\"")]
    Conflict {
        /// Full path being written.
        path: String,
        /// Prefix where the primitive was found.
        at: String,
        /// JSON kind of the primitive.
        found: &'static str,
    },

    /// A non-numeric segment was applied to an array.
    #[error("segment \"{segment}\" is not an array index at \"{at}\" while setting \"{path}\"")]
    KeyOnArray {
        /// Full path being written.
        path: String,
        /// Prefix naming the array.
        at: String,
        /// The non-numeric segment.
        segment: String,
    },

    /// An index lies past the end of an array. Writes may only replace or append.
    #[error("index {index} is past the end of \"{at}\" (len {len}) while setting \"{path}\"")]
    IndexOutOfRange {
        /// Full path being written.
        path: String,
        /// Prefix naming the array.
        at: String,
        /// Requested position.
        index: usize,
        /// Array length at the time of the write.
        len: usize,
    },
}

/// One parsed path segment.
///
/// A segment is an [`Segment::Index`] when its text is a canonical non-negative integer
/// (`"0"`, `"12"`, but not `"01"` or `"-1"`). Index segments still address object members by
/// their decimal text, so `{"3": x}` is reachable through `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if is_canonical_index(raw)
            && let Ok(i) = raw.parse::<usize>()
        {
            return Self::Index(i);
        }
        Self::Key(raw.to_owned())
    }

    /// Member-name form of this segment.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Key(k) => Cow::Borrowed(k.as_str()),
            Self::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// Return `true` for index segments.
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

fn is_canonical_index(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

/// A parsed, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath {
    segments: SmallVec<[Segment; 6]>,
}

impl DottedPath {
    /// Parse `"a.b.3.c"` into segments.
    ///
    /// Rejects the empty string and empty segments.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = SmallVec::new();
        for raw in text.split('.') {
            if raw.is_empty() {
                return Err(PathError::EmptySegment {
                    path: text.to_owned(),
                });
            }
            segments.push(Segment::parse(raw));
        }
        Ok(Self { segments })
    }

    /// Build a path from already-typed segments. Returns `None` for an empty list.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Option<Self> {
        let segments: SmallVec<[Segment; 6]> = segments.into_iter().collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Segments in walk order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment (the owning block name for schema paths).
    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    /// Number of segments (always >= 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path without its last segment, or `None` for single-segment paths.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Self::from_segments(rest.iter().cloned())
    }

    /// Dotted text of the first `depth` segments; `<root>` for zero.
    pub(crate) fn prefix_text(&self, depth: usize) -> String {
        if depth == 0 {
            return "<root>".to_owned();
        }
        join(&self.segments[..depth.min(self.segments.len())])
    }
}

fn join(segments: &[Segment]) -> String {
    let mut s = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            s.push('.');
        }
        s.push_str(&seg.as_key());
    }
    s
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

impl FromStr for DottedPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
