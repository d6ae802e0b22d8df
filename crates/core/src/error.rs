use crate::{Kind, Node, Pointer};
use itertools::Itertools;
use std::fmt::{self, Display};
use thiserror::Error;

/// An error that aborted an expansion, paired with the location in the
/// document where it occurred
#[derive(Debug, Error)]
#[error("Error expanding document at {location}")]
pub struct ExpandError {
    #[source]
    pub kind: ExpandErrorKind,
    /// Location of the failure within the *expanded* tree. Once a reference
    /// has been followed, the path continues inside the referenced value, as
    /// if it had been written inline.
    pub location: NodePath,
}

impl ExpandError {
    /// Move the inner error out
    pub fn into_kind(self) -> ExpandErrorKind {
        self.kind
    }

    /// Prefix the error location with one more segment. Errors are created
    /// at the deepest point of the traversal, then each level on the way back
    /// up adds its own segment.
    pub(crate) fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.location.segments.insert(0, segment.into());
        self
    }
}

impl From<ExpandErrorKind> for ExpandError {
    fn from(kind: ExpandErrorKind) -> Self {
        Self {
            kind,
            location: NodePath::default(),
        }
    }
}

impl From<PointerError> for ExpandError {
    fn from(error: PointerError) -> Self {
        ExpandErrorKind::from(error).into()
    }
}

/// The different ways an expansion can fail
#[derive(Debug, Error)]
pub enum ExpandErrorKind {
    /// `$ref` value is not a string, or is not a root-relative pointer
    #[error(transparent)]
    InvalidPointer(#[from] PointerError),

    /// A pointer segment names a key that the mapping doesn't have
    #[error("Cannot resolve `{pointer}`: no such key `{segment}`")]
    PointerNotFound { pointer: Pointer, segment: String },

    /// A pointer segment was applied to a sequence or scalar
    #[error(
        "Cannot resolve `{pointer}`: expected a mapping to look up \
        `{segment}` in, but found {actual}"
    )]
    PointerTypeMismatch {
        pointer: Pointer,
        segment: String,
        actual: Kind,
    },

    /// A reference was reached while already resolving that same reference.
    /// The chain holds every reference in flight, in the order they were
    /// entered, with the repeated reference appended once more at the end.
    #[error("$ref cycle detected: {}", .chain.iter().format(" -> "))]
    CycleDetected { chain: Vec<Pointer> },

    /// A `$ref` mapping has other keys besides `$ref`, and the expander is
    /// configured to reject those
    #[error(
        "Reference `{pointer}` has sibling keys {}; a `$ref` mapping may not \
        contain any other keys",
        .keys.iter().format_with(", ", |key, f| f(&format_args!("`{key}`"))),
    )]
    ReferenceWithSiblings { pointer: Pointer, keys: Vec<String> },
}

/// Error parsing the value of a `$ref` key as a [Pointer]
#[derive(Debug, Error, PartialEq)]
pub enum PointerError {
    /// Value isn't a string, so it can't be a pointer
    #[error("Invalid `$ref` value: expected string, received {0}")]
    NotAString(Kind),

    /// The value doesn't start with the root marker `#`, or has something
    /// other than `/` after it. This covers external documents (`file.yml#/a`)
    /// and fragment anchors (`#anchor`).
    #[error(
        "Invalid `$ref` value `{0}`: only pointers relative to the document \
        root (`#/...`) are supported"
    )]
    NotRootRelative(String),

    /// JSON Pointer escape sequences (`~0` and `~1`) are not supported. We
    /// reject them rather than treat them as literal text, which would
    /// silently resolve to the wrong key.
    #[error(
        "Invalid `$ref` value `{0}`: escape sequences `~0` and `~1` are not \
        supported"
    )]
    UnsupportedEscape(String),
}

/// A path to a node within a document, used to report error locations
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// One step in a [NodePath]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    /// Mapping entry, labelled by its key
    Key(String),
    /// Sequence element
    Index(usize),
}

impl From<&Node> for PathSegment {
    fn from(key: &Node) -> Self {
        Self::Key(key.key_label())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}
