use crate::{ExpandErrorKind, Mapping, Node, PointerError, Scalar};
use serde_yaml::Number;
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use winnow::{
    ModalResult, Parser,
    combinator::{preceded, repeat},
    error::EmptyError,
    token::take_while,
};

/// Marker at the start of every pointer, denoting the document root
const ROOT_MARKER: char = '#';
const SEPARATOR: char = '/';

/// A pointer to a node within the document, relative to the document root.
/// This is the parsed form of a `$ref` value such as `#/definitions/Pet`.
/// Each segment is a literal mapping key.
///
/// Pointers are stored in a way that displays back to *exactly* the string
/// they were parsed from, so comparing two pointers is equivalent to comparing
/// their source strings.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// Parse the value assigned to a `$ref` key. The value must be a string
    /// that parses as a pointer.
    pub fn from_reference(value: &Node) -> Result<Self, PointerError> {
        value
            .as_str()
            .ok_or_else(|| PointerError::NotAString(value.kind()))?
            .parse()
    }

    /// Literal key segments, in traversal order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Follow this pointer from the root of a document, returning the node at
    /// the end. The target can be any kind of node.
    pub fn resolve<'a>(
        &self,
        root: &'a Node,
    ) -> Result<&'a Node, ExpandErrorKind> {
        self.segments.iter().try_fold(root, |node, segment| {
            // We need to go deeper. Node better be something we can drill
            // into
            let Node::Mapping(mapping) = node else {
                return Err(ExpandErrorKind::PointerTypeMismatch {
                    pointer: self.clone(),
                    segment: segment.clone(),
                    actual: node.kind(),
                });
            };
            lookup(mapping, segment).ok_or_else(|| {
                ExpandErrorKind::PointerNotFound {
                    pointer: self.clone(),
                    segment: segment.clone(),
                }
            })
        })
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        /// Parse everything after the root marker. Each segment is preceded by
        /// a separator, and may be empty
        fn segments(input: &mut &str) -> ModalResult<Vec<String>, EmptyError> {
            let segment =
                preceded(SEPARATOR, take_while(0.., |c| c != SEPARATOR));

            repeat(0.., segment)
                .fold(Vec::new, |mut acc, item: &str| {
                    acc.push(item.to_owned());
                    acc
                })
                .parse_next(input)
        }

        let segments = preceded(ROOT_MARKER, segments)
            .parse(s)
            .map_err(|_| PointerError::NotRootRelative(s.to_owned()))?;

        if segments
            .iter()
            .any(|segment| segment.contains("~0") || segment.contains("~1"))
        {
            return Err(PointerError::UnsupportedEscape(s.to_owned()));
        }

        Ok(Self { segments })
    }
}

impl Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ROOT_MARKER}")?;
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

/// Find a mapping value by pointer segment. String keys are matched literally.
/// If there's no string match and the segment is the canonical form of an
/// integer, fall back to an integer key. Unquoted YAML keys such as `200:` are
/// parsed as integers, but a pointer can't make that distinction.
fn lookup<'a>(mapping: &'a Mapping, segment: &str) -> Option<&'a Node> {
    mapping
        .get(&Node::from(segment))
        .or_else(|| mapping.get(&integer_key(segment)?))
}

/// Parse a pointer segment as an integer key. Non-canonical forms such as
/// `007` or `+1` are rejected, because the parser would never have produced
/// them from an integer key.
fn integer_key(segment: &str) -> Option<Node> {
    let integer: i64 = segment.parse().ok()?;
    if integer.to_string() != segment {
        return None;
    }
    // Non-negative integers are stored as unsigned by the parser, and numbers
    // only compare equal within the same representation
    let number = u64::try_from(integer)
        .map(Number::from)
        .unwrap_or_else(|_| Number::from(integer));
    Some(Scalar::Number(number).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, document};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use swagexpand_util::assert_matches;

    #[rstest]
    #[case::root("#", &[])]
    #[case::single("#/definitions", &["definitions"])]
    #[case::nested("#/definitions/Pet", &["definitions", "Pet"])]
    #[case::numeric("#/responses/200", &["responses", "200"])]
    #[case::trailing_separator("#/a/", &["a", ""])]
    #[case::empty_segment("#/a//b", &["a", "", "b"])]
    #[case::special_characters("#/paths/{id} pet", &["paths", "{id} pet"])]
    #[case::lone_tilde("#/a~b", &["a~b"])]
    fn test_parse(#[case] input: &str, #[case] expected: &[&str]) {
        let pointer = input.parse::<Pointer>().unwrap();
        assert_eq!(pointer.segments().collect::<Vec<_>>(), expected);
        // Display must reproduce the input exactly
        assert_eq!(pointer.to_string(), input);
    }

    #[rstest]
    #[case::empty("", PointerError::NotRootRelative("".into()))]
    #[case::no_marker(
        "definitions/Pet",
        PointerError::NotRootRelative("definitions/Pet".into())
    )]
    #[case::leading_slash(
        "/definitions/Pet",
        PointerError::NotRootRelative("/definitions/Pet".into())
    )]
    #[case::external_file(
        "other.yml#/definitions/Pet",
        PointerError::NotRootRelative("other.yml#/definitions/Pet".into())
    )]
    #[case::url(
        "https://example.com/schema.json#/Pet",
        PointerError::NotRootRelative(
            "https://example.com/schema.json#/Pet".into()
        )
    )]
    #[case::anchor("#pet", PointerError::NotRootRelative("#pet".into()))]
    #[case::escape_slash(
        "#/paths/~1pets",
        PointerError::UnsupportedEscape("#/paths/~1pets".into())
    )]
    #[case::escape_tilde(
        "#/a~0b",
        PointerError::UnsupportedEscape("#/a~0b".into())
    )]
    fn test_parse_error(#[case] input: &str, #[case] expected: PointerError) {
        assert_eq!(input.parse::<Pointer>().unwrap_err(), expected);
    }

    #[rstest]
    #[case::string("\"#/a\"", Ok("#/a"))]
    #[case::integer("3", Err(PointerError::NotAString(Kind::Number)))]
    #[case::null("null", Err(PointerError::NotAString(Kind::Null)))]
    #[case::mapping("{a: b}", Err(PointerError::NotAString(Kind::Mapping)))]
    fn test_from_reference(
        #[case] value: &str,
        #[case] expected: Result<&str, PointerError>,
    ) {
        let value = document::load_str(value).unwrap();
        let actual = Pointer::from_reference(&value)
            .map(|pointer| pointer.to_string());
        assert_eq!(actual, expected.map(String::from));
    }

    #[rstest]
    #[case::mapping("#/definitions/Pet", "{type: object}")]
    #[case::scalar("#/definitions/Pet/type", "object")]
    #[case::integer_key("#/responses/200", "{description: ok}")]
    #[case::string_key_first("#/codes/1", "string")]
    #[case::negative_integer_key("#/codes/-1", "negative")]
    #[case::empty_key("#/codes/", "empty")]
    fn test_resolve(#[case] pointer: &str, #[case] expected: &str) {
        let root = document::load_str(
            r#"
            definitions:
                Pet: {type: object}
            responses:
                200: {description: ok}
            codes:
                "1": string
                1: integer
                -1: negative
                "": empty
            "#,
        )
        .unwrap();
        let pointer = pointer.parse::<Pointer>().unwrap();
        assert_eq!(
            pointer.resolve(&root).unwrap(),
            &document::load_str(expected).unwrap()
        );
    }

    /// `#` on its own points at the whole document
    #[test]
    fn test_resolve_root() {
        let root = document::load_str("{definitions: {Pet: {}}}").unwrap();
        let pointer = "#".parse::<Pointer>().unwrap();
        assert_eq!(pointer.resolve(&root).unwrap(), &root);
    }

    #[rstest]
    #[case::missing_key(
        "#/definitions/Dog",
        "Cannot resolve `#/definitions/Dog`: no such key `Dog`"
    )]
    #[case::missing_top_level(
        "#/parameters/id",
        "Cannot resolve `#/parameters/id`: no such key `parameters`"
    )]
    #[case::non_canonical_integer(
        "#/responses/0200",
        "Cannot resolve `#/responses/0200`: no such key `0200`"
    )]
    #[case::through_scalar(
        "#/definitions/Pet/type/x",
        "Cannot resolve `#/definitions/Pet/type/x`: expected a mapping to \
        look up `x` in, but found string"
    )]
    #[case::through_sequence(
        "#/tags/0",
        "Cannot resolve `#/tags/0`: expected a mapping to look up `0` in, but \
        found sequence"
    )]
    fn test_resolve_error(#[case] pointer: &str, #[case] expected_error: &str) {
        let root = document::load_str(
            "
            definitions:
                Pet: {type: object}
            responses:
                200: {description: ok}
            tags: [a, b]
            ",
        )
        .unwrap();
        let pointer = pointer.parse::<Pointer>().unwrap();
        let error = pointer.resolve(&root).unwrap_err();
        assert_eq!(error.to_string(), expected_error);
    }

    /// Resolution errors carry the full pointer and the failing segment
    #[test]
    fn test_resolve_error_fields() {
        let root = document::load_str("{a: [1]}").unwrap();
        let pointer = "#/a/b".parse::<Pointer>().unwrap();
        assert_matches!(
            &pointer.resolve(&root),
            Err(ExpandErrorKind::PointerTypeMismatch {
                pointer: p,
                segment,
                actual: Kind::Sequence,
            }) if *p == pointer && segment == "b"
        );
    }
}
