//! Generic document tree. This is the shape every parsed YAML or JSON document
//! takes before and after expansion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Number, Value};
use std::{
    fmt::{self, Display},
    hash::{DefaultHasher, Hash, Hasher},
    mem,
};

/// Mapping node. Insertion order is retained so that traversal and output
/// follow the order of the source document, but it does not factor into
/// equality.
pub type Mapping = IndexMap<Node, Node>;

/// A node in a document tree. There are exactly three shapes a node can take;
/// everything a YAML or JSON parser can produce maps onto one of them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// Empty mapping, which is what an empty document parses to
    pub fn empty() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// What kind of node is this? Used for error messages
    pub fn kind(&self) -> Kind {
        match self {
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Scalar(scalar) => scalar.kind(),
        }
    }

    /// Get the inner string, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        if let Self::Scalar(Scalar::String(s)) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Get the inner mapping, if this is a mapping
    pub fn as_mapping(&self) -> Option<&Mapping> {
        if let Self::Mapping(mapping) = self {
            Some(mapping)
        } else {
            None
        }
    }

    /// Get a short human-readable label for this node, for use when it
    /// appears as a mapping key in error messages. Scalars are printed in
    /// full; collections could be large so we just give the kind.
    pub(crate) fn key_label(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.to_string(),
            Self::Mapping(_) | Self::Sequence(_) => {
                format!("<{}>", self.kind())
            }
        }
    }
}

/// Equality ignores mapping order, so hashing has to as well. Each entry is
/// hashed on its own and the results are combined with XOR, which is
/// commutative.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Mapping(mapping) => {
                let combined = mapping.iter().fold(0u64, |acc, entry| {
                    let mut hasher = DefaultHasher::new();
                    entry.hash(&mut hasher);
                    acc ^ hasher.finish()
                });
                state.write_usize(mapping.len());
                state.write_u64(combined);
            }
            Self::Sequence(sequence) => sequence.hash(state),
            Self::Scalar(scalar) => scalar.hash(state),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_owned()).into()
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Scalar::String(value).into()
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Vec<Node>> for Node {
    fn from(sequence: Vec<Node>) -> Self {
        Self::Sequence(sequence)
    }
}

impl FromIterator<(Node, Node)> for Node {
    fn from_iter<T: IntoIterator<Item = (Node, Node)>>(iter: T) -> Self {
        Self::Mapping(iter.into_iter().collect())
    }
}

/// Convert from the parser's representation. Tags carry no meaning for
/// references, so they are dropped and the tagged value is kept.
impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Scalar::Null.into(),
            Value::Bool(b) => Scalar::Bool(b).into(),
            Value::Number(number) => Scalar::Number(number).into(),
            Value::String(s) => Scalar::String(s).into(),
            Value::Sequence(sequence) => {
                Self::Sequence(sequence.into_iter().map(Self::from).collect())
            }
            Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(key, value)| (Self::from(key), Self::from(value)))
                .collect(),
            Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Mapping(mapping) => Value::Mapping(
                mapping
                    .into_iter()
                    .map(|(key, value)| (Value::from(key), Value::from(value)))
                    .collect(),
            ),
            Node::Sequence(sequence) => Value::Sequence(
                sequence.into_iter().map(Value::from).collect(),
            ),
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Node::Scalar(Scalar::Number(number)) => Value::Number(number),
            Node::Scalar(Scalar::String(s)) => Value::String(s),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Mapping(mapping) => serializer.collect_map(mapping),
            Self::Sequence(sequence) => serializer.collect_seq(sequence),
            Self::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

/// Deserialize via the YAML value type, which accepts anything a
/// self-describing format can produce
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// A leaf value. Scalars are immutable, so they can be cloned freely into the
/// expanded output.
#[derive(Clone, Debug, Hash, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

// YAML has a single NaN, and the parser treats all NaNs as equal, so number
// equality is reflexive
impl Eq for Scalar {}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Boolean,
            Self::Number(_) => Kind::Number,
            Self::String(_) => Kind::String,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(number) => number.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

/// The type of a node, without its contents
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Kind {
    #[display("mapping")]
    Mapping,
    #[display("sequence")]
    Sequence,
    #[display("string")]
    String,
    #[display("number")]
    Number,
    #[display("boolean")]
    Boolean,
    #[display("null")]
    Null,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document;
    use indexmap::indexmap;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::hash::BuildHasher;

    /// Mapping order does not affect equality or hashing
    #[test]
    fn test_mapping_order() {
        let a = document::load_str("{a: 1, b: [2, 3]}").unwrap();
        let b = document::load_str("{b: [2, 3], a: 1}").unwrap();
        assert_eq!(a, b);
        let state = std::hash::RandomState::new();
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
    }

    /// Sequence order *does* matter
    #[test]
    fn test_sequence_order() {
        let a = document::load_str("[1, 2]").unwrap();
        let b = document::load_str("[2, 1]").unwrap();
        assert_ne!(a, b);
    }

    #[rstest]
    #[case::null("~", Kind::Null)]
    #[case::boolean("true", Kind::Boolean)]
    #[case::integer("3", Kind::Number)]
    #[case::float("3.5", Kind::Number)]
    #[case::string("hello", Kind::String)]
    #[case::quoted_number("'3'", Kind::String)]
    #[case::sequence("[1]", Kind::Sequence)]
    #[case::mapping("{a: 1}", Kind::Mapping)]
    fn test_kind(#[case] yaml: &str, #[case] expected: Kind) {
        assert_eq!(document::load_str(yaml).unwrap().kind(), expected);
    }

    /// Tags are dropped during conversion, keeping the inner value
    #[test]
    fn test_from_tagged() {
        let node = document::load_str("value: !custom {a: 1}").unwrap();
        let expected: Node = indexmap! {
            Node::from("value") => Node::from(indexmap! {
                Node::from("a") => document::load_str("1").unwrap(),
            }),
        }
        .into();
        assert_eq!(node, expected);
    }

    /// Converting to the parser's representation and back is lossless
    #[test]
    fn test_value_conversion() {
        let node = document::load_str(
            "{s: text, n: 1.5, i: -3, b: false, z: null, seq: [1, {k: v}], 4: x}",
        )
        .unwrap();
        let value = Value::from(node.clone());
        assert_eq!(Node::from(value), node);
    }

    /// Nodes can be deserialized directly, from YAML or JSON
    #[test]
    fn test_deserialize() {
        let expected: Node = indexmap! {
            Node::from("tags") => Node::from(vec![
                Node::from("good"),
                Scalar::Null.into(),
            ]),
        }
        .into();
        let yaml: Node = serde_yaml::from_str("tags: [good, null]").unwrap();
        let json: Node =
            serde_json::from_str(r#"{"tags": ["good", null]}"#).unwrap();
        assert_eq!(yaml, expected);
        assert_eq!(json, expected);
    }

    #[rstest]
    #[case::string(Node::from("name"), "name")]
    #[case::number(document::load_str("200").unwrap(), "200")]
    #[case::null(Scalar::Null.into(), "null")]
    #[case::sequence(Node::Sequence(vec![]), "<sequence>")]
    #[case::mapping(Node::empty(), "<mapping>")]
    fn test_key_label(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(node.key_label(), expected);
    }
}
