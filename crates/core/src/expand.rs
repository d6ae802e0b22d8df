//! Replace `$ref` nodes with deep copies of their targets

use crate::{ExpandError, ExpandErrorKind, Mapping, Node, Pointer};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Mapping key denoting a reference
pub const REFERENCE_KEY: &str = "$ref";

/// Expand every reference in a document with the default options. See
/// [Expander::expand].
pub fn expand(document: &Node) -> Result<Node, ExpandError> {
    Expander::default().expand(document)
}

/// What to do with a `$ref` mapping that contains other keys as well
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SiblingPolicy {
    /// Fail the expansion. A reference replaces its entire mapping, so any
    /// other keys in it would be lost.
    #[default]
    #[display("reject")]
    Reject,
    /// Ignore the other keys; the mapping is replaced by the reference target
    #[display("discard")]
    Discard,
}

/// Knobs for an [Expander]
#[derive(Clone, Debug, Default)]
pub struct ExpandOptions {
    pub siblings: SiblingPolicy,
}

/// Expands `$ref` pointers within a document. Every mapping with a `$ref` key
/// is replaced by a deep copy of the node the pointer leads to, and the copy
/// is expanded in turn. All other nodes are copied as is.
///
/// Pointers are always resolved against the root of the input document, even
/// when they're found inside a value that was itself copied in by a reference.
/// The input is never modified.
///
/// Expansion is recursive, so stack usage grows with document nesting plus
/// the length of the longest reference chain. Chains a few hundred references
/// long are fine on a default thread stack. Chains in the thousands need a
/// larger one.
#[derive(Clone, Debug, Default)]
pub struct Expander {
    options: ExpandOptions,
}

impl Expander {
    pub fn new(options: ExpandOptions) -> Self {
        Self { options }
    }

    /// Expand all references in a document, returning the expanded copy
    pub fn expand(&self, document: &Node) -> Result<Node, ExpandError> {
        debug!(siblings = %self.options.siblings, "Expanding document");
        let expanded = self
            .expansion(document)
            .copy_and_expand(&ReferenceChain::default(), document)?;
        debug!("Expansion complete");
        Ok(expanded)
    }

    /// Expand only the node at the given pointer. This behaves as though a
    /// `{$ref: <pointer>}` mapping had been found at the top of the document,
    /// so the pointer is the first entry in the reference chain. If the target
    /// refers back to itself, that's a cycle.
    pub fn expand_pointer(
        &self,
        document: &Node,
        pointer: &Pointer,
    ) -> Result<Node, ExpandError> {
        debug!(%pointer, siblings = %self.options.siblings, "Expanding pointer");
        let expanded = self
            .expansion(document)
            .follow(&ReferenceChain::default(), pointer)?;
        debug!(%pointer, "Expansion complete");
        Ok(expanded)
    }

    fn expansion<'a>(&self, root: &'a Node) -> Expansion<'a> {
        Expansion {
            root,
            siblings: self.options.siblings,
        }
    }
}

/// State for a single top-level expansion
struct Expansion<'a> {
    /// Every pointer is resolved from here
    root: &'a Node,
    siblings: SiblingPolicy,
}

impl Expansion<'_> {
    /// Build an expanded copy of a node. Errors are tagged with the location
    /// of the failure, one segment per level as they bubble back up.
    fn copy_and_expand(
        &self,
        chain: &ReferenceChain,
        node: &Node,
    ) -> Result<Node, ExpandError> {
        match node {
            Node::Mapping(mapping) => {
                if let Some(reference) =
                    mapping.get(&Node::from(REFERENCE_KEY))
                {
                    // The mapping *is* the reference, so it gets replaced
                    // wholesale
                    return self.expand_reference(chain, mapping, reference);
                }
                mapping
                    .iter()
                    .map(|(key, value)| {
                        let value = self
                            .copy_and_expand(chain, value)
                            .map_err(|error| error.within(key))?;
                        Ok((key.clone(), value))
                    })
                    .collect::<Result<Mapping, _>>()
                    .map(Node::Mapping)
            }
            Node::Sequence(sequence) => sequence
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    self.copy_and_expand(chain, item)
                        .map_err(|error| error.within(index))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Sequence),
            Node::Scalar(_) => Ok(node.clone()),
        }
    }

    /// Expand a mapping with a `$ref` key
    fn expand_reference(
        &self,
        chain: &ReferenceChain,
        mapping: &Mapping,
        reference: &Node,
    ) -> Result<Node, ExpandError> {
        let pointer = Pointer::from_reference(reference)?;

        if self.siblings == SiblingPolicy::Reject && mapping.len() > 1 {
            let keys = mapping
                .keys()
                .filter(|key| key.as_str() != Some(REFERENCE_KEY))
                .map(Node::key_label)
                .collect();
            return Err(
                ExpandErrorKind::ReferenceWithSiblings { pointer, keys }.into()
            );
        }

        self.follow(chain, &pointer)
    }

    /// Resolve a pointer and expand its target, with the pointer added to the
    /// chain for everything below it
    fn follow(
        &self,
        chain: &ReferenceChain,
        pointer: &Pointer,
    ) -> Result<Node, ExpandError> {
        chain.check(pointer)?;
        let target = pointer.resolve(self.root)?;
        let chain = chain.cons(pointer.clone());
        trace!(%pointer, depth = chain.len(), "Resolved reference");
        self.copy_and_expand(&chain, target)
    }
}

/// The references currently being resolved, outermost first. Each nested call
/// gets its own extended copy, so sibling branches of the document never see
/// each other's references.
#[derive(Debug, Default)]
struct ReferenceChain {
    pointers: Vec<Pointer>,
}

impl ReferenceChain {
    /// Fail if the pointer is already being resolved further up
    fn check(&self, pointer: &Pointer) -> Result<(), ExpandErrorKind> {
        if self.pointers.contains(pointer) {
            Err(ExpandErrorKind::CycleDetected {
                chain: self.pointers.iter().chain([pointer]).cloned().collect(),
            })
        } else {
            Ok(())
        }
    }

    /// Get a copy of this chain with another pointer on the end
    fn cons(&self, pointer: Pointer) -> Self {
        let mut pointers = self.pointers.clone();
        pointers.push(pointer);
        Self { pointers }
    }

    fn len(&self) -> usize {
        self.pointers.len()
    }
}
