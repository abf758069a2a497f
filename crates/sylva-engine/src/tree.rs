//! Owned syntax trees and their canonical bracketed rendering.

use std::fmt;

use crate::codec;
use crate::error::DecodeError;

/// A constituency tree.
///
/// Leaves carry words and have no children. A preterminal is a node whose
/// only child is a leaf; its label is the part-of-speech tag. Every other
/// node is a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Tree {
    /// Builds a leaf holding a word.
    #[must_use]
    pub fn leaf(word: impl Into<String>) -> Self {
        Self {
            label: word.into(),
            children: Vec::new(),
        }
    }

    /// Builds a preterminal: a tag over a single word.
    #[must_use]
    pub fn preterminal(tag: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            label: tag.into(),
            children: vec![Self::leaf(word)],
        }
    }

    /// Builds a phrase node over the given children.
    #[must_use]
    pub fn phrase(label: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Node label: the word for leaves, the category otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Direct children in surface order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Consumes the node and returns its label and children.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Self>) {
        (self.label, self.children)
    }

    /// Returns `true` for word nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` for a tag directly above a single word.
    #[must_use]
    pub fn is_preterminal(&self) -> bool {
        matches!(self.children.as_slice(), [only] if only.is_leaf())
    }

    /// Words of the tree in surface order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        let mut words = Vec::new();
        self.collect_leaves(&mut words);
        words
    }

    fn collect_leaves<'a>(&'a self, words: &mut Vec<&'a str>) {
        if self.is_leaf() {
            words.push(&self.label);
            return;
        }
        for child in &self.children {
            child.collect_leaves(words);
        }
    }

    /// `(tag, word)` pairs in surface order.
    #[must_use]
    pub fn tagged_words(&self) -> Vec<(&str, &str)> {
        let mut tagged = Vec::new();
        self.collect_tagged(&mut tagged);
        tagged
    }

    fn collect_tagged<'a>(&'a self, tagged: &mut Vec<(&'a str, &'a str)>) {
        if let [word] = self.children.as_slice()
            && word.is_leaf()
        {
            tagged.push((&self.label, &word.label));
            return;
        }
        for child in &self.children {
            child.collect_tagged(tagged);
        }
    }

    /// Largest number of children found on any node.
    #[must_use]
    pub fn max_branching(&self) -> usize {
        self.children
            .iter()
            .map(Self::max_branching)
            .fold(self.children.len(), usize::max)
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Encodes the tree in the versioned binary format.
    #[must_use]
    pub fn to_binary(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Decodes a tree from the versioned binary format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the bytes are not a well-formed encoding.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(bytes)
    }
}

impl fmt::Display for Tree {
    /// Renders the Penn bracketed form, e.g. `(NP (DT the) (NN dog))`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            return formatter.write_str(&self.label);
        }
        write!(formatter, "({}", self.label)?;
        for child in &self.children {
            write!(formatter, " {child}")?;
        }
        formatter.write_str(")")
    }
}
