//! Head rules shared by the binarizer and the dependency extractor.

use crate::tree::Tree;

pub(crate) fn is_punctuation(tag: &str) -> bool {
    matches!(
        tag,
        "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "#" | "$"
    )
}

pub(crate) fn is_noun(tag: &str) -> bool {
    matches!(tag, "NN" | "NNS" | "NNP" | "NNPS")
}

pub(crate) fn is_adjective(tag: &str) -> bool {
    matches!(tag, "JJ" | "JJR" | "JJS")
}

pub(crate) fn is_adverb(tag: &str) -> bool {
    matches!(tag, "RB" | "RBR" | "RBS")
}

pub(crate) fn is_verbal(tag: &str) -> bool {
    tag.starts_with("VB") || tag == "MD"
}

/// Tag of a preterminal node, `None` for phrases and leaves.
pub(crate) fn preterminal_tag(node: &Tree) -> Option<&str> {
    node.is_preterminal().then(|| node.label())
}

fn tagged(node: &Tree, predicate: impl Fn(&str) -> bool) -> bool {
    preterminal_tag(node).is_some_and(predicate)
}

fn first_where(children: &[Tree], predicate: impl Fn(&Tree) -> bool) -> Option<usize> {
    children.iter().position(predicate)
}

fn last_where(children: &[Tree], predicate: impl Fn(&Tree) -> bool) -> Option<usize> {
    children.iter().rposition(predicate)
}

/// Index of the head child of `node`.
///
/// Leaves and preterminals report `0`. Unknown categories fall back to the
/// first child.
pub(crate) fn head_child(node: &Tree) -> usize {
    let children = node.children();
    let found = match node.label() {
        "S" | "FRAG" => first_where(children, |child| child.label() == "VP")
            .or_else(|| last_where(children, |child| child.label() == "NP"))
            .or_else(|| first_where(children, |child| !tagged(child, is_punctuation))),
        "VP" => verb_group_head(children)
            .or_else(|| first_where(children, |child| child.label() == "VP")),
        "NP" => last_where(children, |child| {
            tagged(child, |tag| {
                is_noun(tag) || matches!(tag, "PRP" | "CD" | "EX" | "WP")
            })
        })
        .or_else(|| last_where(children, |child| child.label() == "NP"))
        .or_else(|| last_where(children, |child| !tagged(child, is_punctuation))),
        "PP" => first_where(children, |child| tagged(child, |tag| matches!(tag, "IN" | "TO"))),
        "ADJP" => last_where(children, |child| tagged(child, is_adjective)),
        "ADVP" => last_where(children, |child| tagged(child, is_adverb)),
        _ => None,
    };
    found.unwrap_or(0)
}

/// The last verb of the leading auxiliary and adverb run: `will not go` heads on `go`.
fn verb_group_head(children: &[Tree]) -> Option<usize> {
    children
        .iter()
        .take_while(|child| tagged(child, |tag| is_verbal(tag) || is_adverb(tag) || tag == "TO"))
        .enumerate()
        .filter(|(_, child)| tagged(child, is_verbal))
        .map(|(index, _)| index)
        .last()
}
