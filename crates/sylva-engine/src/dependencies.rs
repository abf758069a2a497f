//! Typed dependencies derived from constituency trees.
//!
//! Each phrase contributes one relation per non-head child, pointing from
//! the phrase's head word to the child's head word. Words are numbered from
//! one in surface order; index zero is the artificial `ROOT`.

use std::collections::HashMap;
use std::fmt;

use crate::error::EngineError;
use crate::heads::{
    head_child, is_adjective, is_adverb, is_noun, is_punctuation, is_verbal, preterminal_tag,
};
use crate::tree::Tree;

/// A word together with its 1-based position; position 0 is `ROOT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexedWord {
    word: String,
    index: usize,
}

impl IndexedWord {
    /// Creates an indexed word.
    #[must_use]
    pub fn new(word: impl Into<String>, index: usize) -> Self {
        Self {
            word: word.into(),
            index,
        }
    }

    /// The artificial root governor, `ROOT-0`.
    #[must_use]
    pub fn root() -> Self {
        Self::new("ROOT", 0)
    }

    /// Surface form.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Position in the sentence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for IndexedWord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}-{}", self.word, self.index)
    }
}

/// One labelled head-dependent relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedDependency {
    relation: String,
    governor: IndexedWord,
    dependent: IndexedWord,
}

impl TypedDependency {
    /// Creates a dependency.
    #[must_use]
    pub fn new(relation: impl Into<String>, governor: IndexedWord, dependent: IndexedWord) -> Self {
        Self {
            relation: relation.into(),
            governor,
            dependent,
        }
    }

    /// Relation name, e.g. `nsubj` or `prep_in`.
    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// The head word.
    #[must_use]
    pub const fn governor(&self) -> &IndexedWord {
        &self.governor
    }

    /// The dependent word.
    #[must_use]
    pub const fn dependent(&self) -> &IndexedWord {
        &self.dependent
    }
}

impl fmt::Display for TypedDependency {
    /// Renders `relation(governor-i, dependent-j)`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}({}, {})",
            self.relation, self.governor, self.dependent
        )
    }
}

/// Basic dependencies of one sentence, ordered by dependent position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammaticalStructure {
    words: Vec<String>,
    dependencies: Vec<TypedDependency>,
}

impl GrammaticalStructure {
    /// Wraps precomputed dependencies; they are sorted by dependent index.
    #[must_use]
    pub fn new(words: Vec<String>, mut dependencies: Vec<TypedDependency>) -> Self {
        dependencies.sort_by_key(|dependency| dependency.dependent.index);
        Self {
            words,
            dependencies,
        }
    }

    /// Derives basic dependencies from a constituency tree using head rules.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ParseFailed`] when the tree is a bare word with
    /// no tag above it.
    pub fn from_tree(tree: &Tree) -> Result<Self, EngineError> {
        if tree.is_leaf() {
            return Err(EngineError::parse_failed("tree contains no tagged words"));
        }
        let mut extractor = Extractor::default();
        let root_head = extractor.visit(tree);
        extractor.arcs.push(("root", 0, root_head));

        let Extractor { words, arcs } = extractor;
        let word_at = |index: usize| -> IndexedWord {
            index
                .checked_sub(1)
                .and_then(|offset| words.get(offset))
                .map_or_else(IndexedWord::root, |word| IndexedWord::new(word.as_str(), index))
        };
        let dependencies = arcs
            .iter()
            .map(|&(relation, governor, dependent)| {
                TypedDependency::new(relation, word_at(governor), word_at(dependent))
            })
            .collect();
        Ok(Self::new(words, dependencies))
    }

    /// Words in surface order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Basic dependencies: prepositions stay words with `prep`/`pobj` arcs.
    #[must_use]
    pub fn basic(&self) -> &[TypedDependency] {
        &self.dependencies
    }

    /// Collapsed dependencies that remain a tree: each `prep` arc and the
    /// `pobj` arc below it fold into one `prep_<word>` arc, and the
    /// preposition drops out.
    #[must_use]
    pub fn collapsed_tree(&self) -> Vec<TypedDependency> {
        let prepositions: HashMap<usize, &TypedDependency> = self
            .dependencies
            .iter()
            .filter(|dependency| dependency.relation == "prep")
            .map(|dependency| (dependency.dependent.index, dependency))
            .collect();
        let folded: HashMap<usize, TypedDependency> = self
            .dependencies
            .iter()
            .filter(|dependency| dependency.relation == "pobj")
            .filter_map(|object| {
                let preposition = prepositions.get(&object.governor.index)?;
                let relation = format!("prep_{}", object.governor.word.to_lowercase());
                Some((
                    object.governor.index,
                    TypedDependency::new(
                        relation,
                        preposition.governor.clone(),
                        object.dependent.clone(),
                    ),
                ))
            })
            .collect();

        let mut collapsed: Vec<TypedDependency> = self
            .dependencies
            .iter()
            .filter(|dependency| {
                let folded_preposition =
                    dependency.relation == "prep" && folded.contains_key(&dependency.dependent.index);
                let folded_object =
                    dependency.relation == "pobj" && folded.contains_key(&dependency.governor.index);
                !(folded_preposition || folded_object)
            })
            .cloned()
            .collect();
        collapsed.extend(folded.into_values());
        collapsed.sort_by_key(|dependency| dependency.dependent.index);
        collapsed
    }
}

#[derive(Default)]
struct Extractor {
    words: Vec<String>,
    arcs: Vec<(&'static str, usize, usize)>,
}

impl Extractor {
    /// Numbers the words below `node` and returns the index of its head word.
    fn visit(&mut self, node: &Tree) -> usize {
        if node.is_leaf() {
            self.words.push(node.label().to_owned());
            return self.words.len();
        }
        if let [word] = node.children()
            && word.is_leaf()
        {
            return self.visit(word);
        }

        let heads: Vec<usize> = node.children().iter().map(|child| self.visit(child)).collect();
        let head = head_child(node);
        let Some(&governor) = heads.get(head) else {
            return heads.first().copied().unwrap_or_default();
        };
        let objects = objects_after(node, head);
        for (position, (child, &dependent)) in node.children().iter().zip(&heads).enumerate() {
            if position == head {
                continue;
            }
            let relation = relation(node, child, position, head, &objects);
            self.arcs.push((relation, governor, dependent));
        }
        governor
    }
}

fn objects_after(node: &Tree, head: usize) -> Vec<usize> {
    if node.label() != "VP" {
        return Vec::new();
    }
    node.children()
        .iter()
        .enumerate()
        .filter(|(position, child)| *position > head && child.label() == "NP")
        .map(|(position, _)| position)
        .collect()
}

fn first_word(node: &Tree) -> String {
    node.leaves()
        .first()
        .map(|word| word.to_lowercase())
        .unwrap_or_default()
}

fn is_possessor(node: &Tree) -> bool {
    node.label() == "NP"
        && node
            .children()
            .last()
            .and_then(preterminal_tag)
            .is_some_and(|tag| tag == "POS")
}

fn relation(
    parent: &Tree,
    child: &Tree,
    position: usize,
    head: usize,
    objects: &[usize],
) -> &'static str {
    let tag = preterminal_tag(child);
    if tag.is_some_and(is_punctuation) {
        return "punct";
    }
    if tag == Some("CC") {
        return "cc";
    }
    let before_head = position < head;
    match parent.label() {
        "S" | "FRAG" => match (child.label(), tag) {
            ("NP", None) if before_head => "nsubj",
            ("ADVP", None) | (_, Some("RB" | "RBR" | "RBS")) => "advmod",
            ("PP", None) => "prep",
            _ => "dep",
        },
        "VP" => verb_relation(child, tag, before_head, position, objects),
        "NP" => noun_relation(child, tag, before_head),
        "PP" => match child.label() {
            "NP" => "pobj",
            _ => "dep",
        },
        "ADJP" | "ADVP" if tag.is_some_and(is_adverb) => "advmod",
        _ => "dep",
    }
}

fn verb_relation(
    child: &Tree,
    tag: Option<&str>,
    before_head: bool,
    position: usize,
    objects: &[usize],
) -> &'static str {
    if let Some(child_tag) = tag {
        return match child_tag {
            "MD" | "TO" => "aux",
            verb if is_verbal(verb) && before_head => "aux",
            adverb if is_adverb(adverb) => {
                if matches!(first_word(child).as_str(), "not" | "n't" | "never") {
                    "neg"
                } else {
                    "advmod"
                }
            }
            _ => "dep",
        };
    }
    match child.label() {
        "NP" if !before_head => {
            if objects.len() > 1 && objects.first() == Some(&position) {
                "iobj"
            } else {
                "dobj"
            }
        }
        "PP" => "prep",
        "ADJP" => "acomp",
        "ADVP" => "advmod",
        "VP" => "xcomp",
        _ => "dep",
    }
}

fn noun_relation(child: &Tree, tag: Option<&str>, before_head: bool) -> &'static str {
    match tag {
        Some("DT" | "PDT" | "WDT") => "det",
        Some("PRP$" | "WP$") => "poss",
        Some("POS") => "possessive",
        Some("CD") => "num",
        Some(adjective) if is_adjective(adjective) => "amod",
        Some(noun) if is_noun(noun) && before_head => "nn",
        Some(_) => "dep",
        None if is_possessor(child) => "poss",
        None => match child.label() {
            "ADJP" => "amod",
            "PP" => "prep",
            _ => "dep",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre(tag: &str, word: &str) -> Tree {
        Tree::preterminal(tag, word)
    }

    fn phrase(label: &str, children: Vec<Tree>) -> Tree {
        Tree::phrase(label, children)
    }

    fn render(dependencies: &[TypedDependency]) -> Vec<String> {
        dependencies.iter().map(ToString::to_string).collect()
    }

    fn dog_chased_cat() -> Tree {
        phrase(
            "ROOT",
            vec![phrase(
                "S",
                vec![
                    phrase("NP", vec![pre("DT", "The"), pre("NN", "dog")]),
                    phrase(
                        "VP",
                        vec![
                            pre("VBD", "chased"),
                            phrase("NP", vec![pre("DT", "the"), pre("NN", "cat")]),
                        ],
                    ),
                    pre(".", "."),
                ],
            )],
        )
    }

    #[test]
    fn extracts_basic_dependencies_in_dependent_order() {
        let structure = GrammaticalStructure::from_tree(&dog_chased_cat()).expect("structure");
        assert_eq!(
            render(structure.basic()),
            vec![
                "det(dog-2, The-1)",
                "nsubj(chased-3, dog-2)",
                "root(ROOT-0, chased-3)",
                "det(cat-5, the-4)",
                "dobj(chased-3, cat-5)",
                "punct(chased-3, .-6)",
            ]
        );
        assert_eq!(structure.words().len(), 6);
    }

    #[test]
    fn collapsing_folds_prepositions_into_relations() {
        let tree = phrase(
            "ROOT",
            vec![phrase(
                "S",
                vec![
                    phrase("NP", vec![pre("PRP", "She")]),
                    phrase(
                        "VP",
                        vec![
                            pre("VBD", "slept"),
                            phrase(
                                "PP",
                                vec![
                                    pre("IN", "In"),
                                    phrase("NP", vec![pre("DT", "the"), pre("NN", "park")]),
                                ],
                            ),
                        ],
                    ),
                ],
            )],
        );
        let structure = GrammaticalStructure::from_tree(&tree).expect("structure");
        assert_eq!(
            render(structure.basic()),
            vec![
                "nsubj(slept-2, She-1)",
                "root(ROOT-0, slept-2)",
                "prep(slept-2, In-3)",
                "det(park-5, the-4)",
                "pobj(In-3, park-5)",
            ]
        );
        assert_eq!(
            render(&structure.collapsed_tree()),
            vec![
                "nsubj(slept-2, She-1)",
                "root(ROOT-0, slept-2)",
                "det(park-5, the-4)",
                "prep_in(slept-2, park-5)",
            ]
        );
    }

    #[test]
    fn double_objects_split_into_iobj_and_dobj() {
        let tree = phrase(
            "VP",
            vec![
                pre("VBD", "gave"),
                phrase("NP", vec![pre("PRP", "him")]),
                phrase("NP", vec![pre("DT", "a"), pre("NN", "ball")]),
            ],
        );
        let structure = GrammaticalStructure::from_tree(&tree).expect("structure");
        assert_eq!(
            render(structure.basic()),
            vec![
                "root(ROOT-0, gave-1)",
                "iobj(gave-1, him-2)",
                "det(ball-4, a-3)",
                "dobj(gave-1, ball-4)",
            ]
        );
    }

    #[test]
    fn auxiliaries_and_negation() {
        let tree = phrase(
            "VP",
            vec![pre("MD", "will"), pre("RB", "not"), pre("VB", "go")],
        );
        let structure = GrammaticalStructure::from_tree(&tree).expect("structure");
        assert_eq!(
            render(structure.basic()),
            vec!["aux(go-3, will-1)", "neg(go-3, not-2)", "root(ROOT-0, go-3)"]
        );
    }

    #[test]
    fn possessives_attach_to_the_possessed_noun() {
        let tree = phrase(
            "NP",
            vec![
                phrase("NP", vec![pre("NNP", "Mary"), pre("POS", "'s")]),
                pre("NN", "dog"),
            ],
        );
        let structure = GrammaticalStructure::from_tree(&tree).expect("structure");
        assert_eq!(
            render(structure.basic()),
            vec!["poss(dog-3, Mary-1)", "possessive(Mary-1, 's-2)", "root(ROOT-0, dog-3)"]
        );
    }

    #[test]
    fn bare_words_are_rejected() {
        let error = GrammaticalStructure::from_tree(&Tree::leaf("dog")).expect_err("no tags");
        assert!(matches!(error, EngineError::ParseFailed { .. }));
    }
}
