//! Rule-based phrase chunking over tagged tokens.
//!
//! The chunker recognises noun, verb, prepositional, adjective and adverb
//! phrases left to right and wraps them in `(ROOT (S ...))`, or in
//! `(ROOT (FRAG ...))` when no verb phrase was found.

use std::ops::Range;

use crate::heads::{is_adjective, is_adverb, is_noun, is_punctuation, is_verbal};
use crate::tree::Tree;

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    word: &'a str,
    tag: &'static str,
}

type Chunk = (Tree, usize);

struct Chunker<'a> {
    tokens: Vec<Token<'a>>,
}

/// Builds a tree over `words`, which must be non-empty and as long as `tags`.
pub(crate) fn parse(words: &[String], tags: &[&'static str]) -> Tree {
    let chunker = Chunker {
        tokens: words
            .iter()
            .zip(tags)
            .map(|(word, tag)| Token {
                word: word.as_str(),
                tag: *tag,
            })
            .collect(),
    };
    chunker.sentence()
}

impl Chunker<'_> {
    fn tag_at(&self, index: usize) -> Option<&'static str> {
        self.tokens.get(index).map(|token| token.tag)
    }

    fn tag_is(&self, index: usize, predicate: impl Fn(&str) -> bool) -> bool {
        self.tag_at(index).is_some_and(predicate)
    }

    fn preterminals(&self, range: Range<usize>) -> Vec<Tree> {
        self.tokens
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|token| Tree::preterminal(token.tag, token.word))
            .collect()
    }

    fn run_end(&self, start: usize, predicate: impl Fn(&str) -> bool) -> usize {
        let mut end = start;
        while self.tag_is(end, &predicate) {
            end += 1;
        }
        end
    }

    fn sentence(&self) -> Tree {
        let mut constituents = Vec::new();
        let mut has_verb_phrase = false;
        let mut position = 0;
        while let Some((tree, next)) = self.constituent(position, has_verb_phrase) {
            has_verb_phrase |= tree.label() == "VP";
            constituents.push(tree);
            position = next;
        }
        let clause = if has_verb_phrase { "S" } else { "FRAG" };
        Tree::phrase("ROOT", vec![Tree::phrase(clause, constituents)])
    }

    fn constituent(&self, start: usize, after_verb: bool) -> Option<Chunk> {
        let token = self.tokens.get(start)?;
        let single = || Some((Tree::preterminal(token.tag, token.word), start + 1));
        if is_punctuation(token.tag) || token.tag == "CC" {
            return single();
        }
        self.verb_phrase(start)
            .or_else(|| {
                if after_verb {
                    self.noun_phrase(start)
                } else {
                    self.subject(start)
                }
            })
            .or_else(|| self.prepositional_phrase(start))
            .or_else(|| self.adverb_phrase(start))
            .or_else(|| self.adjective_phrase(start))
            .or_else(single)
    }

    /// A subject noun phrase, with a directly following prepositional phrase
    /// attached to it.
    fn subject(&self, start: usize) -> Option<Chunk> {
        let (noun_phrase, end) = self.noun_phrase(start)?;
        if self.tag_at(end) == Some("IN")
            && self.noun_phrase(end + 1).is_some()
            && let Some((modifier, after)) = self.prepositional_phrase(end)
        {
            return Some((Tree::phrase("NP", vec![noun_phrase, modifier]), after));
        }
        Some((noun_phrase, end))
    }

    fn noun_phrase(&self, start: usize) -> Option<Chunk> {
        let first = self.tag_at(start)?;
        if matches!(first, "PRP" | "EX" | "WP") {
            return Some((Tree::phrase("NP", self.preterminals(start..start + 1)), start + 1));
        }

        let mut cursor = start;
        let has_determiner = matches!(first, "DT" | "PDT" | "PRP$" | "WP$" | "WDT");
        if has_determiner {
            cursor += 1;
            if first == "PDT" && self.tag_at(cursor) == Some("DT") {
                cursor += 1;
            }
        }
        let modifiers = cursor;
        cursor = self.run_end(cursor, |tag| is_adjective(tag) || tag == "CD");
        let nouns = cursor;
        cursor = self.run_end(cursor, is_noun);

        let has_noun = cursor > nouns;
        let only_numbers = nouns > modifiers && !self.tag_is(modifiers, is_adjective);
        if !(has_noun || has_determiner || only_numbers) {
            return None;
        }

        let head = Tree::phrase("NP", self.preterminals(start..cursor));
        if self.tag_at(cursor) != Some("POS") {
            return Some((head, cursor));
        }
        Some(self.possessed(head, cursor))
    }

    /// `Mary 's little dog`: the possessor (with its `POS`) becomes the
    /// determiner of an enclosing noun phrase.
    fn possessed(&self, owner: Tree, marker: usize) -> Chunk {
        let (label, mut children) = owner.into_parts();
        children.extend(self.preterminals(marker..marker + 1));
        let possessor = Tree::phrase(label, children);

        let modifiers = marker + 1;
        let nouns = self.run_end(modifiers, |tag| is_adjective(tag) || tag == "CD");
        let end = self.run_end(nouns, is_noun);
        if end == nouns {
            return (possessor, modifiers);
        }
        let mut parts = vec![possessor];
        parts.extend(self.preterminals(modifiers..end));
        (Tree::phrase("NP", parts), end)
    }

    fn prepositional_phrase(&self, start: usize) -> Option<Chunk> {
        if !self.tag_is(start, |tag| matches!(tag, "IN" | "TO")) {
            return None;
        }
        let mut children = self.preterminals(start..start + 1);
        let mut end = start + 1;
        if let Some((object, after)) = self.noun_phrase(end) {
            children.push(object);
            end = after;
        }
        Some((Tree::phrase("PP", children), end))
    }

    fn verb_phrase(&self, start: usize) -> Option<Chunk> {
        let first = self.tag_at(start)?;
        if first == "TO" {
            if self.tag_at(start + 1) != Some("VB") {
                return None;
            }
            let (inner, end) = self.verb_phrase(start + 1)?;
            let mut children = self.preterminals(start..start + 1);
            children.push(inner);
            return Some((Tree::phrase("VP", children), end));
        }
        if !is_verbal(first) {
            return None;
        }

        let group_end = self.verb_group_end(start);
        let mut children = self.preterminals(start..group_end);
        let mut cursor = group_end;
        while let Some((complement, next)) = self.complement(cursor) {
            children.push(complement);
            cursor = next;
        }
        Some((Tree::phrase("VP", children), cursor))
    }

    /// Auxiliaries, main verb and any adverbs between them.
    fn verb_group_end(&self, start: usize) -> usize {
        let mut end = start;
        loop {
            if self.tag_is(end, is_verbal) {
                end += 1;
                continue;
            }
            let adverbs_end = self.run_end(end, is_adverb);
            if adverbs_end > end && self.tag_is(adverbs_end, is_verbal) {
                end = adverbs_end;
                continue;
            }
            return end;
        }
    }

    fn complement(&self, start: usize) -> Option<Chunk> {
        let tag = self.tag_at(start)?;
        if tag == "TO" && self.tag_at(start + 1) == Some("VB") {
            return self.verb_phrase(start);
        }
        self.noun_phrase(start)
            .or_else(|| self.prepositional_phrase(start))
            .or_else(|| self.adverb_phrase(start))
            .or_else(|| self.adjective_phrase(start))
    }

    fn adverb_phrase(&self, start: usize) -> Option<Chunk> {
        self.run_phrase("ADVP", start, is_adverb)
    }

    fn adjective_phrase(&self, start: usize) -> Option<Chunk> {
        self.run_phrase("ADJP", start, is_adjective)
    }

    fn run_phrase(
        &self,
        label: &str,
        start: usize,
        predicate: impl Fn(&str) -> bool,
    ) -> Option<Chunk> {
        let end = self.run_end(start, predicate);
        (end > start).then(|| (Tree::phrase(label, self.preterminals(start..end)), end))
    }
}
