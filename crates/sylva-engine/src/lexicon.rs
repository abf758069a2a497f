//! Word-to-tag lexicons: the built-in closed-class list and JSON models.

use std::collections::{BTreeMap, HashMap};
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::error::EngineError;

/// Model identifier selecting the built-in lexicon only.
pub const BUILTIN_MODEL: &str = "builtin";

/// Penn Treebank part-of-speech tags the engine understands.
pub(crate) const TAGSET: &[&str] = &[
    "CC", "CD", "DT", "EX", "FW", "IN", "JJ", "JJR", "JJS", "LS", "MD", "NN", "NNS", "NNP",
    "NNPS", "PDT", "POS", "PRP", "PRP$", "RB", "RBR", "RBS", "RP", "SYM", "TO", "UH", "VB",
    "VBD", "VBG", "VBN", "VBP", "VBZ", "WDT", "WP", "WP$", "WRB", ".", ",", ":", "``", "''",
    "-LRB-", "-RRB-", "#", "$",
];

/// Returns the interned tag matching `tag`, if it belongs to [`TAGSET`].
pub(crate) fn intern_tag(tag: &str) -> Option<&'static str> {
    TAGSET.iter().copied().find(|known| *known == tag)
}

/// Closed-class words and a handful of frequent open-class words.
pub(crate) fn builtin_tag(lower: &str) -> Option<&'static str> {
    let tag = match lower {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "every" | "each" | "some"
        | "no" | "any" | "another" | "either" | "neither" => "DT",
        "all" | "both" | "half" => "PDT",
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" | "myself" | "yourself" | "himself" | "herself" | "itself" | "ourselves"
        | "themselves" => "PRP",
        "my" | "your" | "his" | "its" | "our" | "their" => "PRP$",
        "in" | "on" | "at" | "by" | "with" | "from" | "of" | "for" | "about" | "into"
        | "over" | "under" | "after" | "before" | "through" | "between" | "near" | "since"
        | "during" | "without" | "against" | "across" | "behind" | "because" | "if"
        | "while" | "than" | "as" | "upon" | "among" | "around" => "IN",
        "to" => "TO",
        "and" | "or" | "but" | "nor" | "yet" => "CC",
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must"
        | "'ll" | "'d" | "wo" | "ca" => "MD",
        "is" | "has" | "does" => "VBZ",
        "are" | "am" | "have" | "do" | "'re" | "'ve" | "'m" => "VBP",
        "was" | "were" | "had" | "did" => "VBD",
        "be" => "VB",
        "been" => "VBN",
        "being" => "VBG",
        "not" | "n't" | "very" | "often" | "never" | "always" | "also" | "too" | "here"
        | "now" | "then" | "soon" | "still" | "already" | "again" | "almost" | "just"
        | "quite" | "rather" | "sometimes" | "today" | "tomorrow" | "yesterday" => "RB",
        "more" => "RBR",
        "most" => "RBS",
        "there" => "EX",
        "which" | "whatever" => "WDT",
        "who" | "what" | "whom" => "WP",
        "whose" => "WP$",
        "where" | "when" | "why" | "how" => "WRB",
        "one" | "two" | "three" | "four" | "five" | "six" | "seven" | "eight" | "nine"
        | "ten" | "hundred" | "thousand" | "million" => "CD",
        "oh" | "yes" | "hello" | "please" => "UH",
        "run" | "go" | "see" | "make" | "take" | "get" | "eat" | "want" | "know" | "think"
        | "say" | "give" | "find" | "tell" | "come" | "walk" | "read" | "write" | "sleep"
        | "sit" | "play" | "help" | "love" | "like" => "VB",
        "saw" | "went" | "ate" | "ran" | "gave" | "took" | "made" | "said" | "told"
        | "found" | "came" | "got" | "knew" | "thought" | "sat" | "wrote" | "slept" => "VBD",
        "good" | "bad" | "big" | "small" | "old" | "new" | "little" | "red" | "brown"
        | "quick" | "lazy" | "happy" | "sad" | "fast" | "slow" | "long" | "short" | "young"
        | "large" | "great" | "high" | "low" => "JJ",
        "better" | "bigger" | "smaller" | "older" | "faster" => "JJR",
        "best" | "biggest" | "smallest" | "oldest" | "fastest" => "JJS",
        "man" | "woman" | "child" | "people" | "time" | "day" | "world" | "news" => "NN",
        _ => return None,
    };
    Some(tag)
}

/// A loaded tagging model: a name and a case-insensitive word lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Lexicon {
    name: String,
    entries: HashMap<String, &'static str>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    lexicon: BTreeMap<String, String>,
}

impl Lexicon {
    /// The empty lexicon behind the `builtin` identifier.
    pub(crate) fn builtin() -> Self {
        Self {
            name: BUILTIN_MODEL.to_owned(),
            entries: HashMap::new(),
        }
    }

    /// Resolves a model identifier: `builtin` or a path to a JSON lexicon.
    pub(crate) fn load(identifier: &str) -> Result<Self, EngineError> {
        if identifier == BUILTIN_MODEL {
            return Ok(Self::builtin());
        }
        Self::from_path(Utf8Path::new(identifier))
    }

    fn from_path(path: &Utf8Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|source| EngineError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LexiconFile =
            serde_json::from_str(&contents).map_err(|source| EngineError::ModelFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let mut entries = HashMap::with_capacity(file.lexicon.len());
        for (word, tag) in file.lexicon {
            let Some(interned) = intern_tag(&tag) else {
                return Err(EngineError::UnknownTag {
                    path: Utf8PathBuf::from(path),
                    word,
                    tag,
                });
            };
            entries.insert(word.to_lowercase(), interned);
        }
        let name = file
            .name
            .or_else(|| path.file_stem().map(str::to_owned))
            .unwrap_or_else(|| path.to_string());
        Ok(Self { name, entries })
    }

    /// Human-readable model name.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Returns a lexicon where entries from `overrides` win.
    pub(crate) fn overlay(mut self, overrides: Self) -> Self {
        self.entries.extend(overrides.entries);
        self.name = format!("{}+{}", self.name, overrides.name);
        self
    }

    /// Looks a word up case-insensitively.
    pub(crate) fn lookup(&self, word: &str) -> Option<&'static str> {
        self.entries.get(&word.to_lowercase()).copied()
    }
}
