//! Part-of-speech tagging by lexicon lookup, suffix rules and a small
//! left-to-right repair pass.

use crate::lexicon::{Lexicon, builtin_tag};

/// Assigns one tag per token.
pub(crate) fn tag(tokens: &[String], lexicon: &Lexicon) -> Vec<&'static str> {
    let initial: Vec<&'static str> = tokens
        .iter()
        .enumerate()
        .map(|(position, token)| lexical_tag(token, position, lexicon))
        .collect();
    repair(initial)
}

fn lexical_tag(token: &str, position: usize, lexicon: &Lexicon) -> &'static str {
    if let Some(tag) = lexicon.lookup(token) {
        return tag;
    }
    let lower = token.to_lowercase();
    if let Some(tag) = builtin_tag(&lower) {
        return tag;
    }
    if let Some(tag) = punctuation_tag(token) {
        return tag;
    }
    if is_number(token) {
        return "CD";
    }
    let capitalised = token.chars().next().is_some_and(char::is_uppercase);
    if capitalised && position > 0 {
        return "NNP";
    }
    suffix_tag(&lower)
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "--" | "-" | "..." => ":",
        "\"" | "``" | "`" => "``",
        "''" | "'" => "''",
        "-LRB-" | "-LSB-" | "-LCB-" => "-LRB-",
        "-RRB-" | "-RSB-" | "-RCB-" => "-RRB-",
        "$" => "$",
        "#" => "#",
        "'s" => "POS",
        _ => return None,
    };
    Some(tag)
}

fn is_number(token: &str) -> bool {
    token.chars().any(|character| character.is_ascii_digit())
        && token
            .chars()
            .all(|character| character.is_ascii_digit() || matches!(character, '.' | ',' | '-' | '/'))
}

fn suffix_tag(lower: &str) -> &'static str {
    const ADJECTIVE_SUFFIXES: &[&str] = &[
        "ous", "ful", "able", "ible", "al", "ive", "less", "ic", "ish",
    ];
    if lower.len() > 3 && lower.ends_with("ly") {
        "RB"
    } else if lower.len() > 4 && lower.ends_with("ing") {
        "VBG"
    } else if lower.len() > 3 && lower.ends_with("ed") {
        "VBD"
    } else if lower.len() > 4
        && ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    {
        "JJ"
    } else if lower.len() > 2
        && lower.ends_with('s')
        && !["ss", "us", "is"].iter().any(|suffix| lower.ends_with(suffix))
    {
        "NNS"
    } else {
        "NN"
    }
}

fn is_nominal(tag: &str) -> bool {
    matches!(tag, "NN" | "NNS" | "NNP" | "NNPS" | "PRP" | "CD")
}

fn is_verbal(tag: &str) -> bool {
    tag.starts_with("VB") || tag == "MD"
}

/// Fixes the most common lexical guesses using the preceding tag.
fn repair(mut tags: Vec<&'static str>) -> Vec<&'static str> {
    let mut verb_seen = false;
    let mut previous: Option<&'static str> = None;
    for tag in &mut tags {
        *tag = match (previous, *tag) {
            (Some("PRP" | "EX" | "WP"), "POS") => "VBZ",
            (Some("TO" | "MD"), "NN" | "VBP" | "VBZ" | "VBD") => "VB",
            (Some("DT" | "PRP$" | "JJ"), "VB" | "VBP") => "NN",
            (Some(prior), "VB") if is_nominal(prior) && !verb_seen => "VBP",
            (Some("NN" | "NNP" | "PRP"), "NNS") if !verb_seen => "VBZ",
            (_, unchanged) => unchanged,
        };
        verb_seen |= is_verbal(tag);
        previous = Some(*tag);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use rstest::rstest;

    fn tags_for(text: &str) -> Vec<&'static str> {
        let tokens: Vec<String> = text.split(' ').map(str::to_owned).collect();
        tag(&tokens, &Lexicon::builtin())
    }

    #[rstest]
    #[case("The dog chased the cat .", &["DT", "NN", "VBD", "DT", "NN", "."])]
    #[case("The dog runs .", &["DT", "NN", "VBZ", "."])]
    #[case("I like green apples", &["PRP", "VBP", "NN", "NNS"])]
    #[case("She wants to walk", &["PRP", "VBZ", "TO", "VB"])]
    #[case("it 's famous", &["PRP", "VBZ", "JJ"])]
    #[case("Yesterday Mary 's dog barked loudly", &["RB", "NNP", "POS", "NN", "VBD", "RB"])]
    #[case("We saw 42 birds", &["PRP", "VBD", "CD", "NNS"])]
    #[case("the run", &["DT", "NN"])]
    fn tags_common_patterns(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(tags_for(text), expected);
    }

    #[test]
    fn model_entries_take_precedence() {
        let mut file = tempfile::NamedTempFile::new().expect("create model file");
        file.write_all(br#"{"lexicon": {"the": "NN", "wug": "VBZ"}}"#)
            .expect("write model file");
        let lexicon =
            Lexicon::load(file.path().to_str().expect("utf-8 path")).expect("load model");
        let tokens = vec!["the".to_owned(), "wug".to_owned()];
        assert_eq!(tag(&tokens, &lexicon), vec!["NN", "VBZ"]);
    }

    #[test]
    fn sentence_initial_capitals_use_suffix_rules() {
        assert_eq!(tags_for("Cats sleep"), vec!["NNS", "VBP"]);
        assert_eq!(tags_for("Quickly , Bob walked"), vec!["RB", ",", "NNP", "VBD"]);
    }
}
