//! Penn Treebank style word tokenisation.
//!
//! Text is split on whitespace and each chunk is then peeled: opening
//! brackets and quotes from the front, closing punctuation from the back,
//! then clitics such as `n't` and `'s`. Brackets are normalised to the
//! treebank escapes (`-LRB-` and friends).

const OPENING: &[char] = &['(', '[', '{', '"', '`'];
const CLOSING: &[char] = &[')', ']', '}', '"', ',', ';', ':', '!', '?'];
const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];
const ELLIPSIS: &str = "...";

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "inc", "ltd", "co", "corp",
    "no", "mt", "gen", "gov", "sen", "rep", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
    "sep", "sept", "oct", "nov", "dec",
];

/// Splits text into treebank tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let chunks: Vec<&str> = text.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(chunks.len() * 2);
    let last = chunks.len().saturating_sub(1);
    for (position, chunk) in chunks.into_iter().enumerate() {
        split_chunk(chunk, position == last, &mut tokens);
    }
    tokens
}

fn split_chunk(chunk: &str, is_last: bool, tokens: &mut Vec<String>) {
    let mut rest = chunk;
    while let Some(first) = rest.chars().next()
        && OPENING.contains(&first)
        && rest.len() > first.len_utf8()
    {
        tokens.push(normalise(first.encode_utf8(&mut [0; 4])));
        rest = rest.strip_prefix(first).unwrap_or(rest);
    }

    let mut trailing = Vec::new();
    loop {
        if rest.chars().all(|candidate| candidate == '.') {
            break;
        }
        if let Some(body) = rest.strip_suffix(ELLIPSIS) {
            trailing.push(ELLIPSIS);
            rest = body;
            continue;
        }
        let Some(last) = rest.chars().next_back() else {
            break;
        };
        let Some(body) = rest.strip_suffix(last).filter(|body| !body.is_empty()) else {
            break;
        };
        let peel = CLOSING.contains(&last) || (last == '.' && (is_last || !is_abbreviation(body)));
        if !peel {
            break;
        }
        trailing.push(rest.get(body.len()..).unwrap_or_default());
        rest = body;
    }

    if !rest.is_empty() {
        split_clitics(rest, tokens);
    }
    tokens.extend(trailing.into_iter().rev().map(normalise));
}

fn split_clitics(word: &str, tokens: &mut Vec<String>) {
    let lower = word.to_ascii_lowercase();
    let suffix_len = if lower.ends_with("n't") {
        Some(3)
    } else {
        CLITICS
            .iter()
            .find(|clitic| lower.ends_with(*clitic))
            .map(|clitic| clitic.len())
    };
    match suffix_len.and_then(|len| word.len().checked_sub(len).filter(|stem| *stem > 0)) {
        Some(stem_len) => {
            let (stem, clitic) = word.split_at(stem_len);
            tokens.push(stem.to_owned());
            tokens.push(clitic.to_owned());
        }
        None => tokens.push(word.to_owned()),
    }
}

fn is_abbreviation(body: &str) -> bool {
    if body.contains('.') {
        return true;
    }
    let mut chars = body.chars();
    if let (Some(only), None) = (chars.next(), chars.next())
        && only.is_uppercase()
    {
        return true;
    }
    ABBREVIATIONS.contains(&body.to_ascii_lowercase().as_str())
}

fn normalise(token: &str) -> String {
    match token {
        "(" => "-LRB-",
        ")" => "-RRB-",
        "[" => "-LSB-",
        "]" => "-RSB-",
        "{" => "-LCB-",
        "}" => "-RCB-",
        other => other,
    }
    .to_owned()
}
