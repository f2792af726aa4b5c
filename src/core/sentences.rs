/// Rule-based sentence boundary detection for corpus text.

/// Punctuation that ends a sentence.
const SENTENCE_ENDERS: &[char] = &['.', '!', '?'];

/// Closing marks that may trail a sentence ender (`"Stop!"`, `(see above.)`).
const TRAILING_CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];

/// Abbreviations whose period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "st.", "jr.", "sr.", "prof.", "capt.", "col.", "gen.", "lt.",
    "mt.", "rev.", "vs.", "etc.", "e.g.", "i.e.", "no.",
];

/// Split `text` into sentences, returned as slices of the original text.
///
/// A sentence ends at a word whose last character (ignoring trailing quotes
/// and brackets) is `.`, `!` or `?`, unless the word is a known abbreviation
/// or a single-letter initial, or the next word starts with a lowercase
/// letter. Trailing words without an ender form a final sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut tokens = token_spans(text).peekable();
    let mut start: Option<usize> = None;
    let mut end = 0;

    while let Some((offset, token)) = tokens.next() {
        let begin = *start.get_or_insert(offset);
        end = offset + token.len();
        let next_is_lowercase = tokens
            .peek()
            .and_then(|(_, next)| next.chars().find(|c| c.is_alphanumeric()))
            .is_some_and(char::is_lowercase);
        if ends_sentence(token) && !next_is_lowercase {
            sentences.push(&text[begin..end]);
            start = None;
        }
    }

    if let Some(begin) = start {
        sentences.push(&text[begin..end]);
    }
    sentences
}

/// Whitespace-separated tokens paired with their byte offsets in `text`.
fn token_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (offset, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(begin)) => {
                spans.push((begin, &text[begin..offset]));
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(begin) = start {
        spans.push((begin, &text[begin..]));
    }
    spans.into_iter()
}

fn ends_sentence(token: &str) -> bool {
    let core = token.trim_end_matches(TRAILING_CLOSERS);
    if !core.ends_with(SENTENCE_ENDERS) {
        return false;
    }
    let word = core
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if ABBREVIATIONS.contains(&word.as_str()) {
        return false;
    }
    // Initials such as "J." in "J. Smith"
    let mut chars = word.chars();
    !matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_alphabetic()
    )
}
