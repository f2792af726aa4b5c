/// Removal of unmatched quotes and brackets from generated text.

/// A kind of paired punctuation, with rules for telling its opening mark
/// from its closing mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `"` — direction guessed from surrounding whitespace.
    StraightQuote,
    /// `“` and `”`.
    CurlyQuote,
    /// `(` and `)`.
    Parenthesis,
}

impl Bracket {
    /// Passes applied by [`balance`], in order.
    pub const ALL: [Bracket; 3] = [Bracket::StraightQuote, Bracket::CurlyQuote, Bracket::Parenthesis];

    pub fn is_opening(self, text: &[char], index: usize) -> bool {
        match self {
            Bracket::StraightQuote => text[index] == '"' && straight_quote_opens(text, index),
            Bracket::CurlyQuote => text[index] == '\u{201c}',
            Bracket::Parenthesis => text[index] == '(',
        }
    }

    pub fn is_closing(self, text: &[char], index: usize) -> bool {
        match self {
            Bracket::StraightQuote => text[index] == '"' && !straight_quote_opens(text, index),
            Bracket::CurlyQuote => text[index] == '\u{201d}',
            Bracket::Parenthesis => text[index] == ')',
        }
    }
}

/// A straight quote opens when it follows whitespace (`Bar. "Foo`), closes
/// when it ends the text or precedes whitespace (`foo." Bar`), and otherwise
/// is assumed to open. A quote at the start of the text is judged by what
/// follows it.
fn straight_quote_opens(text: &[char], index: usize) -> bool {
    if index > 0 && text[index - 1].is_whitespace() {
        return true;
    }
    match text.get(index + 1) {
        None => false,
        Some(next) => !next.is_whitespace(),
    }
}

/// Delete every `bracket` mark in `text` that has no partner.
///
/// Opening marks are matched to closing marks with a stack, innermost first;
/// a closing mark with nothing open and any opening mark left at the end are
/// removed. Everything else is kept in order.
pub fn strip_unbalanced(text: &str, bracket: Bracket) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut open = Vec::new();
    let mut unmatched = vec![false; chars.len()];

    for index in 0..chars.len() {
        if bracket.is_opening(&chars, index) {
            open.push(index);
        } else if bracket.is_closing(&chars, index) && open.pop().is_none() {
            unmatched[index] = true;
        }
    }
    for index in open {
        unmatched[index] = true;
    }

    chars
        .iter()
        .zip(unmatched)
        .filter(|(_, drop)| !drop)
        .map(|(c, _)| *c)
        .collect()
}

/// Remove unmatched straight quotes, curly quotes and parentheses.
pub fn balance(text: &str) -> String {
    Bracket::ALL
        .iter()
        .fold(text.to_string(), |text, &bracket| strip_unbalanced(&text, bracket))
}
