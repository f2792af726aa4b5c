/// Markov chain text model — training, continuation sampling, and generation.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::core::sentences::split_sentences;

#[derive(Debug, Error)]
pub enum MarkovError {
    #[error("prefix length must be at least one (got {0})")]
    InvalidPrefixLength(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A window of at most `prefix_len` consecutive words used as a chain key.
///
/// The empty prefix stands for "start of text".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Prefix(Vec<String>);

impl Prefix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last `prefix_len` whitespace-separated words of `text`.
    pub fn from_text(text: &str, prefix_len: usize) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let start = words.len().saturating_sub(prefix_len);
        Prefix(words[start..].iter().map(|w| w.to_string()).collect())
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `word`, dropping the oldest words so the window never holds
    /// more than `prefix_len` words.
    pub fn push(&mut self, word: &str, prefix_len: usize) {
        let keep = prefix_len.saturating_sub(1);
        if self.0.len() > keep {
            self.0.drain(..self.0.len() - keep);
        }
        self.0.push(word.to_string());
    }
}

impl Borrow<[String]> for Prefix {
    fn borrow(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// A Markov chain over whitespace-delimited words.
///
/// Each prefix maps to every word observed after it, duplicates included,
/// so a uniform pick from the list is a frequency-weighted pick.
#[derive(Debug, Clone)]
pub struct MarkovChain {
    prefix_len: usize,
    transitions: FxHashMap<Prefix, Vec<String>>,
}

impl MarkovChain {
    pub fn new(prefix_len: usize) -> Result<Self, MarkovError> {
        if prefix_len < 1 {
            return Err(MarkovError::InvalidPrefixLength(prefix_len));
        }
        let mut transitions = FxHashMap::default();
        transitions.insert(Prefix::new(), Vec::new());
        Ok(Self {
            prefix_len,
            transitions,
        })
    }

    /// Build a chain from in-memory texts, each treated like a corpus file.
    pub fn from_texts<I, S>(texts: I, prefix_len: usize) -> Result<Self, MarkovError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chain = Self::new(prefix_len)?;
        for text in texts {
            chain.update_from_text(text.as_ref());
        }
        Ok(chain)
    }

    /// Build a chain from corpus files, read fully.
    pub fn from_files<P: AsRef<Path>>(paths: &[P], prefix_len: usize) -> Result<Self, MarkovError> {
        let mut chain = Self::new(prefix_len)?;
        for path in paths {
            chain.update_from_file(path.as_ref())?;
        }
        Ok(chain)
    }

    pub fn update_from_file(&mut self, path: &Path) -> Result<(), MarkovError> {
        let text = std::fs::read_to_string(path)?;
        self.update_from_text(&text);
        info!(
            path = %path.display(),
            prefixes = self.prefix_count(),
            transitions = self.transition_count(),
            "trained chain on corpus file"
        );
        Ok(())
    }

    /// Train on a whole corpus text.
    ///
    /// Newlines are folded into spaces, the text is walked once end to end,
    /// and then every sentence after the first is registered as an extra
    /// starting point.
    pub fn update_from_text(&mut self, text: &str) {
        let text = text.lines().collect::<Vec<_>>().join(" ");
        self.update(&text);
        for sentence in split_sentences(&text).into_iter().skip(1) {
            self.add_chain_start(sentence);
        }
    }

    /// Walk `text` word by word, recording each word under the prefix that
    /// precedes it.
    pub fn update(&mut self, text: &str) {
        let mut prefix = Prefix::new();
        for word in text.split_whitespace() {
            self.transitions
                .entry(prefix.clone())
                .or_default()
                .push(word.to_string());
            prefix.push(word, self.prefix_len);
        }
    }

    /// Make `sentence` a possible start of generated text without training
    /// on the rest of it.
    pub fn add_chain_start(&mut self, sentence: &str) {
        let opening: Vec<&str> = sentence.split_whitespace().take(self.prefix_len).collect();
        self.update(&opening.join(" "));
    }

    /// Pick a continuation for `prefix`, or `None` when the chain has nothing
    /// recorded after it. Only the rightmost `prefix_len` words are used.
    pub fn sample<R: Rng + ?Sized>(&self, prefix: &Prefix, rng: &mut R) -> Option<&str> {
        let words = prefix.words();
        let key = &words[words.len().saturating_sub(self.prefix_len)..];
        self.transitions
            .get(key)?
            .choose(rng)
            .map(String::as_str)
    }

    /// Generate up to `word_count` words following `seed`.
    ///
    /// Stops early, without error, the first time the sliding prefix has no
    /// recorded continuation.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        word_count: usize,
        seed: &Prefix,
        rng: &mut R,
    ) -> Vec<String> {
        let mut prefix = seed.clone();
        let mut generated = Vec::with_capacity(word_count);
        for _ in 0..word_count {
            let Some(word) = self.sample(&prefix, rng) else {
                break;
            };
            let word = word.to_string();
            prefix.push(&word, self.prefix_len);
            generated.push(word);
        }
        generated
    }

    /// Generate one word continuing the last `prefix_len` words of
    /// `seed_text`.
    pub fn next_word<R: Rng + ?Sized>(&self, seed_text: &str, rng: &mut R) -> Option<String> {
        let prefix = Prefix::from_text(seed_text, self.prefix_len);
        self.generate(1, &prefix, rng).pop()
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Every word recorded after `prefix`, in training order.
    pub fn candidates(&self, prefix: &Prefix) -> Option<&[String]> {
        self.transitions.get(prefix).map(Vec::as_slice)
    }

    /// Words that may begin generated text.
    pub fn entry_points(&self) -> &[String] {
        self.transitions
            .get(&[] as &[String])
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn prefix_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &[String])> {
        self.transitions.iter().map(|(p, w)| (p, w.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DICKENS: &str = "It is a far, far better thing that I do, than I have ever done; \
                           it is a far, far better rest that I go to than I have ever known.";

    fn assert_chain(chain: &MarkovChain, expected: &[(&str, &[&str])]) {
        for (prefix, words) in expected {
            let key = Prefix::from_text(prefix, chain.prefix_len());
            let actual = chain
                .candidates(&key)
                .unwrap_or_else(|| panic!("missing prefix {:?}", prefix));
            assert_eq!(actual, *words, "prefix {:?}", prefix);
        }
        assert_eq!(chain.prefix_count(), expected.len());
    }

    fn chain_from(text: &str, prefix_len: usize) -> MarkovChain {
        let mut chain = MarkovChain::new(prefix_len).unwrap();
        chain.update(text);
        chain
    }

    #[test]
    fn zero_prefix_len_rejected() {
        assert!(matches!(
            MarkovChain::new(0),
            Err(MarkovError::InvalidPrefixLength(0))
        ));
    }

    #[test]
    fn new_chain_has_empty_start() {
        let chain = MarkovChain::new(2).unwrap();
        assert_eq!(chain.prefix_count(), 1);
        assert!(chain.entry_points().is_empty());
    }

    #[test]
    fn build_bigram_chain() {
        let chain = chain_from(DICKENS, 2);
        assert_chain(
            &chain,
            &[
                ("", &["It"][..]),
                ("It", &["is"][..]),
                ("It is", &["a"][..]),
                ("is a", &["far,", "far,"][..]),
                ("a far,", &["far", "far"][..]),
                ("far, far", &["better", "better"][..]),
                ("far better", &["thing", "rest"][..]),
                ("better thing", &["that"][..]),
                ("thing that", &["I"][..]),
                ("that I", &["do,", "go"][..]),
                ("I do,", &["than"][..]),
                ("do, than", &["I"][..]),
                ("than I", &["have", "have"][..]),
                ("I have", &["ever", "ever"][..]),
                ("have ever", &["done;", "known."][..]),
                ("ever done;", &["it"][..]),
                ("done; it", &["is"][..]),
                ("it is", &["a"][..]),
                ("better rest", &["that"][..]),
                ("rest that", &["I"][..]),
                ("I go", &["to"][..]),
                ("go to", &["than"][..]),
                ("to than", &["I"][..]),
            ],
        );
    }

    #[test]
    fn build_trigram_chain() {
        let chain = chain_from(DICKENS, 3);
        assert_chain(
            &chain,
            &[
                ("", &["It"][..]),
                ("It", &["is"][..]),
                ("It is", &["a"][..]),
                ("It is a", &["far,"][..]),
                ("is a far,", &["far", "far"][..]),
                ("a far, far", &["better", "better"][..]),
                ("far, far better", &["thing", "rest"][..]),
                ("far better thing", &["that"][..]),
                ("better thing that", &["I"][..]),
                ("thing that I", &["do,"][..]),
                ("that I do,", &["than"][..]),
                ("I do, than", &["I"][..]),
                ("do, than I", &["have"][..]),
                ("than I have", &["ever", "ever"][..]),
                ("I have ever", &["done;", "known."][..]),
                ("have ever done;", &["it"][..]),
                ("ever done; it", &["is"][..]),
                ("done; it is", &["a"][..]),
                ("it is a", &["far,"][..]),
                ("far better rest", &["that"][..]),
                ("better rest that", &["I"][..]),
                ("rest that I", &["go"][..]),
                ("that I go", &["to"][..]),
                ("I go to", &["than"][..]),
                ("go to than", &["I"][..]),
                ("to than I", &["have"][..]),
            ],
        );
    }

    #[test]
    fn unique_continuations_reproduce_text() {
        let text = "Here are words.";
        for prefix_len in 1..=4 {
            let chain = chain_from(text, prefix_len);
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                let words = chain.generate(3, &Prefix::new(), &mut rng);
                assert_eq!(words.join(" "), text);
            }
        }
    }

    #[test]
    fn generate_stops_when_out_of_continuations() {
        let chain = chain_from("Here are words.", 1);
        let mut rng = StdRng::seed_from_u64(1);
        let words = chain.generate(10, &Prefix::new(), &mut rng);
        assert_eq!(words.join(" "), "Here are words.");
    }

    #[test]
    fn generate_respects_word_limit() {
        let chain = chain_from("This is a somewhat longer piece of sample text.", 1);
        let mut rng = StdRng::seed_from_u64(1);
        let words = chain.generate(2, &Prefix::new(), &mut rng);
        assert_eq!(words, vec!["This", "is"]);
    }

    #[test]
    fn generate_from_unknown_prefix_is_empty() {
        let chain = chain_from("Here are words.", 2);
        let mut rng = StdRng::seed_from_u64(1);
        let seed = Prefix::from_text("no such words", 2);
        assert!(chain.generate(5, &seed, &mut rng).is_empty());
        assert_eq!(chain.sample(&seed, &mut rng), None);
    }

    #[test]
    fn next_word_uses_trailing_words() {
        let chain = chain_from("Here is some text!", 2);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(chain.next_word("Here is some", &mut rng).as_deref(), Some("text!"));
        assert_eq!(chain.next_word("Here", &mut rng).as_deref(), Some("is"));
        assert_eq!(chain.next_word("", &mut rng).as_deref(), Some("Here"));
    }

    #[test]
    fn sample_truncates_long_prefix() {
        let chain = chain_from("one two three four", 2);
        let mut rng = StdRng::seed_from_u64(1);
        let long = Prefix::from_text("one two three", 5);
        assert_eq!(long.len(), 3);
        assert_eq!(chain.sample(&long, &mut rng), Some("four"));
    }

    #[test]
    fn prefix_push_slides_window() {
        let mut prefix = Prefix::from_text("I am", 2);
        prefix.push("a", 2);
        assert_eq!(prefix.to_string(), "am a");

        let mut short = Prefix::from_text("I", 2);
        short.push("am", 2);
        assert_eq!(short.to_string(), "I am");

        let mut empty = Prefix::new();
        empty.push("I", 2);
        assert_eq!(empty.to_string(), "I");
    }

    #[test]
    fn prefix_ignores_extra_whitespace() {
        for text in [" I have", "I  have", "I have "] {
            let mut prefix = Prefix::from_text(text, 2);
            prefix.push("a", 2);
            assert_eq!(prefix.to_string(), "have a");
        }
    }

    #[test]
    fn add_chain_start_registers_opening_only() {
        let mut chain = chain_from("This is a sentence.", 2);
        chain.add_chain_start("I have some text.");
        assert_chain(
            &chain,
            &[
                ("", &["This", "I"][..]),
                ("This", &["is"][..]),
                ("This is", &["a"][..]),
                ("is a", &["sentence."][..]),
                ("I", &["have"][..]),
            ],
        );
    }

    #[test]
    fn add_chain_start_unigram() {
        let mut chain = chain_from("This is a sentence.", 1);
        chain.add_chain_start("I have some text.");
        assert_chain(
            &chain,
            &[
                ("", &["This", "I"][..]),
                ("This", &["is"][..]),
                ("is", &["a"][..]),
                ("a", &["sentence."][..]),
            ],
        );
    }

    #[test]
    fn add_chain_start_trigram() {
        let mut chain = chain_from("This is a sentence.", 3);
        chain.add_chain_start("I have some text here.");
        assert_chain(
            &chain,
            &[
                ("", &["This", "I"][..]),
                ("This", &["is"][..]),
                ("This is", &["a"][..]),
                ("This is a", &["sentence."][..]),
                ("I", &["have"][..]),
                ("I have", &["some"][..]),
            ],
        );
    }

    #[test]
    fn every_sentence_is_an_entry_point() {
        let expected: &[(&str, &[&str])] = &[
            ("", &["Here", "It"][..]),
            ("Here", &["is"][..]),
            ("It", &["is"][..]),
            ("Here is", &["some"][..]),
            ("is some", &["text."][..]),
            ("some text.", &["It"][..]),
            ("text. It", &["is"][..]),
            ("It is", &["not"][..]),
            ("is not", &["long."][..]),
        ];
        for text in ["Here is some text. It is not long.", "Here is some text.\nIt is not long.\n"] {
            let chain = MarkovChain::from_texts([text], 2).unwrap();
            assert_chain(&chain, expected);
        }
    }

    #[test]
    fn counts_and_entry_points() {
        let chain = MarkovChain::from_texts(["I am a cat!", "I am a rat."], 2).unwrap();
        assert_eq!(chain.entry_points(), ["I", "I"]);
        assert_eq!(chain.prefix_count(), 4);
        assert_eq!(chain.transition_count(), 8);
        assert_eq!(chain.iter().count(), 4);
    }
}
