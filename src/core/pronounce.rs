/// Pronunciation oracle — dictionary membership and syllable counts.

use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PronounceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dictionary entry on line {line}: {text:?}")]
    Malformed { line: usize, text: String },
}

/// Answers whether a word can be pronounced and how many syllables it has.
///
/// Implementations normalize words with [`normalize`] before lookup, so
/// corpus tokens such as `"Whale!"` can be passed as they are.
pub trait Pronouncer {
    fn has_pronunciation(&self, word: &str) -> bool;

    /// Syllable count of `word`, or `None` when it has no pronunciation.
    fn syllable_count(&self, word: &str) -> Option<usize>;
}

/// Reduce a corpus token to its lookup form: trimmed, stripped of
/// surrounding punctuation, lowercase.
pub fn normalize(word: &str) -> String {
    word.trim()
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// Syllable counts loaded from the CMU Pronouncing Dictionary format.
///
/// Each line is `WORD  PH1 PH2 ...`; alternate pronunciations are written
/// `WORD(1)` and lines starting with `;;;` are comments. Only the first
/// pronunciation of a word is kept. Vowel phones carry a stress digit, so
/// the syllable count is the number of phones containing a digit.
#[derive(Debug, Clone, Default)]
pub struct CmuDict {
    syllables: FxHashMap<String, usize>,
}

impl CmuDict {
    pub fn parse(contents: &str) -> Result<Self, PronounceError> {
        let mut syllables = FxHashMap::default();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(word), Some(_)) = (fields.next(), fields.clone().next()) else {
                return Err(PronounceError::Malformed {
                    line: index + 1,
                    text: line.to_string(),
                });
            };
            let vowels = fields
                .filter(|phone| phone.chars().any(|c| c.is_ascii_digit()))
                .count();
            syllables
                .entry(strip_variant(word).to_lowercase())
                .or_insert(vowels);
        }
        Ok(Self { syllables })
    }

    /// Load a dictionary file. The upstream file is Latin-1, so bytes that
    /// are not valid UTF-8 are replaced rather than rejected.
    pub fn load(path: &Path) -> Result<Self, PronounceError> {
        let bytes = std::fs::read(path)?;
        let dict = Self::parse(&String::from_utf8_lossy(&bytes))?;
        info!(path = %path.display(), words = dict.len(), "loaded pronouncing dictionary");
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }
}

/// `"READ(1)"` -> `"READ"`.
fn strip_variant(word: &str) -> &str {
    match word.find('(') {
        Some(open) if open > 0 && word.ends_with(')') => &word[..open],
        _ => word,
    }
}

impl Pronouncer for CmuDict {
    fn has_pronunciation(&self, word: &str) -> bool {
        self.syllables.contains_key(&normalize(word))
    }

    fn syllable_count(&self, word: &str) -> Option<usize> {
        self.syllables.get(&normalize(word)).copied()
    }
}

/// Dictionary-free fallback that estimates English syllables from spelling.
///
/// Any purely alphabetic word (apostrophes allowed) is pronounceable. The
/// count is the number of vowel groups, less a silent final `e`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPronouncer;

impl HeuristicPronouncer {
    fn is_vowel(c: char) -> bool {
        matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
    }

    fn estimate(word: &str) -> usize {
        let letters: Vec<char> = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        let mut groups = 0;
        let mut in_vowel = false;
        for &c in &letters {
            let vowel = Self::is_vowel(c);
            if vowel && !in_vowel {
                groups += 1;
            }
            in_vowel = vowel;
        }

        // "make" drops the e, "table" keeps it
        let n = letters.len();
        if groups > 1
            && n > 2
            && letters[n - 1] == 'e'
            && !Self::is_vowel(letters[n - 2])
            && !(letters[n - 2] == 'l' && !Self::is_vowel(letters[n - 3]))
        {
            groups -= 1;
        }
        groups.max(1)
    }
}

impl Pronouncer for HeuristicPronouncer {
    fn has_pronunciation(&self, word: &str) -> bool {
        let word = normalize(word);
        word.chars().any(|c| c.is_ascii_alphabetic())
            && word.chars().all(|c| c.is_ascii_alphabetic() || c == '\'')
    }

    fn syllable_count(&self, word: &str) -> Option<usize> {
        if !self.has_pronunciation(word) {
            return None;
        }
        Some(Self::estimate(&normalize(word)))
    }
}
