/// Syllable-constrained line sampling and poem assembly.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::markov::{MarkovChain, Prefix};
use crate::core::pronounce::Pronouncer;
use crate::core::punctuation;
use crate::schema::poem::{Line, Poem};

/// Syllables per line.
pub const SYLLABLE_PATTERN: [usize; 3] = [5, 7, 5];
/// Samples drawn when looking for one acceptable word.
pub const WORD_TRIES: u32 = 100;
/// Whole lines generated when looking for a final line with an ending.
pub const LINE_TRIES: u32 = 100;
/// Characters that may end the final line.
pub const END_PUNCTUATION: &[char] = &['.', '!', '?'];

/// Why a bounded search gave up. Always recoverable by starting the poem over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Exhaustion {
    #[error("no word fits the remaining {remaining} syllables after {tries} tries")]
    NoFittingWord { remaining: usize, tries: u32 },
    #[error("the chain has no continuation after {0:?}")]
    DeadEnd(String),
    #[error("no line ended in terminal punctuation after {0} tries")]
    NoEndPunctuation(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HaikuError {
    #[error("generation exhausted: {0}")]
    GenerationExhausted(#[from] Exhaustion),
    #[error("no poem found after {0} attempts")]
    GenerationImpossible(u32),
}

/// Samples 5-7-5 poems from a chain, checking words against a pronouncer.
pub struct HaikuGenerator<'a, P: Pronouncer + ?Sized> {
    chain: &'a MarkovChain,
    pronouncer: &'a P,
    max_attempts: Option<u32>,
}

impl<'a, P: Pronouncer + ?Sized> HaikuGenerator<'a, P> {
    pub fn new(chain: &'a MarkovChain, pronouncer: &'a P) -> Self {
        Self {
            chain,
            pronouncer,
            max_attempts: None,
        }
    }

    /// Cap the number of whole-poem attempts. `None` retries forever, which
    /// never returns on a corpus that cannot produce a poem.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sample a word continuing `seed_text` that is pronounceable and has at
    /// most `remaining` syllables. Returns the word and its syllable count.
    pub fn next_word<R: Rng + ?Sized>(
        &self,
        seed_text: &str,
        remaining: usize,
        rng: &mut R,
    ) -> Result<(String, usize), HaikuError> {
        for _ in 0..WORD_TRIES {
            let Some(word) = self.chain.next_word(seed_text, rng) else {
                // Same seed, same empty candidate list: no retry can help.
                let tail = Prefix::from_text(seed_text, self.chain.prefix_len());
                return Err(Exhaustion::DeadEnd(tail.to_string()).into());
            };
            if !self.pronouncer.has_pronunciation(&word) {
                continue;
            }
            if let Some(count) = self.pronouncer.syllable_count(&word) {
                if count <= remaining {
                    return Ok((word, count));
                }
            }
        }
        Err(Exhaustion::NoFittingWord {
            remaining,
            tries: WORD_TRIES,
        }
        .into())
    }

    /// Generate a line of exactly `syllables` syllables continuing
    /// `previous_text`.
    pub fn generate_line<R: Rng + ?Sized>(
        &self,
        syllables: usize,
        previous_text: &str,
        rng: &mut R,
    ) -> Result<Line, HaikuError> {
        let mut seed_text = previous_text.to_string();
        let mut line = Line::new();
        let mut remaining = syllables;
        while remaining > 0 {
            let (word, count) = self.next_word(&seed_text, remaining, rng)?;
            seed_text.push(' ');
            seed_text.push_str(&word);
            remaining -= count;
            line.push(word, count);
        }
        Ok(line)
    }

    /// Like [`generate_line`](Self::generate_line), but the line must end in
    /// `.`, `!` or `?`. Whole lines are regenerated until one does.
    pub fn generate_final_line<R: Rng + ?Sized>(
        &self,
        syllables: usize,
        previous_text: &str,
        rng: &mut R,
    ) -> Result<Line, HaikuError> {
        for _ in 0..LINE_TRIES {
            let line = self.generate_line(syllables, previous_text, rng)?;
            if line.last_char().is_some_and(|c| END_PUNCTUATION.contains(&c)) {
                return Ok(line);
            }
        }
        Err(Exhaustion::NoEndPunctuation(LINE_TRIES).into())
    }

    /// One try at three lines, each seeded on the text before it.
    pub fn generate_attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Poem, HaikuError> {
        let [first, second, third] = SYLLABLE_PATTERN;
        let one = self.generate_line(first, "", rng)?;
        let two = self.generate_line(second, &one.text(), rng)?;
        let seed_text = format!("{} {}", one.text(), two.text());
        let three = self.generate_final_line(third, &seed_text, rng)?;
        Ok(Poem::new([one, two, three]))
    }

    /// Generate a poem, starting over whenever an attempt is exhausted, then
    /// strip quotes and brackets left unmatched by the sampling.
    pub fn generate_poem<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Poem, HaikuError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.generate_attempt(rng) {
                Ok(poem) => {
                    info!(attempts, "generated poem");
                    return Ok(poem.with_text(&punctuation::balance(&poem.text())));
                }
                Err(HaikuError::GenerationExhausted(reason)) => {
                    debug!(attempt = attempts, %reason, "poem attempt failed");
                }
                Err(e) => return Err(e),
            }
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(HaikuError::GenerationImpossible(attempts));
            }
        }
    }
}
