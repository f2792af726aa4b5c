use serde::{Deserialize, Serialize};
use std::fmt;

/// A line of generated words with its running syllable total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    words: Vec<String>,
    syllables: usize,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word that has already been counted.
    pub fn push(&mut self, word: impl Into<String>, syllables: usize) {
        self.words.push(word.into());
        self.syllables += syllables;
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn syllables(&self) -> usize {
        self.syllables
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words joined by single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn last_char(&self) -> Option<char> {
        self.words.last().and_then(|w| w.chars().last())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// A finished three-line poem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    lines: [Line; 3],
}

impl Poem {
    pub fn new(lines: [Line; 3]) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line; 3] {
        &self.lines
    }

    /// Syllable totals of the three lines.
    pub fn syllable_pattern(&self) -> [usize; 3] {
        [
            self.lines[0].syllables,
            self.lines[1].syllables,
            self.lines[2].syllables,
        ]
    }

    /// The poem as newline-separated lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the words of every line with the matching line of `text`,
    /// keeping syllable totals. Used after a cleanup pass that only removes
    /// characters within lines.
    pub fn with_text(&self, text: &str) -> Poem {
        let mut rows = text.split('\n');
        let lines = self.lines.clone().map(|line| Line {
            words: rows
                .next()
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            syllables: line.syllables,
        });
        Poem { lines }
    }
}

impl fmt::Display for Poem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
