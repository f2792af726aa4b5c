/// Chain construction and generation integration tests.

use markov_haiku::core::markov::{MarkovChain, Prefix};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

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

fn moby_dick() -> String {
    std::fs::read_to_string("corpus/moby_dick.txt").unwrap()
}

#[test]
fn from_files_merges_corpora() {
    let chain = MarkovChain::from_files(&["tests/fixtures/cat.txt", "tests/fixtures/rat.txt"], 2)
        .unwrap();
    assert_chain(
        &chain,
        &[
            ("", &["I", "I"][..]),
            ("I", &["am", "am"][..]),
            ("I am", &["a", "a"][..]),
            ("am a", &["cat!", "rat."][..]),
        ],
    );
}

#[test]
fn file_sentences_are_entry_points() {
    for path in [
        "tests/fixtures/two_sentences.txt",
        "tests/fixtures/two_sentences_newline.txt",
    ] {
        let chain = MarkovChain::from_files(&[path], 2).unwrap();
        assert_chain(
            &chain,
            &[
                ("", &["Here", "It"][..]),
                ("Here", &["is"][..]),
                ("It", &["is"][..]),
                ("Here is", &["some"][..]),
                ("is some", &["text."][..]),
                ("some text.", &["It"][..]),
                ("text. It", &["is"][..]),
                ("It is", &["not"][..]),
                ("is not", &["long."][..]),
            ],
        );
    }
}

#[test]
fn missing_file_is_an_error() {
    assert!(MarkovChain::from_files(&["tests/fixtures/nope.txt"], 2).is_err());
}

#[test]
fn chain_contains_every_observed_transition() {
    let text = moby_dick();
    let tokens: Vec<&str> = text.split_whitespace().collect();

    for prefix_len in 1..=3 {
        let chain = MarkovChain::from_texts([&text], prefix_len).unwrap();

        // Ground truth from a manual scan of the whole-text pass.
        let mut observed: HashMap<(String, &str), usize> = HashMap::new();
        for (i, word) in tokens.iter().enumerate() {
            let prefix = tokens[i.saturating_sub(prefix_len)..i].join(" ");
            *observed.entry((prefix, *word)).or_default() += 1;
        }

        for ((prefix, word), count) in &observed {
            let key = Prefix::from_text(prefix, prefix_len);
            let candidates = chain
                .candidates(&key)
                .unwrap_or_else(|| panic!("missing prefix {:?}", prefix));
            let recorded = candidates.iter().filter(|c| c.as_str() == *word).count();
            assert!(
                recorded >= *count,
                "prefix {:?} records {:?} {} times, expected at least {}",
                prefix,
                word,
                recorded,
                count
            );
        }
    }
}

#[test]
fn generate_never_exceeds_request() {
    let chain = MarkovChain::from_texts([moby_dick()], 2).unwrap();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let requested = (seed as usize * 37) % 400 + 1;
        let words = chain.generate(requested, &Prefix::new(), &mut rng);
        assert!(words.len() <= requested);
        if words.len() < requested {
            // Stopped early: the final window has nothing after it.
            let tail = Prefix::from_text(&words.join(" "), 2);
            assert!(chain.candidates(&tail).map_or(true, |c| c.is_empty()));
        }
    }
}

#[test]
fn unique_continuations_round_trip() {
    let text = "the quick brown fox jumps over a lazy dog near my house";
    for prefix_len in 1..=4 {
        let chain = MarkovChain::from_texts([text], prefix_len).unwrap();
        for seed in 0..3 {
            let mut rng = StdRng::seed_from_u64(seed);
            let words = chain.generate(100, &Prefix::new(), &mut rng);
            assert_eq!(words.join(" "), text, "prefix_len {}", prefix_len);
        }
    }
}

#[test]
fn generated_words_follow_the_chain() {
    let chain = MarkovChain::from_texts([moby_dick()], 3).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let words = chain.generate(60, &Prefix::new(), &mut rng);
    assert!(chain.entry_points().contains(&words[0]));

    let mut prefix = Prefix::new();
    for word in &words {
        let candidates = chain.candidates(&prefix).unwrap();
        assert!(candidates.contains(word), "{:?} after {:?}", word, prefix.to_string());
        prefix.push(word, 3);
    }
}
