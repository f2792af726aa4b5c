/// Corpus Stats — inspects the chain a corpus produces and how much of it
/// the pronunciation oracle can count.
///
/// Usage: corpus_stats <file.txt>... [--prefix-len <n>] [--dict <cmudict>] [--top <n>]
use anyhow::{Context, Result};
use clap::Parser;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use markov_haiku::core::markov::MarkovChain;
use markov_haiku::core::pronounce::{normalize, CmuDict, HeuristicPronouncer, Pronouncer};
use markov_haiku::core::sentences::split_sentences;

#[derive(Parser, Debug)]
#[command(name = "corpus_stats", about = "Report chain and dictionary statistics for a corpus.")]
struct Cli {
    /// Corpus files
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Markov chain prefix length
    #[arg(short = 'l', long, default_value_t = 2)]
    prefix_len: usize,

    /// CMU pronouncing dictionary; syllables are estimated from spelling
    /// when omitted
    #[arg(short, long)]
    dict: Option<PathBuf>,

    /// How many of the most frequent unpronounceable words to list
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("markov_haiku=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let pronouncer: Box<dyn Pronouncer> = match cli.dict {
        Some(ref path) => Box::new(
            CmuDict::load(path).with_context(|| format!("loading '{}'", path.display()))?,
        ),
        None => Box::new(HeuristicPronouncer),
    };

    let mut texts = Vec::with_capacity(cli.input.len());
    for path in &cli.input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading '{}'", path.display()))?;
        texts.push(text);
    }

    println!(
        "Training {}-word-prefix chain from {} file(s)...",
        cli.prefix_len,
        texts.len()
    );
    let chain = MarkovChain::from_texts(&texts, cli.prefix_len)?;
    let dead_ends = chain.iter().filter(|(_, words)| words.is_empty()).count();
    println!(
        "Chain built: {} unique prefixes, {} transitions, {} entry points, {} empty prefixes",
        chain.prefix_count(),
        chain.transition_count(),
        chain.entry_points().len(),
        dead_ends
    );

    let sentences: usize = texts
        .iter()
        .map(|t| split_sentences(&t.lines().collect::<Vec<_>>().join(" ")).len())
        .sum();
    println!("Sentences: {}", sentences);

    let mut total = 0usize;
    let mut counted = 0usize;
    let mut syllables = 0usize;
    let mut missing: FxHashMap<String, usize> = FxHashMap::default();
    for word in texts.iter().flat_map(|t| t.split_whitespace()) {
        total += 1;
        match pronouncer.syllable_count(word) {
            Some(n) => {
                counted += 1;
                syllables += n;
            }
            None => *missing.entry(normalize(word)).or_default() += 1,
        }
    }

    let coverage = if total == 0 {
        0.0
    } else {
        counted as f64 * 100.0 / total as f64
    };
    println!(
        "Pronounceable words: {}/{} ({:.1}%), {:.2} syllables per word",
        counted,
        total,
        coverage,
        if counted == 0 { 0.0 } else { syllables as f64 / counted as f64 }
    );

    if !missing.is_empty() {
        let mut missing: Vec<(String, usize)> = missing.into_iter().collect();
        missing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        println!("\nMost frequent words without a pronunciation:");
        for (word, count) in missing.iter().take(cli.top) {
            println!("  {:>6}  {:?}", count, word);
        }
    }

    Ok(())
}
