/// Haiku — generate 5-7-5 poems from a Markov chain trained on text files.
///
/// Usage: haiku [INPUT]... [--prefix-len <n>] [--dict <cmudict>] [--seed <n>]
///              [--count <n>] [--max-attempts <n>] [--config <file.ron>]
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use markov_haiku::core::config::HaikuConfig;
use markov_haiku::core::pipeline::HaikuEngine;

#[derive(Parser, Debug)]
#[command(name = "haiku", about = "Generate a haiku using Markov chains.")]
struct Cli {
    /// One or more input files to use for Markov text generation
    /// (default: corpus/moby_dick.txt)
    input: Vec<PathBuf>,

    /// Markov chain prefix length (default: 2)
    #[arg(short = 'l', long)]
    prefix_len: Option<usize>,

    /// CMU pronouncing dictionary; syllables are estimated from spelling
    /// when omitted
    #[arg(short, long)]
    dict: Option<PathBuf>,

    /// Seed for reproducible output (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of poems to print
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Give up after this many whole-poem attempts instead of retrying forever
    #[arg(long)]
    max_attempts: Option<u32>,

    /// RON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<HaikuConfig> {
        let mut config = match self.config {
            Some(ref path) => HaikuConfig::load_from_ron(path)
                .with_context(|| format!("reading config '{}'", path.display()))?,
            None => HaikuConfig::default(),
        };
        if !self.input.is_empty() {
            config.inputs = self.input;
        }
        if let Some(prefix_len) = self.prefix_len {
            config.prefix_len = prefix_len;
        }
        if self.dict.is_some() {
            config.dictionary = self.dict;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if self.max_attempts.is_some() {
            config.max_attempts = self.max_attempts;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("markov_haiku=info".parse()?),
        )
        .init();

    let mut config = Cli::parse().into_config()?;
    let seed = *config.seed.get_or_insert_with(rand::random);
    info!(seed, inputs = ?config.inputs, "building chain");

    let mut engine = HaikuEngine::from_config(&config).context("building haiku engine")?;
    let poems = engine
        .compose_many(config.count)
        .context("generating poems")?;

    for (i, poem) in poems.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", poem);
    }
    Ok(())
}
