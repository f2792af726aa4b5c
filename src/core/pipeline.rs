/// The generation session: corpus → chain → poems.
///
/// Wires together chain training, the pronunciation oracle, seeded
/// sampling, and poem assembly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::{ConfigError, HaikuConfig, DEFAULT_PREFIX_LEN};
use crate::core::haiku::{HaikuError, HaikuGenerator};
use crate::core::markov::{MarkovChain, MarkovError};
use crate::core::pronounce::{CmuDict, HeuristicPronouncer, PronounceError, Pronouncer};
use crate::schema::poem::Poem;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("markov error: {0}")]
    Markov(#[from] MarkovError),
    #[error("pronunciation error: {0}")]
    Pronounce(#[from] PronounceError),
    #[error("generation error: {0}")]
    Haiku(#[from] HaikuError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no corpus text was provided")]
    NoCorpus,
    #[error("the corpus contains no words")]
    EmptyCorpus,
}

/// A trained chain plus everything needed to sample poems from it.
/// Built via `HaikuEngine::builder()`.
pub struct HaikuEngine {
    chain: MarkovChain,
    pronouncer: Box<dyn Pronouncer>,
    max_attempts: Option<u32>,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `HaikuEngine`.
pub struct HaikuEngineBuilder {
    corpus_files: Vec<PathBuf>,
    corpus_texts: Vec<String>,
    prefix_len: usize,
    dictionary: Option<PathBuf>,
    /// Directly provided oracle (for testing without files).
    pronouncer: Option<Box<dyn Pronouncer>>,
    max_attempts: Option<u32>,
    seed: u64,
}

impl HaikuEngine {
    pub fn builder() -> HaikuEngineBuilder {
        HaikuEngineBuilder {
            corpus_files: Vec::new(),
            corpus_texts: Vec::new(),
            prefix_len: DEFAULT_PREFIX_LEN,
            dictionary: None,
            pronouncer: None,
            max_attempts: None,
            seed: 0,
        }
    }

    pub fn from_config(config: &HaikuConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let mut builder = Self::builder()
            .corpus_files(&config.inputs)
            .prefix_len(config.prefix_len);
        if let Some(ref dictionary) = config.dictionary {
            builder = builder.dictionary(dictionary.clone());
        }
        if let Some(seed) = config.seed {
            builder = builder.seed(seed);
        }
        if let Some(max_attempts) = config.max_attempts {
            builder = builder.max_attempts(max_attempts);
        }
        builder.build()
    }

    pub fn chain(&self) -> &MarkovChain {
        &self.chain
    }

    pub fn pronouncer(&self) -> &dyn Pronouncer {
        self.pronouncer.as_ref()
    }

    /// Generate the next poem. Each call uses a fresh RNG derived from the
    /// engine seed, so a given seed always yields the same sequence.
    pub fn compose(&mut self) -> Result<Poem, PipelineError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count));
        let generator = HaikuGenerator::new(&self.chain, self.pronouncer.as_ref())
            .with_max_attempts(self.max_attempts);
        let poem = generator.generate_poem(&mut rng)?;
        self.generation_count += 1;
        Ok(poem)
    }

    pub fn compose_many(&mut self, count: usize) -> Result<Vec<Poem>, PipelineError> {
        (0..count).map(|_| self.compose()).collect()
    }
}

impl HaikuEngineBuilder {
    pub fn corpus_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_files.push(path.into());
        self
    }

    pub fn corpus_files(mut self, paths: &[PathBuf]) -> Self {
        self.corpus_files.extend(paths.iter().cloned());
        self
    }

    /// Provide corpus text directly (for testing without files).
    pub fn with_corpus_text(mut self, text: impl Into<String>) -> Self {
        self.corpus_texts.push(text.into());
        self
    }

    pub fn prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    pub fn dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary = Some(path.into());
        self
    }

    /// Provide a pronouncer directly (takes precedence over `dictionary`).
    pub fn with_pronouncer(mut self, pronouncer: impl Pronouncer + 'static) -> Self {
        self.pronouncer = Some(Box::new(pronouncer));
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<HaikuEngine, PipelineError> {
        if self.corpus_files.is_empty() && self.corpus_texts.is_empty() {
            return Err(PipelineError::NoCorpus);
        }

        let mut chain = MarkovChain::from_texts(&self.corpus_texts, self.prefix_len)?;
        for path in &self.corpus_files {
            chain.update_from_file(path)?;
        }
        if chain.entry_points().is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }
        info!(
            prefix_len = chain.prefix_len(),
            prefixes = chain.prefix_count(),
            transitions = chain.transition_count(),
            entry_points = chain.entry_points().len(),
            "chain ready"
        );

        let pronouncer: Box<dyn Pronouncer> = match (self.pronouncer, self.dictionary) {
            (Some(pronouncer), _) => pronouncer,
            (None, Some(path)) => Box::new(CmuDict::load(&path)?),
            (None, None) => {
                warn!("no pronouncing dictionary given, estimating syllables from spelling");
                Box::new(HeuristicPronouncer)
            }
        };

        Ok(HaikuEngine {
            chain,
            pronouncer,
            max_attempts: self.max_attempts,
            seed: self.seed,
            generation_count: 0,
        })
    }
}
