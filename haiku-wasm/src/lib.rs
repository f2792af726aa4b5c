//! WASM bindings for markov-haiku — powers the interactive web demo.

use wasm_bindgen::prelude::*;

use markov_haiku::core::pipeline::HaikuEngine;
use markov_haiku::core::pronounce::HeuristicPronouncer;

// ---------------------------------------------------------------------------
// Embedded corpora — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const MOBY_DICK: &str = include_str!("../../corpus/moby_dick.txt");
}

/// A browser tab must not spin forever on a corpus that cannot yield a poem.
const MAX_ATTEMPTS: u32 = 10_000;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct PoemInfo {
    text: String,
    lines: Vec<String>,
    syllables: [usize; 3],
}

#[derive(serde::Serialize)]
struct ChainInfo {
    corpus: String,
    prefix_len: usize,
    prefixes: usize,
    transitions: usize,
    entry_points: usize,
}

// ---------------------------------------------------------------------------
// HaikuDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct HaikuDemo {
    engine: HaikuEngine,
    corpus: String,
}

#[wasm_bindgen]
impl HaikuDemo {
    /// Create a demo over one of the embedded corpora.
    #[wasm_bindgen(constructor)]
    pub fn new(corpus: &str, prefix_len: usize, seed: u64) -> Result<HaikuDemo, JsError> {
        let text = match corpus {
            "moby_dick" => data::MOBY_DICK,
            _ => return Err(JsError::new(&format!("Unknown corpus: {corpus}"))),
        };
        Self::build(corpus, text, prefix_len, seed)
    }

    /// Create a demo over text supplied by the page.
    pub fn from_text(text: &str, prefix_len: usize, seed: u64) -> Result<HaikuDemo, JsError> {
        Self::build("custom", text, prefix_len, seed)
    }

    fn build(name: &str, text: &str, prefix_len: usize, seed: u64) -> Result<HaikuDemo, JsError> {
        let engine = HaikuEngine::builder()
            .with_corpus_text(text)
            .prefix_len(prefix_len)
            .with_pronouncer(HeuristicPronouncer)
            .max_attempts(MAX_ATTEMPTS)
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(HaikuDemo {
            engine,
            corpus: name.to_string(),
        })
    }

    /// Generate the next poem as newline-separated text.
    pub fn compose(&mut self) -> Result<String, JsError> {
        self.engine
            .compose()
            .map(|poem| poem.to_string())
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))
    }

    /// Generate `count` poems. Returns a JSON array of
    /// `{ text, lines, syllables }` objects.
    pub fn compose_many(&mut self, count: usize) -> Result<String, JsError> {
        let poems = self
            .engine
            .compose_many(count)
            .map_err(|e| JsError::new(&format!("Generation error: {e}")))?;
        let infos: Vec<PoemInfo> = poems
            .iter()
            .map(|poem| PoemInfo {
                text: poem.to_string(),
                lines: poem.lines().iter().map(|l| l.text()).collect(),
                syllables: poem.syllable_pattern(),
            })
            .collect();
        serde_json::to_string(&infos)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON description of the trained chain.
    pub fn get_chain_info(&self) -> Result<String, JsError> {
        let chain = self.engine.chain();
        let info = ChainInfo {
            corpus: self.corpus.clone(),
            prefix_len: chain.prefix_len(),
            prefixes: chain.prefix_count(),
            transitions: chain.transition_count(),
            entry_points: chain.entry_points().len(),
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return JSON array of embedded corpus identifiers.
    pub fn available_corpora() -> String {
        serde_json::to_string(&["moby_dick"]).unwrap_or_else(|_| "[]".to_string())
    }
}
