//! Markov Haiku — short 5-7-5 poems from a statistical model of a corpus.
//!
//! A bounded-order Markov chain is trained on input text, lines are sampled
//! from it under a syllable budget checked against a pronunciation oracle,
//! and the finished poem is cleaned of dangling quotes and brackets.

pub mod core;
pub mod schema;
