pub mod config;
pub mod haiku;
pub mod markov;
pub mod pipeline;
pub mod pronounce;
pub mod punctuation;
pub mod sentences;
