//! Nomiko - legal document analysis.
//!
//! Runs clause summaries, glossaries, fairness benchmarks, contradiction
//! detection, reverse Q&A and chat over a document through a hosted or local
//! LLM, and keeps a store of recently analyzed documents.

// Model types use `from_str` methods that return Option<Self>,
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod actions;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
