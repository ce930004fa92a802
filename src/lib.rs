//! Retrieval-augmented question answering over a fixed documentation set.
//!
//! The pipeline: fetch pages and strip markup, split text into overlapping
//! chunks, embed them into a persisted vector index, then answer each query
//! by retrieving the closest chunks and prompting a language model with the
//! retrieved context plus conversation history.

pub mod application;
pub mod domain;
pub mod infrastructure;
