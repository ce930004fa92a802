//! Application layer - use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! adapters, so the whole pipeline can be exercised with stub
//! implementations in tests.

pub mod services;

pub use services::{ChatEngine, IngestionService, RetrievalService};
