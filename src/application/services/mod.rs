mod chat;
mod ingest;
mod retrieval;

pub use chat::ChatEngine;
pub use ingest::IngestionService;
pub use retrieval::RetrievalService;
