mod embedding;
mod fetcher;
mod llm;
mod vector_store;

pub use embedding::EmbeddingService;
pub use fetcher::DocumentFetcher;
pub use llm::LlmService;
pub use vector_store::VectorStore;
