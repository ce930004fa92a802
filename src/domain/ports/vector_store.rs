use crate::domain::{errors::DomainError, DocumentChunk, Embedding, SearchResult};
use async_trait::async_trait;

/// Nearest-neighbor store over (chunk, embedding) pairs.
///
/// `upsert` replaces any existing entry with the same chunk id. `search`
/// returns the `top_k` closest chunks by cosine similarity, best first, and
/// only ever returns chunks present in the backing store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunk: &DocumentChunk, embedding: &Embedding)
        -> Result<(), DomainError>;

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;

    /// Number of stored entries. Non-zero after loading an existing index.
    async fn count(&self) -> Result<usize, DomainError>;

    /// Flushes the index to durable storage. No-op for server-backed stores.
    async fn persist(&self) -> Result<(), DomainError>;
}
