pub mod config;
pub mod embedding;
pub mod fetcher;
pub mod llm;
pub mod vector_store;

pub use config::{Config, VectorBackend};
pub use embedding::OpenAiEmbedding;
pub use fetcher::HttpFetcher;
pub use llm::OpenAiLlm;
pub use vector_store::{FileVectorStore, QdrantVectorStore};

use std::sync::Arc;
use std::time::Duration;

use crate::application::{ChatEngine, IngestionService, RetrievalService};
use crate::domain::ports::{EmbeddingService, VectorStore};
use crate::domain::DomainError;

/// Wires the configured adapters into a ready-to-initialize [`ChatEngine`].
pub async fn build_engine(config: &Config) -> Result<ChatEngine, DomainError> {
    if config.chunking.chunk_size == 0 {
        return Err(DomainError::validation(
            "CHUNK_SIZE must be greater than zero",
        ));
    }
    if config.ingestion.doc_urls.is_empty() {
        return Err(DomainError::validation(
            "DOC_URLS must list at least one page",
        ));
    }

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(
        config.ingestion.fetch_timeout_secs,
    ))?);
    let embedding = Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    let llm = Arc::new(OpenAiLlm::from_config(&config.llm));

    let vector_store: Arc<dyn VectorStore> = match config.vector_store.backend {
        VectorBackend::File => Arc::new(
            FileVectorStore::open(&config.vector_store.path, &config.vector_store.collection)
                .await?,
        ),
        VectorBackend::Qdrant => Arc::new(
            QdrantVectorStore::new(
                &config.vector_store.qdrant_url,
                &config.vector_store.collection,
                embedding.dimension(),
            )
            .await?,
        ),
    };

    let ingestion = IngestionService::new(
        fetcher,
        config.ingestion.min_content_len,
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
    );
    let retrieval = RetrievalService::new(embedding, vector_store.clone(), config.rag.top_k);

    Ok(ChatEngine::new(
        ingestion,
        retrieval,
        llm,
        vector_store,
        config.ingestion.doc_urls.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_engine_rejects_zero_chunk_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 0;

        let result = build_engine(&config).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_build_engine_rejects_empty_url_list() {
        let mut config = Config::default();
        config.ingestion.doc_urls.clear();

        let result = build_engine(&config).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_build_engine_with_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.vector_store.path = dir.path().to_path_buf();

        let engine = build_engine(&config).await.unwrap();
        assert!(!engine.is_initialized());
    }
}
