use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::{chunk_document, ports::DocumentFetcher, Document, DocumentChunk};

/// Fetches the configured documentation pages and prepares them for indexing.
///
/// Individual fetch failures are logged and skipped; pages whose stripped
/// text is at or below `min_content_len` are dropped before chunking.
pub struct IngestionService {
    fetcher: Arc<dyn DocumentFetcher>,
    min_content_len: usize,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IngestionService {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        min_content_len: usize,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            fetcher,
            min_content_len,
            chunk_size,
            chunk_overlap,
        }
    }

    #[instrument(skip(self, urls), fields(url_count = urls.len()))]
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<Document> {
        let mut documents = Vec::new();

        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(doc) => {
                    // Threshold is in characters, not bytes.
                    let content_chars = doc.content.chars().count();
                    if content_chars <= self.min_content_len {
                        info!(url = %url, chars = content_chars, "skipping page below content threshold");
                        continue;
                    }
                    info!(url = %url, title = %doc.title, "loaded page");
                    documents.push(doc);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "failed to fetch page, skipping");
                }
            }
        }

        info!(loaded = documents.len(), "document fetch finished");
        documents
    }

    pub fn chunk(&self, doc: &Document) -> Vec<DocumentChunk> {
        chunk_document(doc, self.chunk_size, self.chunk_overlap)
    }

    #[instrument(skip(self, documents), fields(doc_count = documents.len()))]
    pub fn chunk_all(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        let chunks: Vec<DocumentChunk> = documents.iter().flat_map(|d| self.chunk(d)).collect();
        info!(chunk_count = chunks.len(), "documents split into chunks");
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use async_trait::async_trait;

    struct FlakyFetcher;

    #[async_trait]
    impl DocumentFetcher for FlakyFetcher {
        async fn fetch(&self, url: &str) -> Result<Document, DomainError> {
            if url.contains("broken") {
                return Err(DomainError::external("connection refused"));
            }
            if url.contains("thin") {
                return Ok(Document::new(url, "Thin", "too short"));
            }
            if url.contains("accented") {
                // 150 characters but 300 bytes; still below the threshold
                return Ok(Document::new(url, "Accented", "é".repeat(150)));
            }
            Ok(Document::new(url, "Page", "x".repeat(500)))
        }
    }

    fn service() -> IngestionService {
        IngestionService::new(Arc::new(FlakyFetcher), 200, 100, 20)
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_abort_remaining_urls() {
        let urls = vec![
            "https://docs.test/a".to_string(),
            "https://docs.test/broken".to_string(),
            "https://docs.test/b".to_string(),
        ];

        let docs = service().fetch_all(&urls).await;

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source_url, "https://docs.test/a");
        assert_eq!(docs[1].source_url, "https://docs.test/b");
    }

    #[tokio::test]
    async fn test_thin_pages_excluded_from_document_set() {
        let urls = vec![
            "https://docs.test/thin".to_string(),
            "https://docs.test/full".to_string(),
        ];

        let docs = service().fetch_all(&urls).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source_url, "https://docs.test/full");
    }

    #[tokio::test]
    async fn test_threshold_counts_characters_not_bytes() {
        let urls = vec![
            "https://docs.test/accented".to_string(),
            "https://docs.test/full".to_string(),
        ];

        let docs = service().fetch_all(&urls).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source_url, "https://docs.test/full");
    }

    #[tokio::test]
    async fn test_chunk_all_carries_provenance() {
        let docs = service()
            .fetch_all(&["https://docs.test/one".to_string()])
            .await;
        let chunks = service().chunk_all(&docs);

        assert!(!chunks.is_empty());
        assert!(chunks
            .iter()
            .all(|c| c.metadata.source_url == "https://docs.test/one"));
    }
}
