use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::fs;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

#[derive(Serialize, Deserialize)]
struct Snapshot {
    entries: Vec<Entry>,
}

#[derive(Clone, Serialize, Deserialize)]
struct Entry {
    chunk: DocumentChunk,
    embedding: Embedding,
}

/// In-process vector index persisted as a JSON snapshot at
/// `{dir}/{collection}.json`.
///
/// `open` loads an existing snapshot when one is present, so restarts reuse
/// the index instead of rebuilding it. `persist` writes the snapshot
/// atomically via a temp file and rename.
pub struct FileVectorStore {
    entries: RwLock<Vec<Entry>>,
    file_path: PathBuf,
}

impl FileVectorStore {
    pub async fn open(dir: impl AsRef<Path>, collection: &str) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let file_path = dir.join(format!("{collection}.json"));

        let entries = if file_path.exists() {
            let raw = fs::read_to_string(&file_path)
                .await
                .map_err(|e| DomainError::internal(e.to_string()))?;
            let snapshot: Snapshot =
                serde_json::from_str(&raw).map_err(|e| DomainError::internal(e.to_string()))?;
            snapshot.entries
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            file_path,
        })
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn upsert(
        &self,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|e| e.chunk.id != chunk.id);
        entries.push(Entry {
            chunk: chunk.clone(),
            embedding: embedding.clone(),
        });
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut scored: Vec<SearchResult> = entries
            .iter()
            .map(|e| SearchResult {
                chunk: e.chunk.clone(),
                score: query.cosine_similarity(&e.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(entries.len())
    }

    async fn persist(&self) -> Result<(), DomainError> {
        let snapshot = {
            let entries = self
                .entries
                .read()
                .map_err(|e| DomainError::internal(e.to_string()))?;
            Snapshot {
                entries: entries.clone(),
            }
        };

        let json = serde_json::to_string(&snapshot)
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)
            .await
            .map_err(|e| DomainError::internal(e.to_string()))?;
        fs::rename(&tmp_path, &self.file_path)
            .await
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_upsert_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::open(dir.path(), "docs").await.unwrap();
        let doc_id = Uuid::new_v4();

        store
            .upsert(
                &DocumentChunk::new(doc_id, "about retrieval", 0),
                &Embedding::new(vec![1.0, 0.0, 0.0]),
            )
            .await
            .unwrap();
        store
            .upsert(
                &DocumentChunk::new(doc_id, "about memory", 1),
                &Embedding::new(vec![0.0, 1.0, 0.0]),
            )
            .await
            .unwrap();

        let results = store
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "about retrieval");
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_chunk_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::open(dir.path(), "docs").await.unwrap();

        let mut chunk = DocumentChunk::new(Uuid::new_v4(), "old text", 0);
        store
            .upsert(&chunk, &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();

        chunk.content = "new text".to_string();
        store
            .upsert(&chunk, &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let results = store
            .search(&Embedding::new(vec![1.0, 0.0]), 10)
            .await
            .unwrap();
        assert_eq!(results[0].chunk.content, "new text");
    }

    #[tokio::test]
    async fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let chunk = DocumentChunk::new(Uuid::new_v4(), "durable chunk", 0);

        {
            let store = FileVectorStore::open(dir.path(), "docs").await.unwrap();
            store
                .upsert(&chunk, &Embedding::new(vec![0.5, 0.5]))
                .await
                .unwrap();
            store.persist().await.unwrap();
        }

        let reopened = FileVectorStore::open(dir.path(), "docs").await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);

        let results = reopened
            .search(&Embedding::new(vec![0.5, 0.5]), 1)
            .await
            .unwrap();
        assert_eq!(results[0].chunk.id, chunk.id);
        assert_eq!(results[0].chunk.content, "durable chunk");
    }

    #[tokio::test]
    async fn test_open_fresh_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileVectorStore::open(dir.path(), "docs").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        let results = store
            .search(&Embedding::new(vec![1.0]), 5)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_isolated_files() {
        let dir = tempfile::tempdir().unwrap();

        let a = FileVectorStore::open(dir.path(), "alpha").await.unwrap();
        a.upsert(
            &DocumentChunk::new(Uuid::new_v4(), "alpha chunk", 0),
            &Embedding::new(vec![1.0]),
        )
        .await
        .unwrap();
        a.persist().await.unwrap();

        let b = FileVectorStore::open(dir.path(), "beta").await.unwrap();
        assert_eq!(b.count().await.unwrap(), 0);
    }
}
