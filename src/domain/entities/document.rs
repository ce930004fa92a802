use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A documentation page after fetching and markup stripping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub source_url: String,
    pub title: String,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        source_url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            title: title.into(),
            content: content.into(),
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    /// Character offsets into the stripped document text.
    pub start_offset: usize,
    pub end_offset: usize,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(document_id: Uuid, content: impl Into<String>, chunk_index: usize) -> Self {
        let content = content.into();
        let len = content.chars().count();
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            chunk_index,
            start_offset: 0,
            end_offset: len,
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Provenance carried alongside each chunk so retrieval results can be cited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source_url: String,
    pub title: String,
}

impl ChunkMetadata {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            source_url: doc.source_url.clone(),
            title: doc.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// One answered chat turn: the generated text plus the chunks it was grounded
/// on, best match first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

impl QueryResult {
    pub fn new(answer: impl Into<String>, sources: Vec<SearchResult>) -> Self {
        Self {
            answer: answer.into(),
            sources,
        }
    }

    /// An answer produced without retrieval, e.g. an error notice.
    pub fn without_sources(answer: impl Into<String>) -> Self {
        Self::new(answer, Vec::new())
    }
}

/// Splits document text into overlapping fixed-size character windows.
///
/// Consecutive windows share `overlap` characters; the stride is clamped to
/// at least one character so an overlap at or above `chunk_size` still makes
/// progress. Offsets are recorded per chunk. Whitespace-only input yields no
/// chunks.
pub fn chunk_document(doc: &Document, chunk_size: usize, overlap: usize) -> Vec<DocumentChunk> {
    let text = doc.content.trim();
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let stride = chunk_size.saturating_sub(overlap).max(1);
    let metadata = ChunkMetadata::from_document(doc);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chunk_index = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let content: String = chars[start..end].iter().collect();

        chunks.push(
            DocumentChunk::new(doc.id, content, chunk_index)
                .with_span(start, end)
                .with_metadata(metadata.clone()),
        );
        chunk_index += 1;

        if end == chars.len() {
            break;
        }
        start += stride;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document::new("https://example.com/page", "Example", content)
    }

    #[test]
    fn test_chunk_document_single_chunk() {
        let d = doc("short text that fits in one window");
        let chunks = chunk_document(&d, 100, 20);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, d.content);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].metadata.source_url, "https://example.com/page");
    }

    #[test]
    fn test_chunk_document_overlapping_windows() {
        let d = doc(&"a".repeat(25));
        let chunks = chunk_document(&d, 10, 5);

        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].end_offset, 10);
        assert_eq!(chunks[1].start_offset, 5);
        assert_eq!(chunks[1].end_offset, 15);
        assert!(chunks.last().unwrap().end_offset == 25);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i);
            assert_eq!(c.document_id, d.id);
        }
    }

    #[test]
    fn test_chunk_document_overlap_at_least_stride_one() {
        let d = doc(&"x".repeat(12));
        // overlap >= chunk_size must still terminate
        let chunks = chunk_document(&d, 4, 10);

        assert!(!chunks.is_empty());
        assert_eq!(chunks.last().unwrap().end_offset, 12);
        let mut prev = 0;
        for c in &chunks[1..] {
            assert!(c.start_offset > prev);
            prev = c.start_offset;
        }
    }

    #[test]
    fn test_chunk_document_empty() {
        let d = doc("   \n\t ");
        assert!(chunk_document(&d, 100, 10).is_empty());
    }

    #[test]
    fn test_chunk_document_multibyte_boundaries() {
        let d = doc(&"é".repeat(30));
        let chunks = chunk_document(&d, 8, 2);

        assert!(chunks.iter().all(|c| c.content.chars().count() <= 8));
        assert_eq!(chunks.last().unwrap().end_offset, 30);
    }
}
