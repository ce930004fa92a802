mod conversation;
mod document;
mod embedding;

pub use conversation::{Conversation, Message, MessageRole};
pub use document::{
    chunk_document, ChunkMetadata, Document, DocumentChunk, QueryResult, SearchResult,
};
pub use embedding::Embedding;
