mod file;
mod qdrant;

pub use file::FileVectorStore;
pub use qdrant::QdrantVectorStore;
