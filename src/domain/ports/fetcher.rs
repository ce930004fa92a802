use crate::domain::{errors::DomainError, Document};
use async_trait::async_trait;

/// Retrieves a single page and returns it stripped to plain text.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, DomainError>;
}
