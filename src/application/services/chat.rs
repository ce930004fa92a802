use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::application::services::{IngestionService, RetrievalService};
use crate::domain::{
    ports::{LlmService, VectorStore},
    Conversation, DomainError, MessageRole, QueryResult, SearchResult,
};

const NOT_INITIALIZED_MESSAGE: &str =
    "The assistant is not initialized yet. Please restart the application.";

const SYSTEM_PROMPT: &str = "You are a documentation assistant. Answer the user's question using \
    the provided documentation excerpts. If the excerpts do not contain the answer, say so \
    instead of guessing. Keep answers concise and cite concepts from the excerpts where relevant.";

/// Orchestrates the full question-answering loop: one-time index
/// construction, per-query retrieval, prompt composition, and conversation
/// memory. Owns the memory buffer for a single session.
pub struct ChatEngine {
    ingestion: IngestionService,
    retrieval: RetrievalService,
    llm: Arc<dyn LlmService>,
    vector_store: Arc<dyn VectorStore>,
    memory: Mutex<Conversation>,
    initialized: AtomicBool,
    doc_urls: Vec<String>,
}

impl ChatEngine {
    pub fn new(
        ingestion: IngestionService,
        retrieval: RetrievalService,
        llm: Arc<dyn LlmService>,
        vector_store: Arc<dyn VectorStore>,
        doc_urls: Vec<String>,
    ) -> Self {
        Self {
            ingestion,
            retrieval,
            llm,
            vector_store,
            memory: Mutex::new(Conversation::new()),
            initialized: AtomicBool::new(false),
            doc_urls,
        }
    }

    /// Builds the index on first run, or reuses an existing one.
    ///
    /// When the vector store already holds entries (a persisted index was
    /// loaded), no pages are fetched and nothing is re-embedded.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), DomainError> {
        let existing = self.vector_store.count().await?;
        if existing > 0 {
            info!(chunks = existing, "reusing existing vector index");
            self.initialized.store(true, Ordering::SeqCst);
            return Ok(());
        }

        let documents = self.ingestion.fetch_all(&self.doc_urls).await;
        if documents.is_empty() {
            return Err(DomainError::internal(
                "no documentation pages could be loaded",
            ));
        }

        let chunks = self.ingestion.chunk_all(&documents);
        self.retrieval.index_chunks(&chunks).await?;
        self.vector_store.persist().await?;

        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "vector index built"
        );
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Answers one user message.
    ///
    /// Never fails: before initialization a fixed notice is returned, and a
    /// failed turn is converted into a user-visible error string. Memory is
    /// only updated on successful turns.
    pub async fn chat(&self, message: &str) -> QueryResult {
        if !self.is_initialized() {
            return QueryResult::without_sources(NOT_INITIALIZED_MESSAGE);
        }

        match self.answer(message).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "chat turn failed");
                QueryResult::without_sources(format!("Error: {e}"))
            }
        }
    }

    #[instrument(skip(self, message))]
    async fn answer(&self, message: &str) -> Result<QueryResult, DomainError> {
        let sources = self.retrieval.retrieve(message).await?;

        let prompt = {
            let memory = self.memory.lock().await;
            build_prompt(message, &memory, &sources)
        };

        let answer = self.llm.complete_with_system(SYSTEM_PROMPT, &prompt).await?;

        let mut memory = self.memory.lock().await;
        memory.add_message(MessageRole::User, message);
        memory.add_message(MessageRole::Assistant, &answer);

        Ok(QueryResult::new(answer, sources))
    }

    /// Drops the conversation history for this session.
    pub async fn clear_memory(&self) {
        self.memory.lock().await.clear();
        info!("conversation memory cleared");
    }
}

fn build_prompt(message: &str, memory: &Conversation, sources: &[SearchResult]) -> String {
    let mut prompt = String::new();

    if !sources.is_empty() {
        prompt.push_str("Documentation excerpts:\n");
        for (i, result) in sources.iter().enumerate() {
            prompt.push_str(&format!(
                "[{}] ({})\n{}\n\n",
                i + 1,
                result.chunk.metadata.source_url,
                result.chunk.content
            ));
        }
    }

    if !memory.is_empty() {
        prompt.push_str("Previous conversation:\n");
        for m in &memory.messages {
            prompt.push_str(&format!("{}: {}\n", m.role.as_str(), m.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("Question: {message}"));
    prompt
}
