use std::path::PathBuf;

const DEFAULT_DOC_URLS: &[&str] = &[
    "https://python.langchain.com/docs/get_started/introduction",
    "https://python.langchain.com/docs/modules/data_connection/document_loaders/",
    "https://python.langchain.com/docs/modules/data_connection/text_splitters/",
    "https://python.langchain.com/docs/modules/data_connection/vectorstores/",
    "https://python.langchain.com/docs/modules/model_io/llms/",
    "https://python.langchain.com/docs/modules/chains/",
    "https://python.langchain.com/docs/use_cases/question_answering/",
    "https://python.langchain.com/docs/modules/memory/",
    "https://python.langchain.com/docs/modules/agents/",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub ingestion: IngestionConfig,
    pub chunking: ChunkingConfig,
    pub vector_store: VectorStoreConfig,
    pub rag: RagConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub doc_urls: Vec<String>,
    pub fetch_timeout_secs: u64,
    pub min_content_len: usize,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorBackend {
    File,
    Qdrant,
}

#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub backend: VectorBackend,
    pub path: PathBuf,
    pub collection: String,
    pub qdrant_url: String,
}

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub top_k: usize,
}

impl Config {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// When `E2E_LLM_ENDPOINT` is set, completions go to that endpoint with
    /// `E2E_API_KEY`; embeddings always use the primary OpenAI settings.
    pub fn from_env() -> Self {
        let api_key = env_or("OPENAI_API_KEY", "");
        let base_url = env_or("OPENAI_BASE_URL", "https://api.openai.com/v1");

        let (llm_api_key, llm_base_url) = match std::env::var("E2E_LLM_ENDPOINT") {
            Ok(endpoint) if !endpoint.is_empty() => (env_or("E2E_API_KEY", ""), endpoint),
            _ => (api_key.clone(), base_url.clone()),
        };

        let backend = match env_or("VECTOR_STORE_BACKEND", "file").to_lowercase().as_str() {
            "qdrant" => VectorBackend::Qdrant,
            _ => VectorBackend::File,
        };

        Self {
            llm: LlmConfig {
                api_key: llm_api_key,
                base_url: llm_base_url,
                model: env_or("LLM_MODEL", "gpt-3.5-turbo"),
                temperature: 0.7,
            },
            embedding: EmbeddingConfig {
                api_key,
                base_url,
                model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
                dimension: env_parse("EMBEDDING_DIMENSION", 1536),
            },
            ingestion: IngestionConfig {
                doc_urls: doc_urls_from_env(),
                fetch_timeout_secs: env_parse("FETCH_TIMEOUT_SECS", 10),
                min_content_len: env_parse("MIN_CONTENT_LENGTH", 200),
            },
            chunking: ChunkingConfig {
                chunk_size: env_parse("CHUNK_SIZE", 1000),
                chunk_overlap: env_parse("CHUNK_OVERLAP", 200),
            },
            vector_store: VectorStoreConfig {
                backend,
                path: PathBuf::from(env_or("VECTOR_STORE_PATH", "./vector_store")),
                collection: env_or("COLLECTION_NAME", "docs"),
                qdrant_url: env_or("QDRANT_URL", "http://localhost:6334"),
            },
            rag: RagConfig {
                top_k: env_parse("RETRIEVAL_TOP_K", 3),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                temperature: 0.7,
            },
            embedding: EmbeddingConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
            },
            ingestion: IngestionConfig {
                doc_urls: DEFAULT_DOC_URLS.iter().map(|s| s.to_string()).collect(),
                fetch_timeout_secs: 10,
                min_content_len: 200,
            },
            chunking: ChunkingConfig {
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            vector_store: VectorStoreConfig {
                backend: VectorBackend::File,
                path: PathBuf::from("./vector_store"),
                collection: "docs".to_string(),
                qdrant_url: "http://localhost:6334".to_string(),
            },
            rag: RagConfig { top_k: 3 },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn doc_urls_from_env() -> Vec<String> {
    match std::env::var("DOC_URLS") {
        Ok(raw) => {
            let urls: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if urls.is_empty() {
                DEFAULT_DOC_URLS.iter().map(|s| s.to_string()).collect()
            } else {
                urls
            }
        }
        Err(_) => DEFAULT_DOC_URLS.iter().map(|s| s.to_string()).collect(),
    }
}
