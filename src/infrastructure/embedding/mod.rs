mod openai;

pub use openai::OpenAiEmbedding;
