mod openai;

pub use openai::OpenAiLlm;
