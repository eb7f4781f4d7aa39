//! Vision provider adapters.
//!
//! A common trait over the two hosted multimodal APIs (Gemini and OpenAI), plus
//! the factory that builds both from config.

pub(crate) mod gemini;
pub(crate) mod openai;
pub(crate) mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{
    resolve_env_var, ProviderFactory, ProviderPair, VisionProvider, VisionRequest,
};
