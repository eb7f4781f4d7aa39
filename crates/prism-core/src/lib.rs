//! Prism Core - ask two vision models about the same image.
//!
//! Prism sends one image and one prompt to two hosted multimodal APIs at the
//! same time, reports each answer the moment it lands, and appends the whole
//! interaction to a plain-text history log once both have finished.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─> Provider A (Gemini) ─┐
//! Image + Prompt ─> Dispatcher               ├─> observer (per completion) ─> HistoryLog
//!                    └─> Provider B (OpenAI) ─┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::{Comparator, Config, ImagePayload, Prompt};
//!
//! #[tokio::main]
//! async fn main() -> prism_core::Result<()> {
//!     let config = Config::load()?;
//!     let comparator = Comparator::from_config(&config)?;
//!
//!     let image = ImagePayload::from_path("./cat.png".as_ref()).await?;
//!     let prompt = Prompt::new("What is this?")?;
//!     let report = comparator
//!         .compare(image, prompt, |outcome| println!("{}: {:?}", outcome.provider, outcome.result))
//!         .await;
//!     println!("{:?}", report.persisted);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod comparator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod providers;
pub mod types;

// Re-exports for convenient access
pub use comparator::{Comparator, ComparisonReport, PersistStatus};
pub use config::Config;
pub use dispatch::{DispatchOptions, DispatchResults, Dispatcher};
pub use error::{ConfigError, PersistenceError, PrismError, PromptError, ProviderError, Result};
pub use history::HistoryLog;
pub use providers::{ProviderFactory, ProviderPair, VisionProvider, VisionRequest};
pub use types::{
    ImagePayload, InteractionRecord, Prompt, ProviderId, ProviderOutcome, ProviderResult,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
