//! Core data types for a comparison request.
//!
//! An `ImagePayload` and a `Prompt` go in; one `ProviderResult` per provider
//! comes out, and the whole interaction is captured as an `InteractionRecord`.

use crate::error::PromptError;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Extensions the upload side advertises as supported.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "heic", "heif"];

/// MIME type used when the extension is unknown or missing.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Map a file extension (without the dot, any case) to a MIME type.
///
/// Unknown extensions fall back to `image/jpeg`.
pub fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Whether a file name carries one of the supported extensions.
pub fn is_supported_file_name(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Text after the last dot, if any.
fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// An uploaded image: bytes, declared file name, and the MIME type derived
/// from the extension.
///
/// The bytes sit behind an `Arc` so both provider tasks can read them without
/// copying.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    file_name: String,
    mime_type: &'static str,
    bytes: Arc<[u8]>,
}

impl ImagePayload {
    /// Build a payload from in-memory bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let mime_type = match extension_of(&file_name) {
            Some(ext) => mime_type_for_extension(ext),
            None => DEFAULT_MIME_TYPE,
        };
        if !is_supported_file_name(&file_name) {
            tracing::warn!("Unsupported extension for '{file_name}', defaulting to {mime_type}");
        }
        Self {
            file_name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Read a payload from disk. The file name is the last path component.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A non-empty question or instruction about the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Validate and wrap prompt text. Whitespace-only text is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PromptError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed role of a provider within a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderId {
    A,
    B,
}

impl ProviderId {
    /// Both roles, in record order.
    pub const ALL: [ProviderId; 2] = [ProviderId::A, ProviderId::B];

    /// Heading used for this role in the history log.
    pub fn heading(self) -> &'static str {
        match self {
            ProviderId::A => "PROVIDER_A",
            ProviderId::B => "PROVIDER_B",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Outcome of one provider invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ProviderResult {
    Success(String),
    Failure(String),
}

impl ProviderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProviderResult::Success(_))
    }

    /// Text as it appears in the history log: the answer, or `ERROR: <message>`.
    pub fn log_text(&self) -> String {
        match self {
            ProviderResult::Success(text) => text.clone(),
            ProviderResult::Failure(message) => format!("ERROR: {message}"),
        }
    }
}

/// One completion event, delivered as soon as a provider finishes.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOutcome {
    /// Role of the provider in this comparison
    pub id: ProviderId,
    /// Provider name (e.g., "gemini", "openai")
    pub provider: String,
    /// Model identifier used for the call
    pub model: String,
    /// Answer or failure
    pub result: ProviderResult,
    /// Wall-clock time from dispatch to completion
    #[serde(rename = "latency_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// A completed comparison, ready to append to the history log.
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Local>,
    pub image_name: String,
    pub prompt: String,
    pub result_a: ProviderResult,
    pub result_b: ProviderResult,
}

impl InteractionRecord {
    /// Build a record stamped with the current local time.
    pub fn now(
        image_name: impl Into<String>,
        prompt: impl Into<String>,
        result_a: ProviderResult,
        result_b: ProviderResult,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            image_name: image_name.into(),
            prompt: prompt.into(),
            result_a,
            result_b,
        }
    }

    pub fn result(&self, id: ProviderId) -> &ProviderResult {
        match id {
            ProviderId::A => &self.result_a,
            ProviderId::B => &self.result_b,
        }
    }
}
