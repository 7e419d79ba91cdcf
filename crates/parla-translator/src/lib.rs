mod audio;
mod gemini;

pub use audio::SpeechAudio;
pub use gemini::GeminiTranslator;

use parla_types::LanguageRef;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language.
    ///
    /// An auto-detect `from` asks the provider to infer the source language.
    async fn translate(
        &self,
        text: &str,
        from: &LanguageRef,
        to: &LanguageRef,
    ) -> Result<Translation, TranslateError>;

    /// Synthesize spoken audio for text
    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub from: String,
    pub to: String,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("No audio data received")]
    NoAudio,

    #[error("Invalid audio data: {0}")]
    InvalidAudio(String),
}
