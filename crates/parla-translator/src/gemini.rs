use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use parla_types::LanguageRef;
use serde_json::{Value, json};

use crate::audio::{SPEECH_SAMPLE_RATE, SpeechAudio};
use crate::{ProviderMetadata, TranslateError, Translation, Translator};

const SYSTEM_INSTRUCTION: &str = "You are a professional translator. Provide only the direct translation. \
Preserve formatting, capitalization, and punctuation where possible. \
Do not add conversational filler, notes, or explanations. \
If the text is untranslatable (e.g., numbers, symbols), return it as is.";

/// Google generative-language REST client
#[derive(Clone)]
pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    tts_model: String,
    voice: String,
    temperature: f32,
}

impl GeminiTranslator {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Puck".to_string(),
            temperature: 0.3,
        }
    }

    pub fn with_models(mut self, model: String, tts_model: String) -> Self {
        self.model = model;
        self.tts_model = tts_model;
        self
    }

    pub fn with_voice(mut self, voice: String) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn prompt(text: &str, from: &LanguageRef, to: &LanguageRef) -> String {
        if from.is_auto() {
            format!(
                "Translate the following text to {}. Detect the source language automatically. \n\nText:\n{}",
                to.name, text
            )
        } else {
            format!(
                "Translate the following text from {} to {}. \n\nText:\n{}",
                from.name, to.name, text
            )
        }
    }

    async fn generate(&self, model: &str, body: Value) -> Result<Value, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let url = format!("{}/models/{}:generateContent", self.api_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !status.is_success() {
            return Err(TranslateError::ApiError(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &LanguageRef,
        to: &LanguageRef,
    ) -> Result<Translation, TranslateError> {
        let mut translation = Translation {
            text: String::new(),
            from: from.code.clone(),
            to: to.code.clone(),
            provider: "gemini".to_string(),
        };

        if text.trim().is_empty() {
            return Ok(translation);
        }

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": Self::prompt(text, from, to) }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "generationConfig": { "temperature": self.temperature },
        });

        let json = self.generate(&self.model, body).await?;

        let parts = json["candidates"]
            .get(0)
            .and_then(|c| c["content"]["parts"].as_array())
            .ok_or_else(|| TranslateError::ApiError("No candidates in response".to_string()))?;

        translation.text = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect::<String>();

        tracing::debug!(
            "Translated {} chars {} -> {}",
            text.len(),
            translation.from,
            translation.to
        );

        Ok(translation)
    }

    async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::NoAudio);
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.voice }
                    }
                }
            },
        });

        let json = self.generate(&self.tts_model, body).await?;

        let data = json["candidates"]
            .get(0)
            .and_then(|c| c["content"]["parts"].get(0))
            .and_then(|p| p["inlineData"]["data"].as_str())
            .ok_or(TranslateError::NoAudio)?;

        let bytes = BASE64
            .decode(data)
            .map_err(|e| TranslateError::InvalidAudio(e.to_string()))?;

        if bytes.len() < 2 {
            return Err(TranslateError::NoAudio);
        }

        Ok(SpeechAudio::from_pcm16_le(&bytes, SPEECH_SAMPLE_RATE))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}
