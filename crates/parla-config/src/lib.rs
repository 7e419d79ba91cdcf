use std::env;

use serde::{Deserialize, Serialize};

use self::pipeline::PipelineConfig;
use self::storage::StorageConfig;
use self::translator::TranslatorConfig;

pub mod pipeline;
pub mod storage;
pub mod translator;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub pipeline: PipelineConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over whatever a profile file stored
    pub fn apply_env(&mut self) {
        if let Some(api_key) = env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| env::var("API_KEY").ok())
            .filter(|v| !v.is_empty())
        {
            self.translator.api_key = api_key;
        }

        if let Ok(api_url) = env::var("PARLA_API_URL") {
            self.translator.api_url = api_url;
        }

        if let Ok(model) = env::var("PARLA_MODEL") {
            self.translator.model = model;
        }

        if let Some(debounce_ms) = env::var("PARLA_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.pipeline.debounce_ms = debounce_ms;
        }

        if let Ok(data_dir) = env::var("PARLA_DATA_DIR") {
            self.storage.data_dir = Some(data_dir);
        }
    }
}
