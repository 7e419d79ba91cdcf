use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_debounce_ms() -> u64 {
    800
}

fn default_history_capacity() -> usize {
    20
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Quiet period after the last edit before a request is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of history entries kept
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl PipelineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            history_capacity: default_history_capacity(),
        }
    }
}
