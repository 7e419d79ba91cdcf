pub mod history;
pub mod language;
pub mod pipeline;
pub mod preferences;
pub mod preprocess;
pub mod store;

pub use history::HistoryCache;
pub use pipeline::{PipelineSignal, TranslationPipeline};
pub use preferences::{PreferenceStore, Preferences};

#[cfg(test)]
mod tests;
