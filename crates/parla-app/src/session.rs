use std::sync::Arc;

use kanal::AsyncSender;
use parla_core::store::KeyValueHistoryStore;
use parla_core::{HistoryCache, PreferenceStore, TranslationPipeline};
use parla_translator::Translator;
use parla_types::{AppEvent, Customization, Theme};

use crate::state::AppState;

/// Everything the event handlers share
///
/// Owned by the event loop; handlers borrow it mutably one event at a time.
pub struct Session {
    pub state: Arc<AppState>,
    pub event_tx: AsyncSender<AppEvent>,
    pub translator: Arc<dyn Translator>,
    pub pipeline: TranslationPipeline,
    pub preferences: PreferenceStore,
    pub theme: Theme,
    pub customization: Customization,
}

impl Session {
    pub async fn open(
        state: Arc<AppState>,
        translator: Arc<dyn Translator>,
        event_tx: AsyncSender<AppEvent>,
    ) -> Self {
        let (debounce, capacity) = {
            let config = state.config.read().await;
            (
                config.pipeline.debounce(),
                config.pipeline.history_capacity,
            )
        };

        let preferences = PreferenceStore::new(state.store.clone());
        let saved = preferences.load();
        tracing::info!(
            "Restored languages {} -> {}, theme {}",
            saved.source.code,
            saved.target.code,
            saved.theme.as_str()
        );

        let history = HistoryCache::with_capacity(
            Box::new(KeyValueHistoryStore::new(state.store.clone())),
            capacity,
        );
        let pipeline = TranslationPipeline::new(
            translator.clone(),
            history,
            saved.source,
            saved.target,
            debounce,
        );

        Self {
            state,
            event_tx,
            translator,
            pipeline,
            preferences,
            theme: saved.theme,
            customization: saved.customization,
        }
    }

    pub async fn render(&self) -> anyhow::Result<()> {
        self.event_tx
            .send(AppEvent::Render(self.pipeline.view()))
            .await?;
        Ok(())
    }

    pub async fn status(&self, message: impl Into<String>) -> anyhow::Result<()> {
        self.event_tx.send(AppEvent::Status(message.into())).await?;
        Ok(())
    }

    pub async fn appearance(&self) -> anyhow::Result<()> {
        self.event_tx
            .send(AppEvent::Appearance {
                theme: self.theme,
                customization: self.customization.clone(),
            })
            .await?;
        Ok(())
    }

    pub async fn history_list(&self) -> anyhow::Result<()> {
        self.event_tx
            .send(AppEvent::ShowHistoryList(self.pipeline.history().to_vec()))
            .await?;
        Ok(())
    }

    pub fn save_languages(&self) {
        let (source, target) = self.pipeline.languages();
        self.preferences.save_languages(source, target);
    }
}
