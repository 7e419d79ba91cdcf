use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use parla_translator::{TranslateError, Translation, Translator};
use parla_types::{
    HistoryEntry, LanguageRef, TranslationPhase, TranslationRequest, TranslationView,
};
use tokio_util::sync::CancellationToken;

use crate::history::HistoryCache;
use crate::language;
use crate::preprocess::is_blank;

/// Shown in place of the translation when the current request fails
pub const TRANSLATION_FAILED_MESSAGE: &str =
    "Error during translation. Please check your connection or try again.";

/// Completions posted back to the pipeline by its own background tasks
#[derive(Debug)]
pub enum PipelineSignal {
    DebounceElapsed {
        generation: u64,
    },
    Response {
        request: u64,
        result: Result<Translation, TranslateError>,
    },
}

/// Turns edits into at most one settled translation per pause.
///
/// The pipeline is owned by a single task. Timers and remote calls run as
/// spawned tasks that only report back through [`PipelineSignal`]s; the
/// owner feeds those into [`TranslationPipeline::apply`]. Every issued
/// request carries a sequence number and only the latest one may touch the
/// displayed output.
pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    history: HistoryCache,
    debounce: Duration,

    source_lang: LanguageRef,
    target_lang: LanguageRef,
    source_text: String,
    translated_text: String,
    phase: TranslationPhase,
    history_view: Vec<HistoryEntry>,

    debounce_generation: u64,
    debounce_cancel: Option<CancellationToken>,
    last_request: u64,
    current_request: Option<u64>,

    signal_tx: AsyncSender<PipelineSignal>,
    signal_rx: AsyncReceiver<PipelineSignal>,
}

impl TranslationPipeline {
    pub fn new(
        translator: Arc<dyn Translator>,
        history: HistoryCache,
        source_lang: LanguageRef,
        target_lang: LanguageRef,
        debounce: Duration,
    ) -> Self {
        let (signal_tx, signal_rx) = kanal::unbounded_async();
        let history_view = history.load();

        Self {
            translator,
            history,
            debounce,
            source_lang,
            target_lang,
            source_text: String::new(),
            translated_text: String::new(),
            phase: TranslationPhase::Idle,
            history_view,
            debounce_generation: 0,
            debounce_cancel: None,
            last_request: 0,
            current_request: None,
            signal_tx,
            signal_rx,
        }
    }

    /// Receiver the owner polls for timer and response completions
    pub fn signals(&self) -> AsyncReceiver<PipelineSignal> {
        self.signal_rx.clone()
    }

    pub fn view(&self) -> TranslationView {
        TranslationView {
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            source_text: self.source_text.clone(),
            translated_text: self.translated_text.clone(),
            phase: self.phase,
            history: self.history_view.clone(),
        }
    }

    pub fn phase(&self) -> TranslationPhase {
        self.phase
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn languages(&self) -> (&LanguageRef, &LanguageRef) {
        (&self.source_lang, &self.target_lang)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history_view
    }

    /// Replace the input text.
    ///
    /// Empty text clears the output right away; anything else restarts the
    /// debounce window. Either way an outstanding request is superseded.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
        self.cancel_debounce();
        self.current_request = None;

        if is_blank(&self.source_text) {
            self.translated_text.clear();
            self.phase = TranslationPhase::Idle;
            tracing::debug!("Input cleared, pipeline idle");
            return;
        }

        self.phase = TranslationPhase::Pending;
        self.schedule_debounce();
    }

    /// Select a new source language; non-empty input is retranslated at once
    pub fn set_source_language(&mut self, lang: LanguageRef) {
        if lang == self.source_lang {
            return;
        }
        self.source_lang = lang;
        self.retranslate_now();
    }

    /// Select a new target language; auto-detect is refused
    pub fn set_target_language(&mut self, lang: LanguageRef) -> bool {
        if lang.is_auto() {
            tracing::warn!("Auto-detect is not a valid target language");
            return false;
        }
        if lang != self.target_lang {
            self.target_lang = lang;
            self.retranslate_now();
        }
        true
    }

    /// Exchange languages and texts, then run the edit cycle on the new input
    pub fn swap_languages(&mut self) {
        let (source, target) = language::swap(&self.source_lang, &self.target_lang);
        self.source_lang = source;
        self.target_lang = target;

        let previous_input = std::mem::take(&mut self.source_text);
        let previous_output = std::mem::replace(&mut self.translated_text, previous_input);
        self.edit(previous_output);
    }

    /// Input lost focus: record the current pair unless a request is running.
    ///
    /// Returns whether the history was asked to record.
    pub fn commit(&mut self) -> bool {
        if self.phase == TranslationPhase::InFlight || self.phase == TranslationPhase::Failed {
            return false;
        }
        if self.source_text.is_empty() || self.translated_text.is_empty() {
            return false;
        }

        self.history_view = self.history.record(
            &self.source_text,
            &self.translated_text,
            &self.source_lang,
            &self.target_lang,
        );
        true
    }

    /// Load a past translation without contacting the translator
    pub fn restore(&mut self, entry: &HistoryEntry) {
        self.cancel_debounce();
        self.current_request = None;

        self.source_lang = entry.source_lang.clone();
        self.target_lang = entry.target_lang.clone();
        self.source_text = entry.source_text.clone();
        self.translated_text = entry.translated_text.clone();
        self.phase = TranslationPhase::Settled;
    }

    /// Restore by position in the visible history
    pub fn restore_at(&mut self, index: usize) -> Option<HistoryEntry> {
        let entry = self.history_view.get(index).cloned()?;
        self.restore(&entry);
        Some(entry)
    }

    pub fn remove_history(&mut self, id: &str) {
        self.history_view = self.history.remove(id);
    }

    pub fn clear_history(&mut self) {
        self.history_view = self.history.clear();
    }

    /// Feed back a completion from one of the pipeline's tasks
    pub fn apply(&mut self, signal: PipelineSignal) {
        match signal {
            PipelineSignal::DebounceElapsed { generation } => {
                if generation != self.debounce_generation
                    || self.phase != TranslationPhase::Pending
                {
                    tracing::debug!("Ignoring stale debounce #{}", generation);
                    return;
                }
                self.debounce_cancel = None;
                self.issue_request();
            }
            PipelineSignal::Response { request, result } => {
                if self.current_request != Some(request) {
                    tracing::debug!("Discarding superseded response #{}", request);
                    return;
                }
                self.current_request = None;

                match result {
                    Ok(translation) => {
                        self.translated_text = translation.text;
                        self.phase = TranslationPhase::Settled;
                    }
                    Err(e) => {
                        tracing::error!("Translation #{} failed: {}", request, e);
                        self.translated_text = TRANSLATION_FAILED_MESSAGE.to_string();
                        self.phase = TranslationPhase::Failed;
                    }
                }
            }
        }
    }

    fn retranslate_now(&mut self) {
        if is_blank(&self.source_text) {
            return;
        }
        self.cancel_debounce();
        self.issue_request();
    }

    fn cancel_debounce(&mut self) {
        self.debounce_generation += 1;
        if let Some(token) = self.debounce_cancel.take() {
            token.cancel();
        }
    }

    fn schedule_debounce(&mut self) {
        let token = CancellationToken::new();
        self.debounce_cancel = Some(token.clone());

        let generation = self.debounce_generation;
        let tx = self.signal_tx.clone();
        // Deadline is fixed here, not when the task first runs
        let delay = tokio::time::sleep(self.debounce);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = delay => {
                    let _ = tx.send(PipelineSignal::DebounceElapsed { generation }).await;
                }
            }
        });
    }

    fn issue_request(&mut self) {
        self.last_request += 1;
        let request_id = self.last_request;
        self.current_request = Some(request_id);
        self.phase = TranslationPhase::InFlight;

        let request = TranslationRequest {
            text: self.source_text.clone(),
            source: self.source_lang.clone(),
            target: self.target_lang.clone(),
        };

        tracing::debug!(
            "Issuing translation #{} ({} chars, {} -> {})",
            request_id,
            request.text.len(),
            request.source.code,
            request.target.code
        );

        let translator = Arc::clone(&self.translator);
        let tx = self.signal_tx.clone();

        tokio::spawn(async move {
            let result = translator
                .translate(&request.text, &request.source, &request.target)
                .await;
            let _ = tx
                .send(PipelineSignal::Response {
                    request: request_id,
                    result,
                })
                .await;
        });
    }
}

impl Drop for TranslationPipeline {
    fn drop(&mut self) {
        if let Some(token) = self.debounce_cancel.take() {
            token.cancel();
        }
    }
}
