//! Debounce, supersession and history behaviour of the translation pipeline

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use parla_translator::{ProviderMetadata, SpeechAudio, TranslateError, Translation, Translator};
use parla_types::{LanguageRef, TranslationPhase, TranslationRequest};
use tokio::time::timeout;

use crate::history::HistoryCache;
use crate::language;
use crate::pipeline::{PipelineSignal, TRANSLATION_FAILED_MESSAGE, TranslationPipeline};
use crate::store::{KeyValueHistoryStore, MemoryStore};

const DEBOUNCE: Duration = Duration::from_millis(800);

/// Uppercases its input after a per-text delay, tagging non-Spanish targets
#[derive(Default)]
struct ScriptedTranslator {
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: Mutex<Vec<TranslationRequest>>,
}

impl ScriptedTranslator {
    /// `key` is either the text or `text@target_code`
    fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    fn calls(&self) -> Vec<TranslationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &LanguageRef,
        to: &LanguageRef,
    ) -> Result<Translation, TranslateError> {
        self.calls.lock().unwrap().push(TranslationRequest {
            text: text.to_string(),
            source: from.clone(),
            target: to.clone(),
        });

        let delay = self
            .delays
            .get(&format!("{text}@{}", to.code))
            .or_else(|| self.delays.get(text))
            .copied()
            .unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(delay).await;

        if self.failing.contains(text) {
            return Err(TranslateError::ApiError("HTTP 500".to_string()));
        }

        let translated = if to.code == "es" {
            text.to_uppercase()
        } else {
            format!("[{}] {}", to.code, text.to_uppercase())
        };

        Ok(Translation {
            text: translated,
            from: from.code.clone(),
            to: to.code.clone(),
            provider: "scripted".to_string(),
        })
    }

    async fn synthesize_speech(&self, _text: &str) -> Result<SpeechAudio, TranslateError> {
        Err(TranslateError::NoAudio)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "scripted".to_string(),
            model: "test".to_string(),
            requires_api_key: false,
        }
    }
}

fn pipeline_with(
    translator: Arc<ScriptedTranslator>,
) -> (TranslationPipeline, AsyncReceiver<PipelineSignal>) {
    let history = HistoryCache::new(Box::new(KeyValueHistoryStore::new(Arc::new(
        MemoryStore::new(),
    ))));
    let pipeline = TranslationPipeline::new(
        translator,
        history,
        language::auto_detect(),
        language::default_target(),
        DEBOUNCE,
    );
    let signals = pipeline.signals();
    (pipeline, signals)
}

/// Wait for the next completion and apply it
async fn settle(pipeline: &mut TranslationPipeline, signals: &AsyncReceiver<PipelineSignal>) {
    let signal = timeout(Duration::from_secs(30), signals.recv())
        .await
        .expect("no signal arrived")
        .expect("signal channel closed");
    pipeline.apply(signal);
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_issue_one_request() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("h");
    tokio::time::sleep(Duration::from_millis(300)).await;
    pipeline.edit("he");
    tokio::time::sleep(Duration::from_millis(300)).await;
    pipeline.edit("hel");
    assert_eq!(pipeline.phase(), TranslationPhase::Pending);

    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.phase(), TranslationPhase::InFlight);

    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.phase(), TranslationPhase::Settled);
    assert_eq!(pipeline.translated_text(), "HEL");

    let calls = translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "hel");
    assert!(calls[0].source.is_auto());
    assert_eq!(calls[0].target.code, "es");
}

#[tokio::test(start_paused = true)]
async fn no_request_before_debounce_expires() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, _signals) = pipeline_with(translator.clone());

    pipeline.edit("hola");
    tokio::time::sleep(Duration::from_millis(799)).await;
    assert!(translator.calls().is_empty());
    assert_eq!(pipeline.phase(), TranslationPhase::Pending);
}

#[tokio::test(start_paused = true)]
async fn empty_edit_clears_output_immediately() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("hola");
    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.translated_text(), "HOLA");

    pipeline.edit("   ");
    assert_eq!(pipeline.phase(), TranslationPhase::Idle);
    assert_eq!(pipeline.translated_text(), "");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(translator.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_superseded_response_is_discarded() {
    let translator = Arc::new(
        ScriptedTranslator::default()
            .with_delay("a", Duration::from_millis(2000))
            .with_delay("ab", Duration::from_millis(10)),
    );
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("a");
    settle(&mut pipeline, &signals).await; // R1 issued
    assert_eq!(pipeline.phase(), TranslationPhase::InFlight);

    pipeline.edit("ab");
    settle(&mut pipeline, &signals).await; // R2 issued
    assert_eq!(translator.calls().len(), 2);

    settle(&mut pipeline, &signals).await; // R2 answers first
    assert_eq!(pipeline.translated_text(), "AB");

    settle(&mut pipeline, &signals).await; // R1 answers late
    assert_eq!(pipeline.translated_text(), "AB");
    assert_eq!(pipeline.phase(), TranslationPhase::Settled);
}

#[tokio::test(start_paused = true)]
async fn language_change_supersedes_in_flight_request() {
    let translator = Arc::new(
        ScriptedTranslator::default().with_delay("bonjour@es", Duration::from_millis(1000)),
    );
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("bonjour");
    settle(&mut pipeline, &signals).await; // slow request to es
    assert!(pipeline.set_target_language(language::find("de").unwrap()));
    assert_eq!(pipeline.phase(), TranslationPhase::InFlight);

    settle(&mut pipeline, &signals).await; // de answers first
    assert_eq!(pipeline.phase(), TranslationPhase::Settled);
    assert_eq!(pipeline.translated_text(), "[de] BONJOUR");

    settle(&mut pipeline, &signals).await; // es answers late
    assert_eq!(pipeline.translated_text(), "[de] BONJOUR");

    let calls = translator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].target.code, "es");
    assert_eq!(calls[1].target.code, "de");
}

#[tokio::test(start_paused = true)]
async fn auto_detect_is_refused_as_target() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, _signals) = pipeline_with(translator);

    assert!(!pipeline.set_target_language(language::auto_detect()));
    assert_eq!(pipeline.languages().1.code, "es");
}

#[tokio::test(start_paused = true)]
async fn failure_is_shown_and_next_edit_recovers() {
    let translator = Arc::new(ScriptedTranslator::default().failing_on("boom"));
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("boom");
    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.phase(), TranslationPhase::Failed);
    assert_eq!(pipeline.translated_text(), TRANSLATION_FAILED_MESSAGE);
    assert!(!pipeline.commit());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(translator.calls().len(), 1, "failures are not retried");

    pipeline.edit("fine");
    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.phase(), TranslationPhase::Settled);
    assert_eq!(pipeline.translated_text(), "FINE");
}

#[tokio::test(start_paused = true)]
async fn swap_from_auto_detect_exchanges_texts_and_retranslates() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("hola");
    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;

    pipeline.swap_languages();
    let (source, target) = pipeline.languages();
    assert_eq!(source.code, "es");
    assert_eq!(target.code, "en");
    assert_eq!(pipeline.source_text(), "HOLA");
    assert_eq!(pipeline.translated_text(), "hola");
    assert_eq!(pipeline.phase(), TranslationPhase::Pending);

    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;

    let calls = translator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].text, "HOLA");
    assert_eq!(calls[1].source.code, "es");
    assert_eq!(calls[1].target.code, "en");
}

#[tokio::test(start_paused = true)]
async fn swap_with_empty_output_goes_idle() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, _signals) = pipeline_with(translator.clone());

    pipeline.edit("hola");
    pipeline.swap_languages();
    assert_eq!(pipeline.phase(), TranslationPhase::Idle);
    assert_eq!(pipeline.source_text(), "");
    assert_eq!(pipeline.translated_text(), "");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(translator.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn commit_records_and_restore_skips_translator() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, signals) = pipeline_with(translator.clone());

    pipeline.edit("hello");
    settle(&mut pipeline, &signals).await;
    settle(&mut pipeline, &signals).await;
    assert!(pipeline.commit());
    assert_eq!(pipeline.history().len(), 1);

    pipeline.edit("other");
    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.phase(), TranslationPhase::InFlight);
    assert!(!pipeline.commit(), "no commit while a request is running");

    let restored = pipeline.restore_at(0).expect("entry at 0");
    assert_eq!(restored.source_text, "hello");
    assert_eq!(pipeline.source_text(), "hello");
    assert_eq!(pipeline.translated_text(), "HELLO");
    assert_eq!(pipeline.phase(), TranslationPhase::Settled);

    // the "other" response still arrives but is ignored
    settle(&mut pipeline, &signals).await;
    assert_eq!(pipeline.translated_text(), "HELLO");
    assert_eq!(translator.calls().len(), 2);
    assert!(pipeline.restore_at(5).is_none());
}

#[tokio::test(start_paused = true)]
async fn history_edits_flow_into_view() {
    let translator = Arc::new(ScriptedTranslator::default());
    let (mut pipeline, signals) = pipeline_with(translator);

    for text in ["one", "two"] {
        pipeline.edit(text);
        settle(&mut pipeline, &signals).await;
        settle(&mut pipeline, &signals).await;
        pipeline.commit();
    }
    assert_eq!(pipeline.view().history.len(), 2);

    let newest = pipeline.history()[0].id.clone();
    pipeline.remove_history(&newest);
    assert_eq!(pipeline.history().len(), 1);
    assert_eq!(pipeline.history()[0].source_text, "one");

    pipeline.clear_history();
    assert!(pipeline.view().history.is_empty());
}
