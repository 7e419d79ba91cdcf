use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kanal::AsyncSender;
use parla_core::preprocess::is_blank;
use parla_translator::Translator;
use parla_types::{AppEvent, SpeechTarget, TranslationPhase};

use crate::session::Session;

pub const SPEECH_FILE_NAME: &str = "speech.wav";
pub const SPEECH_FAILED_MESSAGE: &str = "Failed to generate speech.";

static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Synthesize the input or output text in the background.
///
/// The event loop keeps running while audio is generated; the outcome is
/// reported as a status line.
pub async fn handle_speech(session: &mut Session, target: SpeechTarget) -> anyhow::Result<()> {
    let text = match target {
        SpeechTarget::Input => session.pipeline.source_text().to_string(),
        SpeechTarget::Output if session.pipeline.phase() == TranslationPhase::Settled => {
            session.pipeline.translated_text().to_string()
        }
        SpeechTarget::Output => String::new(),
    };

    if is_blank(&text) {
        return session.status("Nothing to speak").await;
    }

    let output_dir = session
        .state
        .data_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let translator = session.translator.clone();
    let event_tx = session.event_tx.clone();

    tokio::spawn(async move {
        let message = match synthesize_to_file(translator, &text, &output_dir).await {
            Ok(path) => format!("Speech saved to {}", path.display()),
            Err(e) => {
                tracing::error!("Speech synthesis failed: {:#}", e);
                SPEECH_FAILED_MESSAGE.to_string()
            }
        };
        report(&event_tx, message).await;
    });

    Ok(())
}

pub async fn synthesize_to_file(
    translator: Arc<dyn Translator>,
    text: &str,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let audio = translator.synthesize_speech(text).await?;
    tracing::debug!("Synthesized {} ms of audio", audio.duration_ms());

    let wav = audio.to_wav()?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(SPEECH_FILE_NAME);

    // One temp file per write; overlapping requests each rename a complete file
    let sequence = WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let temp_path = output_dir.join(format!(
        "{}.{}-{}.tmp",
        SPEECH_FILE_NAME,
        std::process::id(),
        sequence
    ));

    if let Err(e) = tokio::fs::write(&temp_path, &wav).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    tokio::fs::rename(&temp_path, &path).await?;

    Ok(path)
}

async fn report(event_tx: &AsyncSender<AppEvent>, message: String) {
    if let Err(e) = event_tx.send(AppEvent::Status(message)).await {
        tracing::warn!("Failed to report speech status: {}", e);
    }
}
