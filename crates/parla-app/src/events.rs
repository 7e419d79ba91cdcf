use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use parla_translator::Translator;
use parla_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::command::HELP;
use crate::session::Session;
use crate::state::AppState;

pub mod appearance;
pub mod history;
pub mod languages;
pub mod speech;
pub mod text_input;

use appearance::{handle_color_change, handle_font_change, handle_theme_toggle};
use history::{
    handle_commit, handle_history_clear, handle_history_delete, handle_history_list,
    handle_history_restore,
};
use languages::{handle_language_list, handle_language_selection, handle_language_swap};
use speech::handle_speech;
use text_input::handle_text_input;

/// App's main loop
///
/// Owns the translation pipeline. Terminal events and the pipeline's own
/// timer and response signals are interleaved here, so all state changes
/// happen on this task.
pub async fn event_loop(
    state: Arc<AppState>,
    translator: Arc<dyn Translator>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let metadata = translator.metadata();
    let provider = format!("{} ({})", metadata.name, metadata.model);
    let mut session = Session::open(state, translator, app_to_ui_tx.clone()).await;
    let signals = session.pipeline.signals();

    session.appearance().await?;
    session.render().await?;
    app_to_ui_tx
        .send(AppEvent::BackendReady { provider })
        .await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = ui_to_app_rx.recv() => {
                let event = event?;
                tracing::debug!(
                    "[EVENT_LOOP] Event received: {:?}",
                    std::mem::discriminant(&event)
                );

                if matches!(event, AppEvent::Quit) {
                    tracing::info!("[EVENT_LOOP] Quit requested");
                    cancel.cancel();
                    break;
                }
                handle_events(&mut session, event).await?;
            }
            signal = signals.recv() => {
                session.pipeline.apply(signal?);
                session.render().await?;
            }
        }
    }

    Ok(())
}

async fn handle_events(session: &mut Session, event: AppEvent) -> anyhow::Result<()> {
    match event {
        AppEvent::TextInput(text) => handle_text_input(session, text).await?,
        AppEvent::SelectLanguage { direction, code } => {
            handle_language_selection(session, direction, &code).await?
        }
        AppEvent::SwapLanguages => handle_language_swap(session).await?,
        AppEvent::ListLanguages { query } => handle_language_list(session, &query).await?,
        AppEvent::Commit => handle_commit(session).await?,
        AppEvent::ShowHistory => handle_history_list(session).await?,
        AppEvent::RestoreHistory(index) => handle_history_restore(session, index).await?,
        AppEvent::DeleteHistory(index) => handle_history_delete(session, index).await?,
        AppEvent::ClearHistory => handle_history_clear(session).await?,
        AppEvent::Speak(target) => handle_speech(session, target).await?,
        AppEvent::ToggleTheme => handle_theme_toggle(session).await?,
        AppEvent::SetFont(id) => handle_font_change(session, &id).await?,
        AppEvent::SetTextColor(id) => handle_color_change(session, &id).await?,
        AppEvent::Help => session.status(HELP).await?,
        AppEvent::Quit => {}
        // UI-only events, ignore in backend
        AppEvent::Render(_)
        | AppEvent::ShowHistoryList(_)
        | AppEvent::ShowLanguages(_)
        | AppEvent::Appearance { .. }
        | AppEvent::Status(_)
        | AppEvent::BackendReady { .. } => {}
    }

    Ok(())
}
