use std::io::Write;

use kanal::AsyncReceiver;
use parla_types::{AppEvent, HistoryEntry, LanguageRef, TranslationPhase, TranslationView};
use tokio_util::sync::CancellationToken;

/// Prints everything the app sends to the terminal
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            event = app_to_ui_rx.recv() => event?,
        };

        if let Some(text) = present(&event) {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text)?;
            stdout.flush()?;
        }
    }
}

/// Terminal rendering of one app event; None for events with no output
pub fn present(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::Render(view) => present_view(view),
        AppEvent::ShowHistoryList(entries) => Some(present_history(entries)),
        AppEvent::ShowLanguages(groups) => Some(present_languages(groups)),
        AppEvent::Appearance {
            theme,
            customization,
        } => Some(format!(
            "Theme: {} | font: {} | color: {}",
            theme.as_str(),
            customization.font_family,
            customization.text_color
        )),
        AppEvent::Status(message) => Some(message.clone()),
        AppEvent::BackendReady { provider } => Some(format!(
            "Ready, translating with {}. Type :help for commands.",
            provider
        )),
        _ => None,
    }
}

fn pair(source: &LanguageRef, target: &LanguageRef) -> String {
    format!("[{} -> {}]", source.name, target.name)
}

fn present_view(view: &TranslationView) -> Option<String> {
    let header = pair(&view.source_lang, &view.target_lang);
    match view.phase {
        TranslationPhase::Idle if view.source_text.is_empty() => Some(format!("{} (empty)", header)),
        TranslationPhase::Idle => None,
        // Pending renders on every keystroke; stay quiet until a request goes out
        TranslationPhase::Pending => None,
        TranslationPhase::InFlight => Some(format!("{} translating...", header)),
        TranslationPhase::Settled => Some(format!("{} {}", header, view.translated_text)),
        TranslationPhase::Failed => Some(format!("{} ! {}", header, view.translated_text)),
    }
}

fn present_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No translations saved yet".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>2}. {} {} => {}",
                i + 1,
                pair(&entry.source_lang, &entry.target_lang),
                entry.source_text,
                entry.translated_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn present_languages(groups: &[(String, Vec<LanguageRef>)]) -> String {
    let mut out = Vec::new();
    for (group, langs) in groups {
        if langs.is_empty() {
            continue;
        }
        let names = langs
            .iter()
            .map(|lang| format!("{} ({})", lang.name, lang.code))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(format!("{}: {}", group, names));
    }

    if out.is_empty() {
        "No languages found".to_string()
    } else {
        out.join("\n")
    }
}
