use parla_core::language;
use parla_types::{AUTO_DETECT_CODE, AppEvent, LanguageDirection};

use crate::session::Session;

pub async fn handle_language_selection(
    session: &mut Session,
    direction: LanguageDirection,
    code: &str,
) -> anyhow::Result<()> {
    let code = code.trim();

    let selected = match direction {
        LanguageDirection::Source => language::find_source(code),
        LanguageDirection::Target => language::find_target(code),
    };

    let Some(lang) = selected else {
        let message = if code.eq_ignore_ascii_case(AUTO_DETECT_CODE) {
            "Detect Language is only available for the source".to_string()
        } else {
            format!("Unknown language code: {} (try :languages)", code)
        };
        return session.status(message).await;
    };

    tracing::info!("Selected {:?} language {}", direction, lang.code);
    match direction {
        LanguageDirection::Source => session.pipeline.set_source_language(lang),
        LanguageDirection::Target => {
            if !session.pipeline.set_target_language(lang) {
                return Ok(());
            }
        }
    }

    session.save_languages();
    session.render().await
}

pub async fn handle_language_swap(session: &mut Session) -> anyhow::Result<()> {
    session.pipeline.swap_languages();
    session.save_languages();
    session.render().await
}

/// Grouped catalog for an empty query, a flat search otherwise
pub async fn handle_language_list(session: &mut Session, query: &str) -> anyhow::Result<()> {
    let groups = if query.trim().is_empty() {
        language::grouped()
    } else {
        vec![(
            "Results".to_string(),
            language::search(query, LanguageDirection::Source),
        )]
    };

    session.event_tx.send(AppEvent::ShowLanguages(groups)).await?;
    Ok(())
}
