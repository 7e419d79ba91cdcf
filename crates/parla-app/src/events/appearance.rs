use parla_core::preferences::{with_font, with_text_color};

use crate::session::Session;

pub async fn handle_theme_toggle(session: &mut Session) -> anyhow::Result<()> {
    session.theme = session.theme.toggled();
    session.preferences.save_theme(session.theme);
    session.appearance().await
}

pub async fn handle_font_change(session: &mut Session, font_id: &str) -> anyhow::Result<()> {
    match with_font(&session.customization, font_id.trim()) {
        Ok(customization) => {
            session.customization = customization;
            session.preferences.save_customization(&session.customization);
            session.appearance().await
        }
        Err(e) => session.status(e.to_string()).await,
    }
}

pub async fn handle_color_change(session: &mut Session, color_id: &str) -> anyhow::Result<()> {
    match with_text_color(&session.customization, color_id.trim()) {
        Ok(customization) => {
            session.customization = customization;
            session.preferences.save_customization(&session.customization);
            session.appearance().await
        }
        Err(e) => session.status(e.to_string()).await,
    }
}
