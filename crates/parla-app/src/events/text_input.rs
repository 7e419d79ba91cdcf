use crate::session::Session;

pub async fn handle_text_input(session: &mut Session, text: String) -> anyhow::Result<()> {
    tracing::debug!("TextInput received: {} chars", text.chars().count());

    session.pipeline.edit(text);
    session.render().await
}
