use crate::session::Session;

/// Input lost focus
pub async fn handle_commit(session: &mut Session) -> anyhow::Result<()> {
    if !session.pipeline.commit() {
        tracing::debug!(
            "Nothing recorded (phase {})",
            session.pipeline.phase().as_str()
        );
        return Ok(());
    }
    session.render().await
}

pub async fn handle_history_list(session: &mut Session) -> anyhow::Result<()> {
    session.history_list().await
}

pub async fn handle_history_restore(session: &mut Session, index: usize) -> anyhow::Result<()> {
    let Some(entry) = session.pipeline.restore_at(index) else {
        return session
            .status(format!("No history entry {}", index + 1))
            .await;
    };

    tracing::info!("Restored history entry {}", entry.id);
    session.save_languages();
    session.render().await
}

pub async fn handle_history_delete(session: &mut Session, index: usize) -> anyhow::Result<()> {
    let Some(id) = session
        .pipeline
        .history()
        .get(index)
        .map(|entry| entry.id.clone())
    else {
        return session
            .status(format!("No history entry {}", index + 1))
            .await;
    };

    session.pipeline.remove_history(&id);
    session.history_list().await
}

pub async fn handle_history_clear(session: &mut Session) -> anyhow::Result<()> {
    session.pipeline.clear_history();
    session.history_list().await
}
