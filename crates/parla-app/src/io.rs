use kanal::AsyncSender;
use parla_types::AppEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::command::parse_line;

/// Reads terminal lines and forwards them to the app as events.
///
/// End of input shuts the application down.
pub async fn watcher_io(
    event_tx: AsyncSender<AppEvent>,
    status_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    forward_lines(stdin, event_tx, status_tx, cancel).await
}

pub async fn forward_lines<R>(
    reader: R,
    event_tx: AsyncSender<AppEvent>,
    status_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Input reader stopping");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("Input closed");
            cancel.cancel();
            return Ok(());
        };

        match parse_line(&line) {
            Ok(event) => {
                tracing::debug!("Input event: {:?}", std::mem::discriminant(&event));
                event_tx.send(event).await?;
            }
            Err(e) => {
                if let Err(e) = status_tx.send(AppEvent::Status(e.to_string())).await {
                    tracing::error!("Failed to report input error: {}", e);
                }
            }
        }
    }
}
