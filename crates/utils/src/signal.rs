use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

/// Waits for SIGINT or SIGTERM.
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM");
        }
    }

    Ok(())
}

/// Cancels `token` on the first shutdown signal. Returns as soon as the token
/// is cancelled by someone else.
pub fn cancel_on_shutdown_signal(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = wait_for_shutdown_signal() => {
                if let Err(error) = result {
                    tracing::warn!(%error, "Failed to listen for shutdown signals");
                    return;
                }
                tracing::info!("Shutting down, aborting in-flight requests");
                token.cancel();
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn listener_exits_when_token_is_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let handle = cancel_on_shutdown_signal(token.clone());

        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("listener did not stop")
            .unwrap();
    }
}
