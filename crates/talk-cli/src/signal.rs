//! Interrupt handling
//!
//! Signals never touch the terminal or the session directly. They cancel a
//! token that the session loop and the post-dialogue wait observe.

use tokio_util::sync::CancellationToken;

/// Install Ctrl+C / SIGTERM handlers and return the token they cancel.
///
/// Must be called from inside the runtime.
pub fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::debug!("Received Ctrl+C");
            }
            _ = terminate => {
                tracing::debug!("Received SIGTERM");
            }
        }

        cancel_clone.cancel();
    });

    cancel
}
