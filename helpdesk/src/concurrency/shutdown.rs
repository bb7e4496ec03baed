//! Graceful shutdown signaling for helpdesk workers.

use tokio::sync::watch;
use tokio::sync::watch::error::SendError;

/// Creates a new shutdown channel with a single sender and receiver.
///
/// The channel carries unit values since subscribers only care about the fact that
/// a signal was sent, not about a payload. Additional receivers can be created from
/// the [`ShutdownTx`] via [`ShutdownTx::subscribe`].
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());

    (ShutdownTx(tx), ShutdownRx(rx))
}

/// The sending half of a shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Broadcasts the shutdown signal to all subscribed receivers.
    ///
    /// Fails when no receivers are alive anymore, which callers usually treat as an
    /// already completed shutdown.
    pub fn shutdown(&self) -> Result<(), SendError<()>> {
        self.0.send(())
    }

    /// Creates a new [`ShutdownRx`] connected to this sender.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx(self.0.subscribe())
    }
}

/// The receiving half of a shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx(watch::Receiver<()>);

impl ShutdownRx {
    /// Waits until the shutdown signal is broadcast.
    ///
    /// Also completes when the sending half was dropped, since no signal can arrive
    /// after that point.
    pub async fn wait_for_shutdown(&mut self) {
        let _ = self.0.changed().await;
        // Keep the signal visible to later `is_shutdown` checks and waits.
        self.0.mark_changed();
    }

    /// Returns `true` when the shutdown signal was already broadcast.
    pub fn is_shutdown(&self) -> bool {
        self.0.has_changed().unwrap_or(true)
    }
}

/// Outcome of an operation that raced against a shutdown signal.
#[derive(Debug)]
pub enum ShutdownResult<T, E> {
    /// The operation completed before any shutdown signal arrived.
    Ok(T),
    /// A shutdown signal interrupted the operation before it completed.
    Shutdown(E),
}

impl<T, E> ShutdownResult<T, E> {
    /// Returns `true` when the operation was interrupted by shutdown.
    pub fn should_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_reaches_all_subscribers() {
        let (shutdown_tx, mut first_rx) = create_shutdown_channel();
        let mut second_rx = shutdown_tx.subscribe();

        assert!(!first_rx.is_shutdown());
        assert!(!second_rx.is_shutdown());

        shutdown_tx.shutdown().unwrap();

        first_rx.wait_for_shutdown().await;
        second_rx.wait_for_shutdown().await;
        assert!(first_rx.is_shutdown());
        assert!(second_rx.is_shutdown());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_completes_when_sender_is_dropped() {
        let (shutdown_tx, mut shutdown_rx) = create_shutdown_channel();

        drop(shutdown_tx);

        shutdown_rx.wait_for_shutdown().await;
        assert!(shutdown_rx.is_shutdown());
    }

    #[tokio::test]
    async fn test_shutdown_fails_without_subscribers() {
        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();

        drop(shutdown_rx);

        assert!(shutdown_tx.shutdown().is_err());
    }
}
