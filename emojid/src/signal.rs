use std::io;
use tokio_util::sync::CancellationToken;

#[cfg(target_family = "unix")]
async fn termination() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => (),
        _ = quit.recv() => (),
    }

    Ok(())
}

#[cfg(not(target_family = "unix"))]
async fn termination() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Shared shutdown state
///
/// Clones observe the same state. Once triggered, every pending and future [`Shutdown::wait`] completes.
#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Shutdown triggered by the process receiving a termination signal
    #[must_use]
    pub fn on_signal() -> Self {
        let shutdown = Self::default();
        let on_signal = shutdown.clone();

        tokio::spawn(async move {
            match termination().await {
                Ok(()) => {
                    info!("received shutdown signal");
                    on_signal.trigger();
                }
                Err(error) => error!(?error, "failed to listen for shutdown signals"),
            }
        });

        shutdown
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub async fn wait(self) {
        self.token.cancelled_owned().await;
    }
}

#[cfg(test)]
mod test {
    use super::Shutdown;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_releases_waiters() {
        let shutdown = Shutdown::default();
        let waiter = tokio::spawn(shutdown.clone().wait());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();

        // Waiting after the fact completes right away
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .unwrap();
    }
}
