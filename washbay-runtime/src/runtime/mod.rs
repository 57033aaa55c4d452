mod error;

pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

pub mod builder;
pub mod sequencer;

pub use self::builder::Builder;
pub use self::sequencer::Sequencer;

pub struct RuntimeContext {
    /// Runtime shutdown channel.
    pub shutdown: (
        tokio::sync::broadcast::Sender<()>,
        tokio::sync::broadcast::Receiver<()>,
    ),
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self {
            shutdown: tokio::sync::broadcast::channel(1),
        }
    }

    /// Listen for shutdown signal.
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.shutdown.0.subscribe()
    }

    /// Request all listeners to shutdown.
    ///
    /// Requesting shutdown without listeners is not an error.
    pub fn request_shutdown(&self) {
        if self.shutdown.0.send(()).is_err() {
            debug!("Shutdown requested without listeners");
        }
    }

    /// Sender half of the shutdown channel.
    pub fn shutdown_trigger(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown.0.clone()
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal() {
        let context = RuntimeContext::new();

        let mut signal = context.shutdown_signal();
        assert!(signal.try_recv().is_err());

        context.request_shutdown();
        assert!(signal.recv().await.is_ok());
    }
}
