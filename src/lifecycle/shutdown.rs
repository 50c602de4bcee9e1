//! Shutdown coordination for background tasks.
//!
//! Built on a `watch` channel holding a stopped flag: once triggered, every
//! listener observes it, including listeners created afterwards.

use tokio::sync::watch;

/// Owner side of a shutdown signal.
#[derive(Debug)]
pub struct Shutdown {
    stopped: watch::Sender<bool>,
}

/// Task side of a shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    stopped: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (stopped, _) = watch::channel(false);
        Self { stopped }
    }

    /// Hand out a listener for one background task.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            stopped: self.stopped.subscribe(),
        }
    }

    /// Signal every listener. Idempotent.
    pub fn trigger(&self) {
        self.stopped.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.stopped.borrow()
    }

    /// Number of listeners still alive.
    pub fn listener_count(&self) -> usize {
        self.stopped.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolve once shutdown is triggered or its owner is dropped.
    pub async fn wait(&mut self) {
        let _ = self.stopped.wait_for(|stopped| *stopped).await;
    }

    pub fn is_triggered(&self) -> bool {
        *self.stopped.borrow()
    }
}
