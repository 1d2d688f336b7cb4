//! Lifecycle management for a broker instance.
//!
//! A broker moves through `Created -> Running -> Stopping -> Stopped` exactly
//! once. The cancellation token handed in at construction is the only thing
//! that ends the `Running` phase; the stopped flag is raised by whoever ends
//! the lifecycle (normally the dispatcher on exit) and is what
//! [`Lifecycle::wait_stopped`] observes.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::utils::error::BrokerError;

/// Observable lifecycle state of a broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BrokerState {
    /// Queue and registry exist, dispatcher not spawned.
    Created = 0,
    /// Dispatcher loop active.
    Running = 1,
    /// Cancellation observed, dispatcher winding down.
    Stopping = 2,
    /// Dispatcher gone, stop acknowledgment fired.
    Stopped = 3,
}

impl BrokerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Created,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    shutdown: CancellationToken,
    state: AtomicU8,
    stopped: watch::Sender<bool>,
}

impl Lifecycle {
    pub fn new(shutdown: CancellationToken) -> Self {
        let (stopped, _) = watch::channel(false);
        Self {
            shutdown,
            state: AtomicU8::new(BrokerState::Created as u8),
            stopped,
        }
    }

    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn state(&self) -> BrokerState {
        BrokerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// One-time `Created -> Running` transition.
    ///
    /// A broker cancelled before it ever ran goes straight to `Stopped` and
    /// fires the acknowledgment, since no dispatcher will exist to do it.
    pub(crate) fn begin(&self) -> Result<(), BrokerError> {
        if self.shutdown.is_cancelled() {
            if self.transition(BrokerState::Created, BrokerState::Stopped) {
                self.stopped.send_replace(true);
            }
            return Err(BrokerError::Stopped);
        }

        if self.transition(BrokerState::Created, BrokerState::Running) {
            Ok(())
        } else {
            Err(BrokerError::AlreadyStarted)
        }
    }

    pub(crate) fn mark_stopping(&self) {
        self.state
            .store(BrokerState::Stopping as u8, Ordering::Release);
    }

    /// Enter `Stopped` and fire the acknowledgment.
    pub(crate) fn finish(&self) {
        self.state.store(BrokerState::Stopped as u8, Ordering::Release);
        self.stopped.send_replace(true);
    }

    /// Resolve once the lifecycle has reached `Stopped`.
    ///
    /// For a broker that was never started this resolves as soon as
    /// cancellation fires, because there is no dispatcher left to wait for.
    pub async fn wait_stopped(&self) {
        let mut stopped = self.stopped.subscribe();

        if self.state() == BrokerState::Created {
            self.shutdown.cancelled().await;
            if self.state() == BrokerState::Created {
                return;
            }
        }

        // The sender lives as long as `self`, so this only errors if the
        // lifecycle is being torn down underneath us.
        let _ = stopped.wait_for(|done| *done).await;
    }

    fn transition(&self, from: BrokerState, to: BrokerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
