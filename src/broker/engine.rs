//! Broker engine
//!
//! This module contains the in-process router responsible for:
//! - accepting messages from any number of concurrent producers
//! - keeping the participant registry (join/leave)
//! - owning the input queue and spawning the dispatcher that drains it
//! - tying all of the above to a cancellation token
//!
//! Concurrency and usage notes:
//! - Every method takes `&self`; share the broker as `Arc<Broker>` between
//!   producers and sessions. No outer lock is needed.
//! - Producer backpressure is blocking (`send` parks while the input queue is
//!   full), consumer delivery is not (see [`DeliveryPolicy`]).
//! - Cancellation is the sole shutdown authority. The input queue is never
//!   closed by producers; once the dispatcher exits, any further submit maps
//!   to [`BrokerError::Stopped`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::broker::dispatcher::{DeliveryPolicy, Dispatcher};
use crate::broker::lifecycle::{BrokerState, Lifecycle};
use crate::broker::message::Message;
use crate::broker::registry::{Outbox, ParticipantId, Registry};
use crate::broker::stats::{Counters, DeliveryStats};
use crate::config::{BrokerSettings, DeliveryMode};
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct Broker {
    input: mpsc::Sender<Message>,
    // Taken by the first successful `start`.
    inbox: Mutex<Option<mpsc::Receiver<Message>>>,
    registry: Arc<Registry>,
    lifecycle: Arc<Lifecycle>,
    counters: Arc<Counters>,
    policy: DeliveryPolicy,
}

impl Broker {
    /// Capacity of the input queue when no settings are given.
    pub const DEFAULT_INPUT_CAPACITY: usize = 100;

    /// Creates a broker bound to `shutdown` with default settings.
    ///
    /// Nothing is dispatched until [`Broker::start`] is called.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self::with_settings(shutdown, &BrokerSettings::default())
    }

    pub fn with_settings(shutdown: CancellationToken, settings: &BrokerSettings) -> Self {
        let (input, inbox) = mpsc::channel(settings.input_capacity.max(1));
        let policy = match settings.delivery {
            DeliveryMode::Drop => DeliveryPolicy::Drop,
            DeliveryMode::Block => DeliveryPolicy::Block {
                timeout: Duration::from_millis(settings.block_timeout_ms),
            },
        };

        Self {
            input,
            inbox: Mutex::new(Some(inbox)),
            registry: Arc::new(Registry::new()),
            lifecycle: Arc::new(Lifecycle::new(shutdown)),
            counters: Arc::new(Counters::default()),
            policy,
        }
    }

    /// Spawns the dispatcher onto the current tokio runtime and returns.
    ///
    /// Only the first call starts anything. Later calls fail with
    /// [`BrokerError::AlreadyStarted`]; a call after cancellation fails with
    /// [`BrokerError::Stopped`].
    pub fn start(&self) -> Result<(), BrokerError> {
        self.lifecycle.begin()?;

        let inbox = self
            .inbox
            .lock()
            .take()
            .ok_or(BrokerError::AlreadyStarted)?;

        let dispatcher = Dispatcher::new(
            inbox,
            self.registry.clone(),
            self.lifecycle.clone(),
            self.counters.clone(),
            self.policy,
        );
        tokio::spawn(dispatcher.run());

        info!("broker started");
        Ok(())
    }

    /// Submits one message.
    ///
    /// Parks the caller while the input queue is full. `Ok` means the message
    /// entered the pipeline, not that anyone received it.
    pub async fn send(&self, msg: Message) -> Result<(), BrokerError> {
        let shutdown = self.lifecycle.shutdown();
        if shutdown.is_cancelled() {
            return Err(BrokerError::Stopped);
        }

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => Err(BrokerError::Stopped),
            sent = self.input.send(msg) => sent.map_err(|_| BrokerError::Stopped),
        }
    }

    /// Non-blocking variant of [`Broker::send`].
    pub fn try_send(&self, msg: Message) -> Result<(), BrokerError> {
        if self.lifecycle.is_cancelled() {
            return Err(BrokerError::Stopped);
        }

        self.input.try_send(msg).map_err(|err| match err {
            TrySendError::Full(_) => BrokerError::QueueFull,
            TrySendError::Closed(_) => BrokerError::Stopped,
        })
    }

    /// Joins `id` with the given outbound queue, replacing any earlier
    /// registration under the same id.
    ///
    /// The broker keeps a clone of `outbox` and never closes it. Takes effect
    /// from the next message the dispatcher processes.
    pub fn register(&self, id: impl Into<ParticipantId>, outbox: Outbox) {
        let id = id.into();
        if self.registry.register(id.clone(), outbox) {
            debug!(participant = %id, "registration replaced");
        } else {
            debug!(participant = %id, "participant registered");
        }
    }

    /// Removes `id` from the registry. No-op when absent.
    pub fn unregister(&self, id: &str) {
        if self.registry.unregister(id) {
            debug!(participant = %id, "participant unregistered");
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    pub fn state(&self) -> BrokerState {
        self.lifecycle.state()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.counters.snapshot()
    }

    /// The token this broker was built with.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.lifecycle.shutdown().clone()
    }

    /// Resolves once the dispatcher has fully exited after cancellation.
    pub async fn wait_stopped(&self) {
        self.lifecycle.wait_stopped().await;
    }
}
