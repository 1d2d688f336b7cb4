//! Dispatcher
//!
//! The single sequential worker behind a broker. It drains the input queue,
//! stamps each message and offers it to one participant (direct) or to every
//! participant registered at that moment (broadcast).
//!
//! Delivery never fails the loop: unknown recipients, saturated queues and
//! closed queues are counted and logged, then the message moves on. Under the
//! default [`DeliveryPolicy::Drop`] the dispatcher never waits on a consumer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tracing::{debug, info, trace};

use crate::broker::lifecycle::Lifecycle;
use crate::broker::message::Message;
use crate::broker::registry::{Outbox, Registry};
use crate::broker::stats::Counters;

/// What the dispatcher does when a participant's outbound queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Attempt once and drop the copy for that participant.
    #[default]
    Drop,
    /// Wait up to `timeout` for room, then drop. Stalls every other delivery
    /// while waiting.
    Block { timeout: Duration },
}

enum Dropped {
    Full,
    Closed,
}

pub(crate) struct Dispatcher {
    inbox: mpsc::Receiver<Message>,
    registry: Arc<Registry>,
    lifecycle: Arc<Lifecycle>,
    counters: Arc<Counters>,
    policy: DeliveryPolicy,
    last_stamp: i64,
}

impl Dispatcher {
    pub(crate) fn new(
        inbox: mpsc::Receiver<Message>,
        registry: Arc<Registry>,
        lifecycle: Arc<Lifecycle>,
        counters: Arc<Counters>,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            inbox,
            registry,
            lifecycle,
            counters,
            policy,
            last_stamp: i64::MIN,
        }
    }

    /// Run until cancellation fires or every producer handle is gone.
    ///
    /// Messages still queued at cancellation are abandoned, not delivered.
    pub(crate) async fn run(mut self) {
        info!(policy = ?self.policy, "dispatcher started");
        let shutdown = self.lifecycle.shutdown().clone();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!("dispatcher observed cancellation");
                    break;
                }
                next = self.inbox.recv() => match next {
                    Some(msg) => self.dispatch(msg).await,
                    None => {
                        debug!("input queue has no producers left");
                        break;
                    }
                },
            }
        }

        self.lifecycle.mark_stopping();
        // Producers parked on a full queue see a closed channel from here on.
        self.inbox.close();
        let abandoned = self.inbox.len();
        drop(self.inbox);

        let stats = self.counters.snapshot();
        info!(
            dispatched = stats.dispatched,
            delivered = stats.delivered,
            dropped = stats.dropped(),
            abandoned,
            "dispatcher stopped"
        );
        self.lifecycle.finish();
    }

    async fn dispatch(&mut self, mut msg: Message) {
        msg.timestamp = self.stamp();
        self.counters.record_dispatched();

        if msg.broadcast {
            let targets = self.registry.snapshot();
            trace!(
                sender = %msg.sender,
                targets = targets.len(),
                "broadcasting message"
            );
            for (id, outbox) in &targets {
                self.deliver(id, outbox, msg.clone()).await;
            }
            return;
        }

        match self.registry.lookup(&msg.recipient) {
            Some(outbox) => {
                let recipient = msg.recipient.clone();
                self.deliver(&recipient, &outbox, msg).await;
            }
            None => {
                self.counters.record_unknown();
                debug!(
                    sender = %msg.sender,
                    recipient = %msg.recipient,
                    "dropping direct message for unregistered recipient"
                );
            }
        }
    }

    async fn deliver(&self, id: &str, outbox: &Outbox, msg: Message) {
        let outcome = match self.policy {
            DeliveryPolicy::Drop => outbox.try_send(msg).map_err(|err| match err {
                TrySendError::Full(_) => Dropped::Full,
                TrySendError::Closed(_) => Dropped::Closed,
            }),
            DeliveryPolicy::Block { timeout } => {
                outbox
                    .send_timeout(msg, timeout)
                    .await
                    .map_err(|err| match err {
                        SendTimeoutError::Timeout(_) => Dropped::Full,
                        SendTimeoutError::Closed(_) => Dropped::Closed,
                    })
            }
        };

        match outcome {
            Ok(()) => {
                self.counters.record_delivered();
                trace!(participant = %id, "delivered");
            }
            Err(Dropped::Full) => {
                self.counters.record_full();
                debug!(participant = %id, "outbound queue full, message dropped");
            }
            Err(Dropped::Closed) => {
                self.counters.record_closed();
                debug!(participant = %id, "outbound queue closed, message dropped");
            }
        }
    }

    /// Wall-clock millis, never lower than the previous stamp.
    fn stamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_stamp = self.last_stamp.max(now);
        self.last_stamp
    }
}
