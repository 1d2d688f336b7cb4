use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::broker::{Broker, Message, Outbox, ParticipantId};

/// A participant joined to a broker.
///
/// Holds both halves of its outbound queue, so the queue stays open after
/// [`Participant::leave`] or after the broker replaces this registration;
/// a stale participant simply stops receiving.
#[derive(Debug)]
pub struct Participant {
    /// Identifier the participant is registered under.
    pub id: ParticipantId,

    outbox: Outbox,
    inbox: mpsc::Receiver<Message>,
}

impl Participant {
    /// Creates an outbound queue holding up to `capacity` messages and
    /// registers it under `id`.
    pub fn join(broker: &Broker, id: impl Into<ParticipantId>, capacity: usize) -> Self {
        let id = id.into();
        let (outbox, inbox) = mpsc::channel(capacity.max(1));
        broker.register(id.clone(), outbox.clone());
        Self { id, outbox, inbox }
    }

    /// Joins under a generated `participant-<uuid>` id.
    pub fn anonymous(broker: &Broker, capacity: usize) -> Self {
        let id = format!("participant-{}", uuid::Uuid::new_v4());
        Self::join(broker, id, capacity)
    }

    /// Waits for the next delivered message.
    ///
    /// The participant keeps its own sender, so this never returns `None`
    /// while `self` is alive; pair it with a timeout or a cancellation
    /// branch when nothing may arrive.
    pub async fn recv(&mut self) -> Option<Message> {
        self.inbox.recv().await
    }

    /// Next delivered message, if one is already queued.
    pub fn try_recv(&mut self) -> Option<Message> {
        match self.inbox.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Everything currently queued, oldest first.
    pub fn drain(&mut self) -> Vec<Message> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Rejoins the same queue under the same id, e.g. after a replace.
    pub fn rejoin(&self, broker: &Broker) {
        broker.register(self.id.clone(), self.outbox.clone());
    }

    /// Unregisters from `broker` and hands back the remaining queue contents.
    pub fn leave(mut self, broker: &Broker) -> Vec<Message> {
        broker.unregister(&self.id);
        self.drain()
    }
}
