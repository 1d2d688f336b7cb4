//! Participant registry
//!
//! Maps a participant id to the sending half of that participant's outbound
//! queue. The queue itself belongs to the participant: the registry only holds
//! a sender clone while the participant is registered and never closes it.
//!
//! Concurrency note: all access goes through a `parking_lot::RwLock`. The
//! dispatcher takes the shared side for lookups and broadcast snapshots,
//! join/leave take the exclusive side. Guards never live across an `.await`.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::broker::message::Message;

pub type ParticipantId = String;

/// Sending half of a participant's outbound queue.
pub type Outbox = mpsc::Sender<Message>;

#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<ParticipantId, Outbox>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the outbox for `id`.
    ///
    /// Returns `true` when an earlier registration was replaced. The previous
    /// handle is dropped without notifying its owner.
    pub fn register(&self, id: ParticipantId, outbox: Outbox) -> bool {
        self.entries.write().insert(id, outbox).is_some()
    }

    /// Remove `id`. Returns whether it was present.
    pub fn unregister(&self, id: &str) -> bool {
        self.entries.write().remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Outbox currently registered for `id`, if any.
    pub fn lookup(&self, id: &str) -> Option<Outbox> {
        self.entries.read().get(id).cloned()
    }

    /// Every registered participant at this instant.
    ///
    /// Later joins and leaves do not affect the returned snapshot.
    pub fn snapshot(&self) -> Vec<(ParticipantId, Outbox)> {
        self.entries
            .read()
            .iter()
            .map(|(id, outbox)| (id.clone(), outbox.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
