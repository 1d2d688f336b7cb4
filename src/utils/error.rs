//! The `error` module defines the errors surfaced to broker callers.
//!
//! Delivery-level failures (unknown recipient, saturated or closed consumer
//! queue) are absorbed by the dispatcher and never show up here. Only the
//! producer-facing and lifecycle conditions are reported.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Cancellation has fired or the dispatcher has already exited.
    #[error("broker stopped")]
    Stopped,

    /// `start` was called on a broker whose dispatcher is already running.
    #[error("broker already started")]
    AlreadyStarted,

    /// The input queue had no free slot for a non-blocking submit.
    #[error("broker input queue is full")]
    QueueFull,
}
