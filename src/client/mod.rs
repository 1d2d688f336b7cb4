//! The `client` module holds the consumer side of the broker.
//!
//! A [`Participant`] owns its outbound queue: it picks the capacity, keeps
//! its own sending half, and hands the broker a clone at join time. The
//! broker only ever sends to that queue.

pub mod participant;
pub use participant::Participant;
