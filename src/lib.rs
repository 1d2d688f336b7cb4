//! # chatcore
//!
//! `chatcore` is an in-process message router for chat-style traffic.
//! Producers submit short text messages addressed to one participant or to
//! everyone; a single dispatcher stamps them and fans them out to
//! per-participant queues owned by the consumers.
//!
//! ## Core Modules
//!
//! - `broker`: The router itself: input queue, participant registry, dispatcher and lifecycle.
//! - `client`: Consumer-side `Participant` that owns an outbound queue and joins a broker.
//! - `config`: Loading broker and logging settings from files and the environment.
//! - `utils`: Shared error type and logging bootstrap.
//!
//! Delivery is best-effort and at-most-once. A saturated or vanished consumer
//! never slows the dispatcher down; its copy is dropped and counted.

pub mod broker;
pub mod client;
pub mod config;
pub mod utils;
