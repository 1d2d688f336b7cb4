pub mod dispatcher;
pub mod engine;
pub mod lifecycle;
pub mod message;
pub mod registry;
pub mod stats;

pub use dispatcher::DeliveryPolicy;
pub use engine::Broker;
pub use lifecycle::BrokerState;
pub use message::Message;
pub use registry::{Outbox, ParticipantId};
pub use stats::DeliveryStats;
