use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the message broker and for logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the broker.
///
/// `input_capacity` bounds the producer-facing queue. `delivery` picks what
/// happens when a participant's outbound queue is full; `block_timeout_ms`
/// only matters for [`DeliveryMode::Block`].
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    pub input_capacity: usize,
    pub delivery: DeliveryMode,
    pub block_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Drop the copy for a participant whose queue is full.
    #[default]
    Drop,
    /// Wait a bounded time for room before dropping.
    Block,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub input_capacity: Option<usize>,
    pub delivery: Option<DeliveryMode>,
    pub block_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            input_capacity: 100,
            delivery: DeliveryMode::Drop,
            block_timeout_ms: 50,
        }
    }
}
