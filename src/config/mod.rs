mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{BrokerSettings, DeliveryMode, LoggingSettings, Settings};

/// Prefix for environment overrides, e.g. `CHATCORE__BROKER__INPUT_CAPACITY`.
pub const ENV_PREFIX: &str = "CHATCORE";

/// Loads the configuration from `config/default` and environment variables,
/// merged over the built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as [`load_config`] but reads the optional file at `path`
/// (extension may be omitted).
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let settings = Settings {
        broker: BrokerSettings {
            input_capacity: partial
                .broker
                .as_ref()
                .and_then(|b| b.input_capacity)
                .unwrap_or(default.broker.input_capacity),
            delivery: partial
                .broker
                .as_ref()
                .and_then(|b| b.delivery)
                .unwrap_or(default.broker.delivery),
            block_timeout_ms: partial
                .broker
                .as_ref()
                .and_then(|b| b.block_timeout_ms)
                .unwrap_or(default.broker.block_timeout_ms),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    };

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.broker.input_capacity == 0 {
        return Err(ConfigError::Message(
            "broker.input_capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
