//! The `utils` module provides shared definitions used across `chatcore`.
//!
//! It holds the broker error type and the logging bootstrap so the broker,
//! the participant helper and the binary report failures and events the
//! same way.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::logging;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("not-a-level");
    }
}
