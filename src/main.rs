//! chatcore daemon
//!
//! Runs a broker until Ctrl-C, with a log tap participant that records every
//! message routed to it. Transports join the same broker through the library.

use chatcore::broker::Broker;
use chatcore::client::Participant;
use chatcore::config::load_config;
use chatcore::utils::logging;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Upper bound on waiting for the dispatcher after Ctrl-C.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Capacity of the log tap's outbound queue.
const TAP_CAPACITY: usize = 256;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        // no-op when run() already installed the subscriber
        logging::init("info");
        error!("Broker failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init(&config.logging.level);

    let shutdown = CancellationToken::new();
    let broker = Arc::new(Broker::with_settings(shutdown.clone(), &config.broker));

    let mut tap = Participant::join(&broker, "log-tap", TAP_CAPACITY);
    let tap_shutdown = shutdown.clone();
    let tap_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tap_shutdown.cancelled() => break,
                Some(msg) = tap.recv() => {
                    info!(
                        sender = %msg.sender,
                        broadcast = msg.broadcast,
                        timestamp = msg.timestamp,
                        "{}",
                        msg.content
                    );
                }
            }
        }
    });

    broker.start()?;
    info!(
        input_capacity = config.broker.input_capacity,
        delivery = ?config.broker.delivery,
        "chatcore running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Stopping broker.");
    shutdown.cancel();

    if tokio::time::timeout(STOP_TIMEOUT, broker.wait_stopped())
        .await
        .is_err()
    {
        warn!("dispatcher did not stop within {:?}", STOP_TIMEOUT);
    }
    let _ = tap_task.await;

    let stats = broker.stats();
    info!(
        dispatched = stats.dispatched,
        delivered = stats.delivered,
        dropped_full = stats.dropped_full,
        dropped_unknown = stats.dropped_unknown,
        dropped_closed = stats.dropped_closed,
        "broker stopped"
    );
    Ok(())
}
