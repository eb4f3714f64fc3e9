//! nanobot - IRC bot.
//!
//! Connects to the configured server, registers, joins its channels and
//! answers authorized commands until interrupted.

use std::time::Instant;

use anyhow::Context as _;
use nanobot::backoff::ExponentialBackoff;
use nanobot::config::{Config, ConfigError};
use nanobot::engine::{Engine, TickOutcome};
use nanobot::transport::TcpTransport;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const BACKOFF_FACTOR: f64 = 2.0;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = Config::embedded().map_err(|e| {
        if let ConfigError::Invalid(errors) = &e {
            for err in errors {
                error!(error = %err, "config rejected");
            }
        } else {
            error!(error = %e, "failed to load embedded config");
        }
        e
    })?;

    let target = config
        .server
        .target()
        .context("server endpoint is not configured")?;

    info!(
        server = %target,
        nick = %config.client.nick,
        channels = ?config.client.channels,
        "starting nanobot"
    );
    info!(
        mode = ?config.network.mode,
        mac = %config.network.mac,
        ip = ?config.network.ip,
        gateway = ?config.network.gateway,
        "link addressing"
    );

    let (min_delay, max_delay) = config.limits.reconnect_bounds();
    let mut backoff = ExponentialBackoff::new(min_delay, max_delay, BACKOFF_FACTOR);
    let mut engine = Engine::new(&config, Instant::now());
    let mut ticker = interval(config.limits.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        engine.connecting();
        let mut transport = match TcpTransport::connect(&target).await {
            Ok(transport) => transport,
            Err(e) => {
                let delay = backoff.next_delay();
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "connect failed");
                tokio::select! {
                    _ = sleep(delay) => continue,
                    _ = tokio::signal::ctrl_c() => return Ok(()),
                }
            }
        };

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    if let Err(e) = engine.shutdown("shutting down") {
                        warn!(error = %e, "QUIT not queued");
                    }
                    let _ = engine.tick(Instant::now(), &mut transport);
                    transport.close();
                    return Ok(());
                }
            }

            match engine.tick(Instant::now(), &mut transport) {
                TickOutcome::Continue => {
                    if engine.session().phase().is_registered() {
                        backoff.reset();
                    }
                }
                TickOutcome::Reconnect => {
                    transport.close();
                    break;
                }
                TickOutcome::Disconnected(cause) => {
                    transport.close();
                    let delay = backoff.next_delay();
                    warn!(%cause, delay_ms = delay.as_millis() as u64, "disconnected");
                    sleep(delay).await;
                    break;
                }
            }
        }
    }
}
