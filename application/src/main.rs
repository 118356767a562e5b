use std::{future::IntoFuture as _, io, sync::OnceLock};

use application::{Args, Config, Service};
use service::{
    infra::{database, queue},
    pricing::Calculators,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config { pricing, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let pricing = pricing.try_into().map_err(|e| {
        log::error!("failed to validate pricing configuration: {e}");
    })?;
    let config = service::Config {
        pricing,
        calculators: Calculators::default(),
    };

    let (service, background) = Service::new(
        config,
        database::InMemory::default(),
        queue::InMemory::default(),
    );

    log::info!("service started");

    tokio::select! {
        res = background.into_future() => res.map_err(|e| {
            log::error!("background task failed: {e}");
        }),
        res = tokio::signal::ctrl_c() => {
            drop(service);
            res.map(|()| log::info!("shutting down")).map_err(|e| {
                log::error!("failed to await shutdown signal: {e}");
            })
        }
    }
}
