#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use nabla_relay::adapters::telegram::TelegramClient;
use nabla_relay::api::ServiceContainer;
use nabla_relay::config::Config;
use nabla_relay::services::provider::NotificationProvider;
use nabla_relay::services::rate_limit_service::RateLimitService;
use nabla_relay::services::relay_service::RelayService;
use nabla_relay::{api, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    nabla_relay::setup_panic_hook();

    // Phase 1: Runtime plumbing
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    nabla_relay::spawn_signal_handler(shutdown_tx);

    // Phase 2: Component wiring (no side effects)
    let provider = Arc::new(TelegramClient::new(&config.telegram));
    if !provider.is_configured() {
        tracing::warn!("Bot token or chat id missing; submissions will fail with a configuration error");
    }
    let services = ServiceContainer {
        relay_service: RelayService::new(provider, &config),
        rate_limit_service: RateLimitService::new(config.server.trusted_proxies.clone()),
    };
    let app_router = api::app_router(config.clone(), services);

    // Phase 3: Listen and serve
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(address = %addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let mut rx = shutdown_rx;
    axum::serve(listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = rx.wait_for(|&s| s).await;
        })
        .await?;

    telemetry_guard.shutdown();
    Ok(())
}
