//! RPS Escrow Service binary.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rps_escrow_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();
    tracing::info!(
        stake = config.session.stake,
        grace_secs = config.session.grace_period_secs,
        "Default session parameters"
    );
    if config.manual_clock {
        tracing::info!("Simulated clock enabled, advance it with POST /api/system/tick");
    } else {
        tracing::info!("Using system clock (set RPS_MANUAL_CLOCK=1 to simulate time)");
    }

    let app = create_router(AppState::new(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("RPS escrow service starting on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
