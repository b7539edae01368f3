//! RPS Escrow Service
//!
//! Hosts stake-backed Rock-Paper-Scissors sessions over a JSON API, holding
//! the ledger and the clock the sessions run against.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use handlers::*;
pub use config::ServiceConfig;
pub use state::{AppState, GameId, HostError};

/// Build the API router over `state`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Accounts
        .route("/api/accounts/fund", post(fund_account))
        .route("/api/accounts/:account", get(get_balance))
        // Games
        .route("/api/game/create", post(create_game))
        .route("/api/game/:game_id", get(get_game))
        .route("/api/game/:game_id/commit", post(commit))
        .route("/api/game/:game_id/reveal", post(reveal))
        .route("/api/game/:game_id/calculate-winner", post(calculate_winner))
        .route("/api/game/:game_id/withdraw/:player", post(withdraw))
        .route("/api/game/:game_id/timeout/:player", post(claim_timeout))
        // System
        .route("/api/system/tick", post(tick))
        // Health
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}
