//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_escrow_core::{
    AccountId, Amount, Commitment, GameError, GameResult, LedgerError, Player, Secret,
    SessionConfig, SessionView, Timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::{AppState, GameId, HostError};

pub const ACCOUNT_HEADER: &str = "X-Account-Id";

// ============ Errors ============

#[derive(Debug)]
pub enum AppError {
    MissingCaller,
    BadRequest(String),
    Host(HostError),
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        AppError::Host(err)
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        AppError::Host(HostError::Game(err))
    }
}

fn game_status(err: &GameError) -> StatusCode {
    match err {
        GameError::InsufficientStake
        | GameError::InvalidMove(_)
        | GameError::CommitmentMismatch
        | GameError::Ledger(LedgerError::InsufficientFunds) => StatusCode::BAD_REQUEST,
        GameError::Unauthorized | GameError::NotEntitled => StatusCode::FORBIDDEN,
        _ => StatusCode::CONFLICT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::MissingCaller => (
                StatusCode::UNAUTHORIZED,
                "missing_caller",
                format!("Missing {ACCOUNT_HEADER} header"),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Host(err @ HostError::GameNotFound(_)) => {
                (StatusCode::NOT_FOUND, "game_not_found", err.to_string())
            }
            AppError::Host(err @ HostError::ClockNotSimulated) => {
                (StatusCode::CONFLICT, "clock_not_simulated", err.to_string())
            }
            AppError::Host(HostError::Game(err)) => {
                (game_status(&err), err.kind(), err.to_string())
            }
        };
        (
            status,
            Json(serde_json::json!({"error": message, "kind": kind})),
        )
            .into_response()
    }
}

// ============ Request/Response types ============

#[derive(Deserialize)]
pub struct FundRequest {
    pub account: AccountId,
    pub amount: Amount,
}

#[derive(Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account: AccountId,
    pub balance: Amount,
}

#[derive(Deserialize, Default)]
pub struct CreateGameRequest {
    pub stake: Option<Amount>,
    pub grace_period_secs: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
    pub stake: Amount,
    pub grace_period_secs: i64,
}

#[derive(Deserialize)]
pub struct CommitRequest {
    pub commitment: Commitment,
    pub amount: Amount,
}

#[derive(Serialize, Deserialize)]
pub struct CommitResponse {
    pub player: Player,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    /// 1 rock, 2 paper, 3 scissors
    #[serde(rename = "move")]
    pub move_code: u8,
    pub secret: Secret,
}

#[derive(Serialize, Deserialize)]
pub struct RevealResponse {
    pub player: Player,
    pub revealed_at: Timestamp,
}

#[derive(Serialize, Deserialize)]
pub struct WinnerResponse {
    pub result: GameResult,
    pub code: u8,
}

#[derive(Serialize, Deserialize)]
pub struct PayoutResponse {
    pub account: AccountId,
    pub amount: Amount,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: i64,
}

#[derive(Serialize, Deserialize)]
pub struct TickResponse {
    pub now: Timestamp,
}

// ============ Extraction helpers ============

fn caller_from_header(headers: &HeaderMap) -> Result<AccountId, AppError> {
    let raw = headers
        .get(ACCOUNT_HEADER)
        .ok_or(AppError::MissingCaller)?
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("{ACCOUNT_HEADER} is not ASCII")))?;
    raw.trim()
        .parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid {ACCOUNT_HEADER}: {e}")))
}

fn parse_game_id(raw: &str) -> Result<GameId, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid game id: {e}")))
}

fn parse_player(raw: &str) -> Result<Player, AppError> {
    match raw {
        "a" | "A" => Ok(Player::A),
        "b" | "B" => Ok(Player::B),
        other => Err(AppError::BadRequest(format!("Unknown player: {other}"))),
    }
}

// ============ Account handlers ============

pub async fn fund_account(
    State(state): State<AppState>,
    Json(req): Json<FundRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.fund(&req.account, req.amount)?;
    info!(account = %req.account, amount = req.amount, balance, "account funded");
    Ok(Json(BalanceResponse {
        account: req.account,
        balance,
    }))
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account: AccountId = account
        .parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid account: {e}")))?;
    Ok(Json(BalanceResponse {
        account,
        balance: state.balance(&account),
    }))
}

// ============ Game handlers ============

pub async fn create_game(
    State(state): State<AppState>,
    req: Option<Json<CreateGameRequest>>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let defaults = state.default_session_config();
    let config = SessionConfig::try_new(
        req.stake.unwrap_or(defaults.stake),
        req.grace_period_secs.unwrap_or(defaults.grace_period_secs),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let game_id = state.create_game(config);
    info!(%game_id, stake = config.stake, grace = config.grace_period_secs, "game created");
    Ok(Json(CreateGameResponse {
        game_id,
        stake: config.stake,
        grace_period_secs: config.grace_period_secs,
    }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    Ok(Json(state.view(game_id)?))
}

pub async fn commit(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    let caller = caller_from_header(&headers)?;

    let player = state.commit(game_id, &caller, req.commitment, req.amount)?;
    info!(%game_id, %caller, %player, "commitment accepted");
    Ok(Json(CommitResponse { player }))
}

pub async fn reveal(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<RevealRequest>,
) -> Result<Json<RevealResponse>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    let caller = caller_from_header(&headers)?;

    let (player, revealed_at) = state.reveal(game_id, &caller, req.move_code, &req.secret)?;
    info!(%game_id, %player, at = %revealed_at, "move revealed");
    Ok(Json(RevealResponse {
        player,
        revealed_at,
    }))
}

pub async fn calculate_winner(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<WinnerResponse>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    let result = state.calculate_winner(game_id)?;
    info!(%game_id, result = result.as_str(), "winner declared");
    Ok(Json(WinnerResponse {
        result,
        code: result.code(),
    }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path((game_id, player)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<PayoutResponse>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    let player = parse_player(&player)?;
    let caller = caller_from_header(&headers)?;

    let amount = state.withdraw(game_id, player, &caller)?;
    info!(%game_id, %player, amount, "withdrawal paid");
    Ok(Json(PayoutResponse {
        account: caller,
        amount,
    }))
}

/// The path names the accused: `/timeout/a` is claimed by player B
pub async fn claim_timeout(
    State(state): State<AppState>,
    Path((game_id, accused)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<PayoutResponse>, AppError> {
    let game_id = parse_game_id(&game_id)?;
    let accused = parse_player(&accused)?;
    let caller = caller_from_header(&headers)?;

    let amount = state.timeout(game_id, accused, &caller)?;
    info!(%game_id, %accused, amount, "timeout claimed");
    Ok(Json(PayoutResponse {
        account: caller,
        amount,
    }))
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> Result<Json<TickResponse>, AppError> {
    if req.seconds < 0 {
        return Err(AppError::BadRequest("Time only moves forward".to_string()));
    }
    let now = state.advance_time(req.seconds)?;
    info!(seconds = req.seconds, %now, "simulated time advanced");
    Ok(Json(TickResponse { now }))
}

pub async fn health() -> &'static str {
    "ok"
}
