//! End-to-end tests for the HTTP API.
//!
//! The router is driven in-process, one request at a time, with the
//! simulated clock so that timeouts can be exercised deterministically.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rps_escrow_core::protocol::{DEFAULT_STAKE, MAX_GRACE_PERIOD_SECS, MAX_STAKE};
use rps_escrow_core::{AccountId, Commitment, Move, Secret};
use rps_escrow_service::{create_router, AppState, ServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const STAKE: u64 = DEFAULT_STAKE;

/// Helper to manage API calls with caller context
struct TestClient {
    app: Router,
}

impl TestClient {
    fn new(manual_clock: bool) -> Self {
        let config = ServiceConfig {
            manual_clock,
            ..ServiceConfig::default()
        };
        Self {
            app: create_router(AppState::new(&config)),
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&AccountId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header("X-Account-Id", caller.to_string());
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn post(&self, uri: &str, caller: Option<&AccountId>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, caller, Some(body)).await
    }

    async fn post_empty(&self, uri: &str, caller: Option<&AccountId>) -> (StatusCode, Value) {
        self.call(Method::POST, uri, caller, None).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, None).await
    }

    async fn funded_account(&self) -> AccountId {
        let account = AccountId::random();
        let (status, _) = self
            .post(
                "/api/accounts/fund",
                None,
                json!({"account": account.to_string(), "amount": 5 * STAKE}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        account
    }

    async fn balance(&self, account: &AccountId) -> u64 {
        let (status, body) = self.get(&format!("/api/accounts/{account}")).await;
        assert_eq!(status, StatusCode::OK);
        body["balance"].as_u64().unwrap()
    }

    async fn create_game(&self) -> String {
        let (status, body) = self.post_empty("/api/game/create", None).await;
        assert_eq!(status, StatusCode::OK);
        body["game_id"].as_str().unwrap().to_string()
    }

    async fn commit(&self, game: &str, who: &AccountId, mv: Move, secret: &Secret) -> (StatusCode, Value) {
        self.commit_with(game, who, mv, secret, STAKE).await
    }

    async fn commit_with(
        &self,
        game: &str,
        who: &AccountId,
        mv: Move,
        secret: &Secret,
        amount: u64,
    ) -> (StatusCode, Value) {
        let commitment = Commitment::new(who, mv, secret);
        self.post(
            &format!("/api/game/{game}/commit"),
            Some(who),
            json!({"commitment": commitment, "amount": amount}),
        )
        .await
    }

    async fn reveal(&self, game: &str, who: &AccountId, mv: Move, secret: &Secret) -> (StatusCode, Value) {
        self.post(
            &format!("/api/game/{game}/reveal"),
            Some(who),
            json!({"move": mv.code(), "secret": secret}),
        )
        .await
    }
}

#[tokio::test]
async fn test_health() {
    let client = TestClient::new(false);
    let (status, body) = client.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn test_rock_beats_scissors_over_http() {
    let client = TestClient::new(true);
    let alice = client.funded_account().await;
    let bob = client.funded_account().await;
    let game = client.create_game().await;
    let (secret_a, secret_b) = (Secret::random(), Secret::random());

    let (status, body) = client.commit(&game, &alice, Move::Rock, &secret_a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], "A");
    let (status, body) = client.commit(&game, &bob, Move::Scissors, &secret_b).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], "B");

    let (_, view) = client.get(&format!("/api/game/{game}")).await;
    assert_eq!(view["phase"], "committed");
    assert_eq!(view["escrowed"].as_u64(), Some(2 * STAKE));

    let (status, body) = client.reveal(&game, &alice, Move::Rock, &secret_a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], "A");
    let (status, body) = client.reveal(&game, &bob, Move::Scissors, &secret_b).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], "B");
    assert!(body["revealed_at"].is_i64());

    let (status, body) = client
        .post_empty(&format!("/api/game/{game}/calculate-winner"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1);

    let (status, body) = client
        .post_empty(&format!("/api/game/{game}/withdraw/b"), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "not_entitled");

    let (status, body) = client
        .post_empty(&format!("/api/game/{game}/withdraw/a"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_u64(), Some(2 * STAKE));

    let (status, _) = client
        .post_empty(&format!("/api/game/{game}/withdraw/a"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(client.balance(&alice).await, 6 * STAKE);
    assert_eq!(client.balance(&bob).await, 4 * STAKE);
    let (_, view) = client.get(&format!("/api/game/{game}")).await;
    assert_eq!(view["phase"], "closed");
}

#[tokio::test]
async fn test_draw_refunds_over_http() {
    let client = TestClient::new(true);
    let alice = client.funded_account().await;
    let bob = client.funded_account().await;
    let game = client.create_game().await;
    let secret = Secret::random();

    client.commit(&game, &alice, Move::Paper, &secret).await;
    client.commit(&game, &bob, Move::Paper, &secret).await;
    client.reveal(&game, &alice, Move::Paper, &secret).await;
    client.reveal(&game, &bob, Move::Paper, &secret).await;

    let (_, body) = client
        .post_empty(&format!("/api/game/{game}/calculate-winner"), None)
        .await;
    assert_eq!(body["code"], 3);

    for (who, path) in [(&alice, "a"), (&bob, "b")] {
        let (status, body) = client
            .post_empty(&format!("/api/game/{game}/withdraw/{path}"), Some(who))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"].as_u64(), Some(STAKE));
    }
    assert_eq!(client.balance(&alice).await, 5 * STAKE);
    assert_eq!(client.balance(&bob).await, 5 * STAKE);
}

#[tokio::test]
async fn test_timeout_claim_after_grace_period() {
    let client = TestClient::new(true);
    let alice = client.funded_account().await;
    let bob = client.funded_account().await;
    let game = client.create_game().await;
    let (secret_a, secret_b) = (Secret::random(), Secret::random());

    client.commit(&game, &alice, Move::Rock, &secret_a).await;
    client.commit(&game, &bob, Move::Paper, &secret_b).await;
    client.reveal(&game, &bob, Move::Paper, &secret_b).await;

    let timeout_a = format!("/api/game/{game}/timeout/a");
    client.post("/api/system/tick", None, json!({"seconds": 599})).await;
    let (status, body) = client.post_empty(&timeout_a, Some(&bob)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "grace_period_not_elapsed");

    // Only the revealed opponent may claim
    let (status, _) = client.post_empty(&timeout_a, Some(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    client.post("/api/system/tick", None, json!({"seconds": 1})).await;
    let (status, body) = client.post_empty(&timeout_a, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_u64(), Some(2 * STAKE));
    assert_eq!(client.balance(&bob).await, 6 * STAKE);

    let (status, body) = client.reveal(&game, &alice, Move::Rock, &secret_a).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Game was settled by timeout");

    let (_, view) = client.get(&format!("/api/game/{game}")).await;
    assert_eq!(view["phase"], "timed_out");
    assert_eq!(view["paid_out"].as_u64(), Some(2 * STAKE));
}

#[tokio::test]
async fn test_admission_errors() {
    let client = TestClient::new(true);
    let alice = client.funded_account().await;
    let bob = client.funded_account().await;
    let carol = client.funded_account().await;
    let game = client.create_game().await;
    let secret = Secret::random();

    let commitment = Commitment::new(&alice, Move::Rock, &secret);
    let (status, body) = client
        .post(
            &format!("/api/game/{game}/commit"),
            Some(&alice),
            json!({"commitment": commitment, "amount": STAKE - 1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient amount sent");

    client.commit(&game, &alice, Move::Rock, &secret).await;
    let (status, body) = client.commit(&game, &alice, Move::Rock, &secret).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already joined");

    client.commit(&game, &bob, Move::Rock, &secret).await;
    let (status, body) = client.commit(&game, &carol, Move::Rock, &secret).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Game is full");
    assert_eq!(client.balance(&carol).await, 5 * STAKE);

    let (status, body) = client.reveal(&game, &alice, Move::Paper, &secret).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid parameters sent");
}

#[tokio::test]
async fn test_request_validation() {
    let client = TestClient::new(false);
    let alice = client.funded_account().await;
    let game = client.create_game().await;
    let secret = Secret::random();
    let commitment = Commitment::new(&alice, Move::Rock, &secret);
    let body = json!({"commitment": commitment, "amount": STAKE});

    let (status, _) = client
        .post(&format!("/api/game/{game}/commit"), None, body.clone())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client
        .post("/api/game/not-a-uuid/commit", Some(&alice), body.clone())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = client.get(&format!("/api/game/{unknown}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "game_not_found");

    let (status, _) = client
        .post_empty(&format!("/api/game/{game}/withdraw/c"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Real time cannot be ticked
    let (status, body) = client
        .post("/api/system/tick", None, json!({"seconds": 60}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "clock_not_simulated");
}

#[tokio::test]
async fn test_create_game_with_overrides() {
    let client = TestClient::new(true);
    let (status, body) = client
        .post(
            "/api/game/create",
            None,
            json!({"stake": 250, "grace_period_secs": 30}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stake"], 250);
    assert_eq!(body["grace_period_secs"], 30);

    let game = body["game_id"].as_str().unwrap();
    let (_, view) = client.get(&format!("/api/game/{game}")).await;
    assert_eq!(view["stake"], 250);
    assert_eq!(view["phase"], "waiting_for_players");
}

#[tokio::test]
async fn test_create_game_rejects_out_of_range_parameters() {
    let client = TestClient::new(true);
    for body in [
        json!({"grace_period_secs": i64::MAX}),
        json!({"grace_period_secs": -1}),
        json!({"stake": 0}),
        json!({"stake": MAX_STAKE + 1}),
    ] {
        let (status, response) = client.post("/api/game/create", None, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["kind"], "bad_request");
    }
}

#[tokio::test]
async fn test_longest_grace_period_is_honored() {
    let client = TestClient::new(true);
    let alice = client.funded_account().await;
    let bob = client.funded_account().await;
    let (status, body) = client
        .post(
            "/api/game/create",
            None,
            json!({"grace_period_secs": MAX_GRACE_PERIOD_SECS}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let game = body["game_id"].as_str().unwrap().to_string();
    let (secret_a, secret_b) = (Secret::random(), Secret::random());

    client.commit(&game, &alice, Move::Rock, &secret_a).await;
    client.commit(&game, &bob, Move::Paper, &secret_b).await;
    client.reveal(&game, &bob, Move::Paper, &secret_b).await;
    client
        .post("/api/system/tick", None, json!({"seconds": 365 * 24 * 3600}))
        .await;

    let (status, body) = client
        .post_empty(&format!("/api/game/{game}/timeout/a"), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "grace_period_not_elapsed");

    // The late reveal still lands
    let (status, _) = client.reveal(&game, &alice, Move::Rock, &secret_a).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_largest_stake_settles_without_overflow() {
    let client = TestClient::new(true);
    let alice = AccountId::random();
    let bob = AccountId::random();
    for who in [&alice, &bob] {
        client
            .post(
                "/api/accounts/fund",
                None,
                json!({"account": who.to_string(), "amount": MAX_STAKE}),
            )
            .await;
    }
    let (_, body) = client
        .post("/api/game/create", None, json!({"stake": MAX_STAKE}))
        .await;
    let game = body["game_id"].as_str().unwrap().to_string();
    let secret = Secret::random();

    for (who, mv) in [(&alice, Move::Scissors), (&bob, Move::Paper)] {
        let (status, _) = client.commit_with(&game, who, mv, &secret, MAX_STAKE).await;
        assert_eq!(status, StatusCode::OK);
    }
    client.reveal(&game, &alice, Move::Scissors, &secret).await;
    client.reveal(&game, &bob, Move::Paper, &secret).await;
    client
        .post_empty(&format!("/api/game/{game}/calculate-winner"), None)
        .await;

    let (status, body) = client
        .post_empty(&format!("/api/game/{game}/withdraw/a"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_u64(), Some(MAX_STAKE * 2));
    assert_eq!(client.balance(&alice).await, MAX_STAKE * 2);
}

#[tokio::test]
async fn test_escrow_pool_overflow_is_rejected() {
    let client = TestClient::new(true);
    let (_, body) = client
        .post("/api/game/create", None, json!({"stake": MAX_STAKE}))
        .await;
    let first = body["game_id"].as_str().unwrap().to_string();
    let (_, body) = client
        .post("/api/game/create", None, json!({"stake": MAX_STAKE}))
        .await;
    let second = body["game_id"].as_str().unwrap().to_string();
    let secret = Secret::random();

    let mut accounts = Vec::new();
    for _ in 0..3 {
        let who = AccountId::random();
        client
            .post(
                "/api/accounts/fund",
                None,
                json!({"account": who.to_string(), "amount": MAX_STAKE}),
            )
            .await;
        accounts.push(who);
    }
    for who in &accounts[..2] {
        let (status, _) = client
            .commit_with(&first, who, Move::Rock, &secret, MAX_STAKE)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    // The shared pool already holds 2 * MAX_STAKE, one short of the limit
    let (status, body) = client
        .commit_with(&second, &accounts[2], Move::Rock, &secret, MAX_STAKE)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "ledger");
    assert_eq!(client.balance(&accounts[2]).await, MAX_STAKE);

    let (_, view) = client.get(&format!("/api/game/{second}")).await;
    assert_eq!(view["player_a"], Value::Null);
    assert_eq!(view["escrowed"], 0);
}

#[tokio::test]
async fn test_fund_overflow_is_rejected() {
    let client = TestClient::new(false);
    let alice = AccountId::random();
    let fund = |amount: u64| json!({"account": alice.to_string(), "amount": amount});

    let (status, body) = client.post("/api/accounts/fund", None, fund(u64::MAX)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"].as_u64(), Some(u64::MAX));

    let (status, body) = client.post("/api/accounts/fund", None, fund(1)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Transfer failed: Amount overflow");
    assert_eq!(client.balance(&alice).await, u64::MAX);
}
