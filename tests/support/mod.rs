use axum::{
    body::{self, Body},
    http::{Response, StatusCode},
    Router,
};
use serde_json::Value;
use sqlgate::{config::AppConfig, db, server, state::AppState, store::Store};
use std::net::SocketAddr;

/// Router over a lazily-built pool pointing at an unreachable store. Only
/// request paths that never reach the pool may be exercised through it.
pub fn offline_router() -> Router {
    let config = offline_config();
    let pool = db::connect_pool(&config).expect("pool construction should not touch the store");
    let state = AppState::new(Store::new(pool));
    server::router(state)
}

fn offline_config() -> AppConfig {
    AppConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_host: "127.0.0.1".into(),
        // Nothing listens on port 1; a handler that reaches the pool will
        // fail loudly instead of silently passing.
        db_port: 1,
        db_user: "sqlgate".into(),
        db_password: "sqlgate".into(),
        db_name: "sqlgate".into(),
        db_tls: false,
        max_pool_size: 2,
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("response body was not JSON ({err}): {bytes:?}"));
    (status, value)
}

pub async fn read_text(response: Response<Body>) -> (StatusCode, String) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
