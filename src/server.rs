use crate::{
    config::AppConfig,
    db,
    error::{GatewayError, Result},
    intake,
    models::{InsertResponse, Person, StatementParams},
    state::AppState,
    store::Store,
};
use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct Server {
    config: AppConfig,
    state: AppState,
}

impl Server {
    /// Connects the pool and runs the one-time schema bootstrap. A bootstrap
    /// failure aborts startup; the gateway never serves against a missing
    /// table.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect_pool(&config)?;
        let store = Store::new(pool);
        store.ensure_schema().await?;
        info!("users table created or already exists");

        let state = AppState::new(store);

        Ok(Self { config, state })
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "gateway listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// The gateway surface: two routes plus a plain-text 404 fallback, with
/// permissive CORS stamped onto every response. An unmatched method on a
/// known path falls back to 404 as well, not 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/insert", post(insert).fallback(not_found))
        .route(
            "/query",
            get(execute_from_params)
                .post(execute_from_body)
                .fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
}

/// Answers CORS preflight with 204 before routing and adds the permissive
/// CORS headers to every other response, errors included.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// `POST /insert`: the body is buffered to completion, then validated, then
/// shaped into one bulk statement. No partial success, no retry.
async fn insert(State(state): State<AppState>, body: Bytes) -> Result<Json<InsertResponse>> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|_| GatewayError::MalformedInsertBody)?;

    let people = body
        .get("people")
        .and_then(Value::as_array)
        .filter(|people| !people.is_empty())
        .ok_or(GatewayError::InvalidPeople)?;
    let people: Vec<Person> = serde_json::from_value(Value::Array(people.clone()))
        .map_err(|_| GatewayError::InvalidPeople)?;

    let inserted = state
        .store
        .bulk_insert(&people)
        .await
        .map_err(GatewayError::Insert)?;

    Ok(Json(InsertResponse {
        message: "Data inserted successfully".to_string(),
        inserted_rows: inserted,
    }))
}

/// `GET /query`: statement from the `query` URL parameter.
async fn execute_from_params(
    State(state): State<AppState>,
    Query(params): Query<StatementParams>,
) -> Result<Json<Value>> {
    execute(&state, params.query.unwrap_or_default()).await
}

/// `POST /query`: statement from the JSON body's `query` field. A missing or
/// non-string field is treated as an absent statement, not a parse error.
async fn execute_from_body(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|_| GatewayError::MalformedStatementBody)?;
    let statement = body
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    execute(&state, statement).await
}

async fn execute(state: &AppState, statement: String) -> Result<Json<Value>> {
    if !intake::statement_allowed(&statement) {
        return Err(GatewayError::DisallowedStatement);
    }

    let result = state
        .store
        .execute_raw(&statement)
        .await
        .map_err(GatewayError::Execute)?;
    Ok(Json(result))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
