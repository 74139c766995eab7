//!
//! bourse HTTP server
//! ------------------
//! Axum routes for the securities directory and the read-only market data endpoints.
//!
//! Responsibilities:
//! - Translate query strings and JSON bodies into directory calls.
//! - Wrap every result in the shared JSON envelope.
//! - Attach permissive CORS headers and answer preflight requests.
//! - Process lifecycle: seeding, fixture loading, binding and graceful shutdown.

use std::{collections::HashMap, future::{Future, IntoFuture}, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::directory::{DirectoryService, FavoriteRequest, SearchCriteria, Security, SecurityRequest};
use crate::error::{AppError, AppResult, DirectoryError};
use crate::market_data::{BubbleSnapshot, FixtureMarketData, MarketDataSource, MarketEvent};

pub mod envelope;
mod params;

use envelope::ApiResponse;

/// Upper bound on events returned by `/api/marketplace/events`.
pub const EVENTS_LIMIT: usize = 10;

/// How long in-flight connections may keep the server alive after shutdown is requested.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
const CORS_ALLOW_HEADERS: &str = "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: DirectoryService,
    pub market_data: Arc<dyn MarketDataSource>,
}

impl AppState {
    pub fn new(directory: DirectoryService, market_data: Arc<dyn MarketDataSource>) -> Self {
        Self { directory, market_data }
    }
}

/// Build the full route table. Exposed so tests can serve it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "bourse ok" }))
        .route("/api/marketplace/securities", get(list_securities).post(create_security))
        .route(
            "/api/marketplace/securities/{id}",
            get(get_security).put(update_security).delete(delete_security),
        )
        .route("/api/marketplace/securities/{id}/favorite", post(toggle_favorite))
        .route("/api/marketplace/favorites", get(list_favorites))
        .route("/api/marketplace/search", post(search_securities))
        .route("/api/marketplace/security/{sec_ref_id}/bubble_snapshot/list", get(list_bubble_snapshots))
        .route("/api/marketplace/events", get(list_events))
        .fallback(unknown_route)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(middleware::from_fn(cors))
}

async fn cors(req: Request, next: Next) -> Response {
    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = res.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(CORS_ALLOW_ORIGIN));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(CORS_ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(CORS_ALLOW_HEADERS));
    res
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::not_found("not_found".to_string(), format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    let body = ApiResponse::<()>::failure(format!("method {} not allowed on {}", method, uri.path()));
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

/// Unwrap a JSON body or turn the rejection into a 400 envelope.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rej) => {
            debug!(target: "bourse::http", "rejected request body: {}", rej.body_text());
            Err(AppError::user("invalid_request".to_string(), format!("invalid request body: {}", rej.body_text())))
        }
    }
}

async fn list_securities(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<Security>>> {
    let criteria = params::criteria_from_query(&q);
    Json(ApiResponse::page(state.directory.search(&criteria)))
}

async fn list_favorites(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<Security>>> {
    let criteria = params::criteria_from_query(&q);
    Json(ApiResponse::page(state.directory.list_favorites(&criteria)))
}

async fn search_securities(
    State(state): State<AppState>,
    body: Result<Json<SearchCriteria>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Vec<Security>>>> {
    let criteria = json_body(body)?;
    Ok(Json(ApiResponse::page(state.directory.search(&criteria))))
}

async fn get_security(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Security>>> {
    Ok(Json(ApiResponse::ok(state.directory.get(&id)?)))
}

async fn create_security(
    State(state): State<AppState>,
    body: Result<Json<SecurityRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Security>>)> {
    let req = json_body(body)?;
    let created = state.directory.create(req)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(created).with_message("Security created successfully")),
    ))
}

async fn update_security(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SecurityRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Security>>> {
    let req = json_body(body)?;
    let updated = state.directory.update(&id, req)?;
    Ok(Json(ApiResponse::ok(updated).with_message("Security updated successfully")))
}

async fn delete_security(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.directory.delete(&id)?;
    Ok(Json(ApiResponse::done("Security deleted successfully")))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FavoriteRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Security>>> {
    let req = json_body(body)?;
    // The path id is authoritative; a securityId in the body is accepted and ignored.
    let updated = state.directory.toggle_favorite(&id, req.is_favorite)?;
    Ok(Json(ApiResponse::ok(updated).with_message("Favorite status updated successfully")))
}

async fn list_bubble_snapshots(
    State(state): State<AppState>,
    Path(sec_ref_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<BubbleSnapshot>>>> {
    if sec_ref_id.trim().is_empty() {
        return Err(AppError::user("invalid_request".to_string(), "Security ID is required".to_string()));
    }
    let snapshots = state
        .market_data
        .bubble_snapshots(&sec_ref_id)
        .with_context(|| format!("listing bubble snapshots for {sec_ref_id}"))
        .map_err(DirectoryError::from)?;
    Ok(Json(ApiResponse::ok(snapshots)))
}

async fn list_events(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<MarketEvent>>>> {
    let events = state
        .market_data
        .events(EVENTS_LIMIT)
        .context("listing market events")
        .map_err(DirectoryError::from)?;
    Ok(Json(ApiResponse::ok(events)))
}

/// Serve `state` on an already-bound listener until `shutdown` resolves. Connections still
/// open [`SHUTDOWN_TIMEOUT`] after that are abandoned.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("reading listener address")?;
    info!(target: "startup", "bourse listening on {}", addr);

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => res.context("http server terminated")?,
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server).await {
                Ok(res) => res.context("http server terminated")?,
                Err(_) => warn!(
                    target: "startup",
                    "connections still open after {:?}; stopping anyway",
                    SHUTDOWN_TIMEOUT
                ),
            }
        }
    }
    info!(target: "startup", "bourse stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "startup", "failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(target: "startup", "failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "startup", "shutdown signal received");
}

/// Build the application state described by `config`.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let directory = if config.seed_demo_data {
        DirectoryService::with_demo_data().context("seeding demo securities")?
    } else {
        DirectoryService::default()
    };
    let market_data = match &config.fixtures_path {
        Some(path) => FixtureMarketData::from_path(path)?,
        None => FixtureMarketData::empty(),
    };
    Ok(AppState::new(directory, Arc::new(market_data)))
}

pub async fn run_with_config(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        target: "startup",
        "bourse starting: bind={}, seed_demo_data={}, fixtures={:?}",
        config.bind_addr(),
        config.seed_demo_data,
        config.fixtures_path
    );
    let state = build_state(&config)?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    serve(listener, state, shutdown_signal()).await
}

/// Start with configuration taken from the environment.
pub async fn run() -> anyhow::Result<()> {
    run_with_config(ServerConfig::from_env()).await
}
