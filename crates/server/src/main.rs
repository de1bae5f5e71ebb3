use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use server_api::{
    chat, create_goal, delete_goal, list_goals, update_goal, ApiContext, ChatAdvisor,
    GeminiAdvisor, MissingChatAdvisor,
};
use shared::{
    domain::{Goal, GoalIndex},
    error::{ApiError, ErrorCode},
    protocol::{ChatRequest, ChatResponse, StatusResponse, CHAT_ROUTE, GOALS_ROUTE},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let advisor: Arc<dyn ChatAdvisor> = match settings.gemini_config() {
        Some(gemini) => {
            info!(model = %gemini.model, "gemini chat advisor configured");
            Arc::new(GeminiAdvisor::new(gemini))
        }
        None => {
            warn!("GEMINI_API_KEY not set; chat requests will be answered with errors");
            Arc::new(MissingChatAdvisor)
        }
    };

    let state = AppState {
        api: ApiContext { storage, advisor },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(GOALS_ROUTE, get(http_list_goals).post(http_create_goal))
        .route("/api/goals/:index", put(http_update_goal).delete(http_delete_goal))
        .route(CHAT_ROUTE, axum::routing::post(http_chat))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            error!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn http_list_goals(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Goal>> {
    list_goals(&state.api).await.map(Json).map_err(reject)
}

async fn http_create_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<Goal>,
) -> ApiResult<StatusResponse> {
    create_goal(&state.api, goal).await.map_err(reject)?;
    Ok(Json(StatusResponse::success()))
}

async fn http_update_goal(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(goal): Json<Goal>,
) -> ApiResult<StatusResponse> {
    update_goal(&state.api, GoalIndex(index), goal)
        .await
        .map_err(reject)?;
    Ok(Json(StatusResponse::success()))
}

async fn http_delete_goal(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<StatusResponse> {
    delete_goal(&state.api, GoalIndex(index))
        .await
        .map_err(reject)?;
    Ok(Json(StatusResponse::success()))
}

async fn http_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    chat(&state.api, req).await.map(Json).map_err(reject)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unavailable | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
