use super::*;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct StubState {
    goals: Arc<Mutex<Vec<Goal>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    mutation_status: StatusCode,
    chat_body: Arc<String>,
}

impl StubState {
    async fn record(&self, method: Method, path: String, body: Option<serde_json::Value>) {
        self.requests
            .lock()
            .await
            .push(Recorded { method, path, body });
    }
}

async fn stub_list(State(state): State<StubState>) -> Json<Vec<Goal>> {
    state.record(Method::GET, "/api/goals".into(), None).await;
    Json(state.goals.lock().await.clone())
}

async fn stub_create(
    State(state): State<StubState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state
        .record(Method::POST, "/api/goals".into(), Some(body))
        .await;
    (
        state.mutation_status,
        Json(serde_json::json!({ "status": "success" })),
    )
}

async fn stub_update(
    State(state): State<StubState>,
    Path(index): Path<usize>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    state
        .record(Method::PUT, format!("/api/goals/{index}"), Some(body))
        .await;
    state.mutation_status
}

async fn stub_delete(State(state): State<StubState>, Path(index): Path<usize>) -> StatusCode {
    state
        .record(Method::DELETE, format!("/api/goals/{index}"), None)
        .await;
    state.mutation_status
}

async fn stub_chat(
    State(state): State<StubState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, String) {
    state.record(Method::POST, "/api/chat".into(), Some(body)).await;
    (StatusCode::OK, state.chat_body.as_ref().clone())
}

async fn spawn_goals_server(
    goals: Vec<Goal>,
    mutation_status: StatusCode,
    chat_body: &str,
) -> Result<(String, StubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StubState {
        goals: Arc::new(Mutex::new(goals)),
        requests: Arc::new(Mutex::new(Vec::new())),
        mutation_status,
        chat_body: Arc::new(chat_body.to_string()),
    };
    let app = Router::new()
        .route("/api/goals", get(stub_list).post(stub_create))
        .route("/api/goals/:index", put(stub_update).delete(stub_delete))
        .route("/api/chat", post(stub_chat))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn vacation() -> Goal {
    Goal::new("Vacation", 2000.0, 500.0, "2025-08-01")
}

#[test]
fn rejects_unparseable_or_non_http_server_urls() {
    let err = HttpGoalsApi::new("not a url").err().expect("invalid");
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

    let err = HttpGoalsApi::new("ftp://example.com").err().expect("scheme");
    assert!(err.to_string().contains("unsupported scheme"));
}

#[test]
fn trims_trailing_slash_from_server_url() {
    let api = HttpGoalsApi::new("http://127.0.0.1:5000/").expect("api");
    assert_eq!(api.server_url(), "http://127.0.0.1:5000");
    assert_eq!(api.url(GOALS_ROUTE), "http://127.0.0.1:5000/api/goals");
}

#[tokio::test]
async fn list_goals_decodes_backend_collection() {
    let (server_url, _state) = spawn_goals_server(vec![vacation()], StatusCode::OK, "{}")
        .await
        .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    let goals = api.list_goals().await.expect("list");
    assert_eq!(goals, vec![vacation()]);
}

#[tokio::test]
async fn create_posts_camel_case_goal() {
    let (server_url, state) = spawn_goals_server(Vec::new(), StatusCode::OK, "{}")
        .await
        .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    api.create_goal(&vacation()).await.expect("create");

    let requests = state.requests.lock().await.clone();
    assert_eq!(
        requests,
        vec![Recorded {
            method: Method::POST,
            path: "/api/goals".into(),
            body: Some(serde_json::json!({
                "name": "Vacation",
                "targetAmount": 2000.0,
                "currentAmount": 500.0,
                "deadline": "2025-08-01"
            })),
        }]
    );
}

#[tokio::test]
async fn update_and_delete_address_the_given_position() {
    let (server_url, state) = spawn_goals_server(Vec::new(), StatusCode::OK, "{}")
        .await
        .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    api.update_goal(GoalIndex(2), &vacation())
        .await
        .expect("update");
    api.delete_goal(GoalIndex(5)).await.expect("delete");

    let requests = state.requests.lock().await.clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].path, "/api/goals/2");
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].path, "/api/goals/5");
    assert_eq!(requests[1].body, None);
}

#[tokio::test]
async fn non_success_status_is_reported_as_rejection() {
    let (server_url, _state) = spawn_goals_server(Vec::new(), StatusCode::NOT_FOUND, "{}")
        .await
        .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    let err = api
        .delete_goal(GoalIndex(0))
        .await
        .expect_err("not found");
    assert!(err.is_rejection());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn chat_posts_message_with_goals_and_decodes_reply() {
    let (server_url, state) = spawn_goals_server(
        Vec::new(),
        StatusCode::OK,
        r#"{"response":"Great job!\nKeep going."}"#,
    )
    .await
    .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    let reply = api
        .chat(&ChatRequest {
            message: "How am I doing?".into(),
            goals: vec![vacation()],
        })
        .await
        .expect("chat");
    assert_eq!(reply.response, "Great job!\nKeep going.");

    let requests = state.requests.lock().await.clone();
    let body = requests[0].body.clone().expect("body");
    assert_eq!(body["message"], "How am I doing?");
    assert_eq!(body["goals"][0]["targetAmount"], 2000.0);
}

#[tokio::test]
async fn malformed_chat_body_is_a_decode_error() {
    let (server_url, _state) = spawn_goals_server(Vec::new(), StatusCode::OK, "<html>oops")
        .await
        .expect("spawn server");
    let api = HttpGoalsApi::new(&server_url).expect("api");

    let err = api
        .chat(&ChatRequest {
            message: "hi".into(),
            goals: Vec::new(),
        })
        .await
        .expect_err("decode");
    assert!(matches!(err, ClientError::Decode { .. }), "unexpected: {err}");
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpGoalsApi::new(&format!("http://{addr}")).expect("api");
    let err = api.list_goals().await.expect_err("refused");
    assert!(matches!(err, ClientError::Transport { .. }), "unexpected: {err}");
}
