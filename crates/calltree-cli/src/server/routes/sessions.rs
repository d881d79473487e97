use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use calltree_core::{Abi, CallPayload, FormSession, ParsedFunctions, Snapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::error::{ApiError, ApiResult};
use crate::server::state::SessionId;
use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(close_session))
        .route("/sessions/{id}/method", post(select_method))
        .route("/sessions/{id}/value", post(set_value))
        .route("/sessions/{id}/toggle", post(toggle))
        .route("/sessions/{id}/grow", post(grow))
        .route("/sessions/{id}/delete", post(delete_element))
        .route("/sessions/{id}/resize", post(resize))
        .route("/sessions/{id}/text", post(apply_text))
        .route("/sessions/{id}/submit", post(submit))
}

/// Run `op` against one session while holding the write lock
async fn with_session<T>(
    state: &AppState,
    id: SessionId,
    op: impl FnOnce(&mut FormSession) -> calltree_core::Result<T>,
) -> ApiResult<T> {
    let mut sessions = state.sessions().write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    Ok(op(session)?)
}

// ================================
// POST /sessions
// ================================

#[derive(Deserialize)]
struct CreateSessionRequest {
    /// JSON ABI; falls back to the server's ABI when absent
    #[serde(default)]
    abi: Option<Value>,
    /// Method to select right away
    #[serde(default)]
    method: Option<String>,
}

#[derive(Serialize)]
struct CreateSessionResponse {
    id: SessionId,
    functions: ParsedFunctions,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Snapshot>,
}

async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let abi = match &payload.abi {
        Some(value) => Abi::from_value(value)?,
        None => state
            .default_abi()
            .cloned()
            .ok_or_else(|| ApiError::bad_request("No ABI given and the server has none"))?,
    };
    let functions = abi.functions();

    let mut session = state.new_session(abi);
    let snapshot = match &payload.method {
        Some(method) => Some(session.select(method)?),
        None => None,
    };
    let id = state.open_session(session).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id,
            functions,
            snapshot,
        }),
    ))
}

// ================================
// GET /sessions/:id
// ================================

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> ApiResult<Json<Snapshot>> {
    let sessions = state.sessions().read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    Ok(Json(session.snapshot()?))
}

// ================================
// DELETE /sessions/:id
// ================================

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> ApiResult<StatusCode> {
    state
        .sessions()
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| ApiError::session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

// ================================
// POST /sessions/:id/method
// ================================

#[derive(Deserialize)]
struct MethodRequest {
    method: String,
}

async fn select_method(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<MethodRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| s.select(&payload.method)).await?;
    Ok(Json(snapshot))
}

// ================================
// Tree edits
// ================================

#[derive(Deserialize)]
struct PathRequest {
    path: Vec<usize>,
}

#[derive(Deserialize)]
struct ValueRequest {
    path: Vec<usize>,
    value: String,
}

#[derive(Deserialize)]
struct ResizeRequest {
    path: Vec<usize>,
    length: usize,
}

async fn set_value(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<ValueRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| {
        s.set_value(&payload.path, &payload.value)
    })
    .await?;
    Ok(Json(snapshot))
}

async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<PathRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| s.toggle(&payload.path)).await?;
    Ok(Json(snapshot))
}

async fn grow(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<PathRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| s.grow(&payload.path)).await?;
    Ok(Json(snapshot))
}

async fn delete_element(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<PathRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| s.delete(&payload.path)).await?;
    Ok(Json(snapshot))
}

async fn resize(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<ResizeRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| {
        s.resize(&payload.path, payload.length)
    })
    .await?;
    Ok(Json(snapshot))
}

// ================================
// POST /sessions/:id/text
// ================================

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

async fn apply_text(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<TextRequest>,
) -> ApiResult<Json<Snapshot>> {
    let snapshot = with_session(&state, id, |s| s.apply_text(&payload.text)).await?;
    Ok(Json(snapshot))
}

// ================================
// POST /sessions/:id/submit
// ================================

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> ApiResult<Json<CallPayload>> {
    let payload = with_session(&state, id, |s| s.submit()).await?;
    Ok(Json(payload))
}
