use axum::{extract::State, routing::get, Json, Router};
use calltree_core::ParsedFunctions;

use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/functions", get(list_functions))
}

// ================================
// GET /functions
// ================================

async fn list_functions(State(state): State<AppState>) -> ApiResult<Json<ParsedFunctions>> {
    let abi = state
        .default_abi()
        .ok_or_else(|| ApiError::new("NOT_FOUND", "Server was started without an ABI"))?;
    Ok(Json(abi.functions()))
}
