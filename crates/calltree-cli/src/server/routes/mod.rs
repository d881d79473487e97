mod functions;
mod health;
mod sessions;

use axum::Router;

use crate::server::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            health::router()
                .merge(functions::router())
                .merge(sessions::router()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use calltree_core::{Abi, TreeBuilder};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::server::AppState;

    const ABI: &str = r#"[
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "totalSupply",
            "inputs": [],
            "outputs": [{"name": "", "type": "uint256"}],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "airdrop",
            "inputs": [{"name": "amounts", "type": "uint256[][]"}],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    const ONE: &str = "0x0000000000000000000000000000000000000001";

    fn setup_test_app() -> Router {
        let state = AppState::new(TreeBuilder::new()).with_abi(Abi::parse(ABI).unwrap());
        super::create_router(state)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, "POST", uri, Some(body)).await
    }

    async fn create_session(app: &Router, method: &str) -> u64 {
        let (status, body) = post(app, "/api/sessions", json!({"method": method})).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app();
        let (status, body) = send(&app, "GET", "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_functions() {
        let app = setup_test_app();
        let (status, body) = send(&app, "GET", "/api/functions", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["read"].as_array().unwrap().len(), 1);
        assert_eq!(body["read"][0]["name"], "totalSupply");
        assert_eq!(body["write"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_functions_without_abi() {
        let app = super::create_router(AppState::new(TreeBuilder::new()));
        let (status, body) = send(&app, "GET", "/api/functions", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = setup_test_app();
        let id = create_session(&app, "transfer").await;
        let base = format!("/api/sessions/{}", id);

        let (status, body) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["values"], json!([null, null]));
        assert_eq!(body["stats"], json!({"total": 2, "completed": 0}));

        let value_uri = format!("{}/value", base);
        post(&app, &value_uri, json!({"path": [0], "value": ONE})).await;
        let (status, body) = post(&app, &value_uri, json!({"path": [1], "value": "250"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["complete"], true);
        assert_eq!(body["outcome"], "applied");

        let (status, body) = send(&app, "POST", &format!("{}/submit", base), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signature"], "transfer(address,uint256)");
        assert_eq!(body["values"], json!([ONE, 250]));
        assert!(body["call_data"].as_str().unwrap().starts_with("0xa9059cbb"));

        let (status, _) = send(&app, "DELETE", &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_nested_arrays_via_api() {
        let app = setup_test_app();
        let id = create_session(&app, "airdrop").await;
        let uri = |op: &str| format!("/api/sessions/{}/{}", id, op);

        post(&app, &uri("value"), json!({"path": [0, 0, 0], "value": "16"})).await;
        let (_, body) = post(&app, &uri("grow"), json!({"path": [0, 0]})).await;
        assert_eq!(body["outcome"], "ignored");

        post(&app, &uri("resize"), json!({"path": [0, 0], "length": 2})).await;
        let (_, body) = post(&app, &uri("value"), json!({"path": [0, 0, 1], "value": "12"})).await;
        assert_eq!(body["values"], json!([[[16, 12]]]));

        let (_, body) = post(&app, &uri("delete"), json!({"path": [0, 0, 0]})).await;
        assert_eq!(body["values"], json!([[[12]]]));
        let inner = &body["tree"][0]["children"][0];
        assert_eq!(inner["children"][0]["name"], "position0");
    }

    #[tokio::test]
    async fn test_text_edit_shape_mismatch() {
        let app = setup_test_app();
        let id = create_session(&app, "transfer").await;
        let uri = format!("/api/sessions/{}/text", id);

        let (status, body) = post(&app, &uri, json!({"text": "[1]"})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().contains("Shape mismatch"));
        assert_eq!(body["tree"][0]["status"], "error");

        let (status, body) = post(&app, &uri, json!({"text": "[1,"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn test_submit_incomplete() {
        let app = setup_test_app();
        let id = create_session(&app, "transfer").await;

        let uri = format!("/api/sessions/{}/submit", id);
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INCOMPLETE_ARGUMENTS");
    }

    #[tokio::test]
    async fn test_bad_path_and_missing_method() {
        let app = setup_test_app();
        let (_, body) = post(&app, "/api/sessions", json!({})).await;
        let base = format!("/api/sessions/{}", body["id"]);

        let (status, body) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "NO_METHOD_SELECTED");

        let method_uri = format!("{}/method", base);
        let (status, _) = post(&app, &method_uri, json!({"method": "burn"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        post(&app, &method_uri, json!({"method": "transfer"})).await;
        let toggle_uri = format!("{}/toggle", base);
        let (status, body) = post(&app, &toggle_uri, json!({"path": [5]})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PATH_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_session_with_inline_abi() {
        let app = super::create_router(AppState::new(TreeBuilder::new()));
        let abi: Value = serde_json::from_str(ABI).unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({"abi": abi, "method": "totalSupply"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["snapshot"]["complete"], true);

        let (status, _) = post(&app, "/api/sessions", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_arrays_rejected() {
        let app = setup_test_app();
        let id = create_session(&app, "airdrop").await;
        let uri = format!("/api/sessions/{}/resize", id);

        let request = json!({"path": [0], "length": 10_000_000_000u64});
        let (status, body) = post(&app, &uri, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER");

        let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(body["values"], json!([[[null]]]));

        let abi = json!([{
            "type": "function",
            "name": "fill",
            "inputs": [{"name": "slots", "type": "uint256[1000000000000]"}],
            "outputs": [],
            "stateMutability": "nonpayable"
        }]);
        let request = json!({"abi": abi, "method": "fill"});
        let (status, body) = post(&app, "/api/sessions", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn test_session_limit() {
        let state = AppState::new(TreeBuilder::new())
            .with_abi(Abi::parse(ABI).unwrap())
            .with_max_sessions(1);
        let app = super::create_router(state);

        let id = create_session(&app, "transfer").await;
        let (status, body) = post(&app, "/api/sessions", json!({})).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "TOO_MANY_SESSIONS");

        send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        let (status, _) = post(&app, "/api/sessions", json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
