//! End-to-end HTTP tests against the real router backed by the in-memory
//! store.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use users_api::api::build_app;
use users_api::app_state::AppState;
use users_api::config::MissingAgePolicy;
use users_api::persistence::{InMemoryUserStore, UserStore};

struct TestApp {
    base: String,
    store: Arc<InMemoryUserStore>,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(policy: MissingAgePolicy) -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let users: Arc<dyn UserStore> = Arc::clone(&store) as Arc<dyn UserStore>;
        let app = build_app(AppState::new(users, policy));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind test listener");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has no address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: base_url(addr),
            store,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        let Ok(resp) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        resp
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        let Ok(resp) = self.client.delete(self.url(path)).send().await else {
            panic!("DELETE {path} failed");
        };
        resp
    }

    async fn post_json(&self, body: &Value) -> reqwest::Response {
        let Ok(resp) = self.client.post(self.url("/users")).json(body).send().await else {
            panic!("POST /users failed");
        };
        resp
    }

    async fn post_raw(&self, body: &'static str) -> reqwest::Response {
        let Ok(resp) = self
            .client
            .post(self.url("/users"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        else {
            panic!("POST /users failed");
        };
        resp
    }
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

async fn body(resp: reqwest::Response) -> Value {
    let Ok(value) = resp.json::<Value>().await else {
        panic!("response body is not JSON");
    };
    value
}

fn is_json(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[tokio::test]
async fn create_get_delete_scenario() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let expected = json!({"id": 1, "name": "Ann", "age": 30});

    let resp = app.post_json(&json!({"name": "Ann", "age": 30})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(is_json(&resp));
    assert_eq!(body(resp).await, expected);

    let resp = app.get("/users/1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(is_json(&resp));
    assert_eq!(body(resp).await, expected);

    let resp = app.delete("/users/1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await, expected);

    let resp = app.get("/users/1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(is_json(&resp));
    assert_eq!(body(resp).await["error"]["code"], 2001);
}

#[tokio::test]
async fn list_on_empty_table_is_empty_array() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.get("/users").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(is_json(&resp));
    assert_eq!(body(resp).await, json!([]));
}

#[tokio::test]
async fn list_returns_created_users() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let _ = app.post_json(&json!({"name": "Ann", "age": 30})).await;
    let _ = app.post_json(&json!({"name": "Bob", "age": 44})).await;

    let resp = app.get("/users").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body(resp).await,
        json!([
            {"id": 1, "name": "Ann", "age": 30},
            {"id": 2, "name": "Bob", "age": 44},
        ])
    );
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    assert_eq!(app.get("/users/99").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/users/99").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.get("/users/abc").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(is_json(&resp));
    assert_eq!(body(resp).await["error"]["code"], 1002);

    assert_eq!(
        app.delete("/users/1%20OR%201=1").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn underage_insert_is_rejected_without_a_row() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.post_json(&json!({"name": "Kid", "age": 17})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(resp).await["error"]["code"], 1003);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn overlong_or_empty_name_is_rejected() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let long = "n".repeat(56);
    let resp = app.post_json(&json!({"name": long, "age": 30})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app.post_json(&json!({"name": "", "age": 30})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let padded = format!("Ann{}", " ".repeat(60));
    let resp = app.post_json(&json!({"name": padded, "age": 30})).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn nul_in_name_is_a_constraint_violation() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.post_raw(r#"{"name":"a\u0000b","age":30}"#).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(resp).await["error"]["code"], 1003);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn padded_or_signed_id_is_bad_request() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let _ = app.post_json(&json!({"name": "Ann", "age": 30})).await;
    assert_eq!(app.get("/users/1").await.status(), StatusCode::OK);
    assert_eq!(app.get("/users/%201").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/users/+1").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.delete("/users/+1").await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_bad_request_without_a_row() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    for raw in [
        "{not json",
        "",
        r#"{"age": 30}"#,
        r#"{"name": "Ann", "age": "old"}"#,
    ] {
        let resp = app.post_raw(raw).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {raw:?}");
        assert!(is_json(&resp));
        assert_eq!(body(resp).await["error"]["code"], 1001);
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn missing_content_type_is_bad_request() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let Ok(resp) = app
        .client
        .post(app.url("/users"))
        .body(r#"{"name":"Ann","age":30}"#)
        .send()
        .await
    else {
        panic!("POST /users failed");
    };
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn omitted_age_uses_schema_default() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.post_json(&json!({"name": "Bo"})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body(resp).await, json!({"id": 1, "name": "Bo", "age": 18}));
}

#[tokio::test]
async fn omitted_age_is_rejected_under_reject_policy() {
    let app = TestApp::spawn(MissingAgePolicy::Reject).await;
    let resp = app.post_json(&json!({"name": "Bo"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);

    let resp = app.post_json(&json!({"name": "Bo", "age": 19})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn service_survives_failed_requests() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let _ = app.post_raw("garbage").await;
    let _ = app.get("/users/404").await;
    let _ = app.post_json(&json!({"name": "Kid", "age": 3})).await;

    let resp = app.post_json(&json!({"name": "Ann", "age": 30})).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value = body(resp).await;
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["database"], "up");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn(MissingAgePolicy::SchemaDefault).await;
    let resp = app.get("/api-docs/openapi.json").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let value = body(resp).await;
    assert!(value["paths"]["/users/{id}"].is_object());
}
