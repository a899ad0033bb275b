pub mod auth;
pub mod destinations;
pub mod error;
pub mod messages;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use tracing::error;

use travelblog_db::Database;
use travelblog_types::api::StatusMessage;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    /// `None` when the store could not be opened at startup; every
    /// data-dependent request then fails with a 500.
    pub db: Option<Database>,
}

impl AppStateInner {
    pub fn new(db: Option<Database>) -> AppState {
        Arc::new(Self { db })
    }
}

/// Full route table. Middleware (CORS, tracing) is layered on by the binary.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/destination", get(destinations::list_destinations))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route("/api/messages/{id}", delete(messages::delete_message))
        .with_state(state)
}

async fn welcome() -> Json<StatusMessage> {
    Json(StatusMessage::new("Welcome to Travel Blog API"))
}

/// Run a store operation off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let db = state.db.as_ref().ok_or(ApiError::StoreUnavailable)?;
        f(db)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.to_string())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use serde_json::{Value as JsonValue, json};
    use tower::ServiceExt;

    use travelblog_db::seed::seed_destinations;

    fn seeded_app() -> Router {
        let db = Database::open_in_memory().expect("open db");
        seed_destinations(&db).expect("seed");
        api_router(AppStateInner::new(Some(db)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload = serde_json::from_slice(&bytes).expect("parse json");
        (status, payload)
    }

    #[tokio::test]
    async fn welcome_greets() {
        let app = seeded_app();

        let (status, body) = send(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to Travel Blog API");
    }

    #[tokio::test]
    async fn list_destinations_returns_seeded_records() {
        let app = seeded_app();

        let (status, body) = send(&app, "GET", "/destination", None).await;

        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().expect("array");
        let titles: Vec<&str> = items.iter().map(|d| d["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Kashmir", "Varanasi", "Manali", "Vrindavan"]);
        assert_eq!(items[0]["imgSrc"], "/images/kashmir.jpg");
        assert_eq!(
            items[1]["description"],
            "Explore the secrets of Kashi and its spiritual charm."
        );
        assert!(items[0]["_id"].is_string());
    }

    #[tokio::test]
    async fn register_then_login_follows_credential_rules() {
        let app = seeded_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/register",
            Some(json!({"username": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");

        let (status, body) = send(
            &app,
            "POST",
            "/api/register",
            Some(json!({"username": "alice", "password": "pw2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username already exists");

        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(json!({"username": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["message"], "Login successful");

        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(json!({"username": "alice", "password": "pw2"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid password");
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let app = seeded_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(json!({"username": "ghost", "password": "boo"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn register_rejects_missing_password() {
        let app = seeded_app();

        let (status, body) =
            send(&app, "POST", "/api/register", Some(json!({"username": "bob"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "password is required");
    }

    #[tokio::test]
    async fn messages_list_in_creation_order() {
        let app = seeded_app();
        let (status, first) = send(
            &app,
            "POST",
            "/api/messages",
            Some(json!({"username": "alice", "content": "first"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(first["_id"].is_string());
        assert!(first["createdAt"].is_string());

        let (_, second) = send(
            &app,
            "POST",
            "/api/messages",
            Some(json!({"username": "nobody-registered", "content": "second"})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/api/messages", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&JsonValue> = body.as_array().expect("array").iter().map(|m| &m["_id"]).collect();
        assert_eq!(ids, vec![&first["_id"], &second["_id"]]);
    }

    #[tokio::test]
    async fn delete_message_removes_and_stays_idempotent() {
        let app = seeded_app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/messages",
            Some(json!({"username": "alice", "content": "temporary"})),
        )
        .await;
        let uri = format!("/api/messages/{}", created["_id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Message deleted successfully");
        let (_, listing) = send(&app, "GET", "/api/messages", None).await;
        assert!(listing.as_array().unwrap().is_empty());

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_message_malformed_id_is_not_found() {
        let app = seeded_app();

        let (status, body) = send(&app, "DELETE", "/api/messages/not-an-id", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Message not found");
    }

    #[tokio::test]
    async fn data_routes_fail_when_store_unavailable() {
        let app = api_router(AppStateInner::new(None));
        let creds = json!({"username": "alice", "password": "pw1"});
        let message_id = uuid::Uuid::new_v4();
        let delete_uri = format!("/api/messages/{}", message_id);
        let requests = [
            ("GET", "/destination", None),
            ("POST", "/api/register", Some(creds.clone())),
            ("POST", "/api/login", Some(creds)),
            ("GET", "/api/messages", None),
            (
                "POST",
                "/api/messages",
                Some(json!({"username": "alice", "content": "hi"})),
            ),
            ("DELETE", delete_uri.as_str(), None),
        ];

        for (method, uri, body) in requests {
            let (status, payload) = send(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
            assert_eq!(payload["message"], "Database connection unavailable");
        }

        let (status, _) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn create_message_requires_content() {
        let app = seeded_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/messages",
            Some(json!({"username": "alice", "content": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "content is required");

        let (_, listing) = send(&app, "GET", "/api/messages", None).await;
        assert!(listing.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_message_requires_username() {
        let app = seeded_app();

        let (status, body) =
            send(&app, "POST", "/api/messages", Some(json!({"content": "hello"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "username is required");
    }

    #[tokio::test]
    async fn login_requires_username_and_password() {
        let app = seeded_app();

        let (status, body) =
            send(&app, "POST", "/api/login", Some(json!({"password": "pw1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "username is required");

        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            Some(json!({"username": "alice", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "password is required");
    }

    #[tokio::test]
    async fn create_message_rejects_malformed_json() {
        let app = seeded_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.expect("request failed");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
