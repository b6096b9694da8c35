//! HTTP-level tests running the full router on in-memory storage

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use eventhub::{
    config::{Config, JwtConfig, ServerConfig, StorageBackend, StorageConfig},
    constants::roles,
    create_router,
    db::{MemoryStorage, Storage},
    services::AuthService,
    AppState,
};

const SECRET: &str = "integration-secret";

struct TestApp {
    router: Router,
    storage: Arc<MemoryStorage>,
}

impl TestApp {
    fn new() -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "warn".to_string(),
                json_logs: false,
                request_timeout_seconds: 30,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                database_url: None,
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
                expiry_hours: 1,
            },
            admin: None,
        };

        let storage = Arc::new(MemoryStorage::new());
        let router = create_router(AppState::new(storage.clone(), config));

        Self { router, storage }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Sign up through the API and return the bearer token
    async fn sign_up(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "password123",
                    "password_confirmation": "password123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let hash = AuthService::hash_password("password123").unwrap();
        let admin = self
            .storage
            .create_user("Admin", "admin@example.com", &hash, roles::ADMIN)
            .await
            .unwrap();
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            expiry_hours: 1,
        };
        AuthService::issue_token(&admin, &jwt).unwrap().token
    }

    async fn create_event(&self, admin: &str, title: &str, max: Option<i32>, starts_in: Duration) -> String {
        let start = Utc::now() + starts_in;
        let (status, body) = self
            .request(
                Method::POST,
                "/api/events",
                Some(admin),
                Some(json!({
                    "title": title,
                    "description": "Something fun",
                    "location": "Kuala Lumpur",
                    "start_date": start,
                    "end_date": start + Duration::hours(3),
                    "max_participants": max,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_auth_flow() {
    let app = TestApp::new();
    let token = app.sign_up("Siti", "siti@example.com").await;

    let (status, body) = app.request(Method::GET, "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "siti@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let (status, _) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "siti@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "siti@example.com", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");

    let (status, _) = app.request(Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = TestApp::new();
    app.sign_up("Siti", "siti@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "Other",
                "email": "siti@example.com",
                "password": "password123",
                "password_confirmation": "password123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "Other",
                "email": "other@example.com",
                "password": "password123",
                "password_confirmation": "password124",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/api/user"),
        (Method::GET, "/api/my-registrations"),
        (Method::POST, "/api/events/00000000-0000-0000-0000-000000000000/register"),
        (Method::DELETE, "/api/registrations/00000000-0000-0000-0000-000000000000"),
    ] {
        let (status, body) = app.request(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    let (status, _) = app
        .request(Method::GET, "/api/user", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_event_admin_crud() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.sign_up("Siti", "siti@example.com").await;
    let start = Utc::now() + Duration::days(3);
    let payload = json!({
        "title": "Jazz Night",
        "description": "Smooth",
        "location": "Penang",
        "start_date": start,
        "end_date": start + Duration::hours(2),
    });

    let (status, _) = app
        .request(Method::POST, "/api/events", Some(&user), Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::POST, "/api/events", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = app
        .request(Method::POST, "/api/events", Some(&admin), Some(payload))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    assert_eq!(created["available_spots"], Value::Null);
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&admin),
            Some(json!({"max_participants": 50, "title": "Jazz Night II"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Jazz Night II");
    assert_eq!(updated["available_spots"], 50);

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&admin),
            Some(json!({"end_date": start - Duration::hours(1)})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/events/{id}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/events/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = app
        .request(Method::GET, &format!("/api/events/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_filters_and_pagination() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.create_event(&admin, "Rock Fest", None, Duration::days(1)).await;
    app.create_event(&admin, "Jazz Night", None, Duration::days(2)).await;
    app.create_event(&admin, "Rock Revival", None, Duration::days(3)).await;

    let (status, body) = app
        .request(Method::GET, "/api/events?search=rock&sort_order=desc", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["events"][0]["title"], "Rock Revival");

    let (_, body) = app
        .request(Method::GET, "/api/events?per_page=1&page=2&sort_by=title", None, None)
        .await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["last_page"], 3);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["title"], "Rock Fest");

    let (status, _) = app
        .request(Method::GET, "/api/events?start_date=soon", None, None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_registration_outcomes_over_http() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let alice = app.sign_up("Alice", "alice@example.com").await;
    let bob = app.sign_up("Bob", "bob@example.com").await;
    let event = app.create_event(&admin, "Tiny Gig", Some(1), Duration::days(1)).await;
    let register_uri = format!("/api/events/{event}/register");

    let (status, registration) = app
        .request(Method::POST, &register_uri, Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["message"], "Successfully registered for the event");
    assert_eq!(registration["status"], "registered");
    assert_eq!(registration["event"]["title"], "Tiny Gig");
    let registration_id = registration["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::POST, &register_uri, Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "You are already registered for this event.");

    let (status, body) = app.request(Method::POST, &register_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "This event is already full.");

    let (_, detail) = app
        .request(Method::GET, &format!("/api/events/{event}"), None, None)
        .await;
    assert_eq!(detail["is_full"], true);
    assert_eq!(detail["attendees"][0]["name"], "Alice");

    let cancel_uri = format!("/api/registrations/{registration_id}");
    let (status, _) = app.request(Method::DELETE, &cancel_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request(Method::DELETE, &cancel_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = app.request(Method::DELETE, &cancel_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request(Method::POST, &register_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, mine) = app
        .request(Method::GET, "/api/my-registrations", Some(&alice), None)
        .await;
    assert_eq!(mine["total"], 0);

    let (_, mine) = app
        .request(Method::GET, "/api/my-registrations", Some(&bob), None)
        .await;
    assert_eq!(mine["total"], 1);
    assert_eq!(mine["registrations"][0]["event_id"], event.as_str());
}

#[tokio::test]
async fn test_past_event_and_unknown_ids() {
    let app = TestApp::new();
    let user = app.sign_up("Siti", "siti@example.com").await;
    let past = app
        .storage
        .create_event(eventhub::models::NewEvent {
            title: "Yesterday".to_string(),
            description: "Gone".to_string(),
            location: "Ipoh".to_string(),
            start_date: Utc::now() - Duration::days(1),
            end_date: Utc::now() - Duration::hours(20),
            max_participants: None,
            image_url: None,
            status: "active".to_string(),
        })
        .await
        .unwrap();

    let (status, body) = app
        .request(Method::POST, &format!("/api/events/{}/register", past.id), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "Cannot register for past events.");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = app
        .request(Method::POST, &format!("/api/events/{missing}/register"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/registrations/{missing}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
