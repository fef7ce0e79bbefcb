use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use storehub::router::init_router;
use storehub::session::{SESSION_COOKIE, session_layer};
use storehub::state::AppState;
use storehub::store::InMemoryStore;
use storehub_config::{AuthConfig, SessionConfig};
use storehub_core::{Role, hash_password_with_cost};
use storehub_models::UserId;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

pub const PASSWORD: &str = "secret-password";

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

/// An app over an in-memory store plus a cookie jar holding one session.
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    router: Router,
    cookie: Option<String>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::from_store(store.clone())
            .with_auth_config(AuthConfig { bcrypt_cost: 4 });
        let router = init_router(
            state,
            session_layer(MemoryStore::default(), &SessionConfig::default()),
        );

        Self {
            store,
            router,
            cookie: None,
        }
    }

    pub async fn create_user(&self, name: &str, email: &str, active: bool, roles: &[Role]) -> UserId {
        let hash = hash_password_with_cost(PASSWORD, 4).unwrap();
        self.store.insert_user(name, email, &hash, active, roles).await
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let pair = value.to_str().unwrap().split(';').next().unwrap().trim();
            if let Some(id) = pair.strip_prefix(&format!("{SESSION_COOKIE}=")) {
                self.cookie = (!id.is_empty()).then(|| pair.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn json(&mut self, method: Method, uri: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&mut self, email: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", PASSWORD)])
            .await
    }

    /// Creates a user with `roles` and signs in as them.
    pub async fn login_as(&mut self, email: &str, roles: &[Role]) -> UserId {
        let id = self.create_user("Test User", email, true, roles).await;
        let response = self.login(email).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        id
    }
}
