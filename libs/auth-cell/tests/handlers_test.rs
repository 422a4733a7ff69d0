use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{body::Body, extract::State, http::Request, Json};
use http::StatusCode;
use tower::ServiceExt;

use auth_cell::handlers::login;
use auth_cell::models::LoginRequest;
use auth_cell::{auth_routes, AdminCredentialRepository, AuthService, PasswordService};
use shared_models::error::AppError;
use shared_utils::session::{clinic_today, validate_session_token};
use shared_utils::test_utils::TestConfig;

#[derive(Default)]
struct MemoryCredentials {
    hash: Mutex<Option<String>>,
}

#[async_trait]
impl AdminCredentialRepository for MemoryCredentials {
    async fn load_hash(&self) -> Result<Option<String>> {
        Ok(self.hash.lock().unwrap().clone())
    }

    async fn store_hash(&self, password_hash: &str) -> Result<()> {
        *self.hash.lock().unwrap() = Some(password_hash.to_string());
        Ok(())
    }
}

fn service_with(repository: Arc<MemoryCredentials>, bootstrap: Option<&str>) -> Arc<AuthService> {
    let config = TestConfig {
        admin_bootstrap_password: bootstrap.map(str::to_string),
        ..TestConfig::default()
    };
    Arc::new(AuthService::new(repository, config.to_arc()))
}

#[tokio::test]
async fn test_login_issues_token_for_today() {
    let repository = Arc::new(MemoryCredentials::default());
    *repository.hash.lock().unwrap() = Some(PasswordService::hash_password("gigi-sehat-99").unwrap());
    let auth = service_with(repository, None);

    let Json(response) = login(
        State(auth.clone()),
        Json(LoginRequest { password: "gigi-sehat-99".to_string() }),
    )
    .await
    .unwrap();

    let config = auth.config();
    let today = clinic_today(config.utc_offset_hours);
    assert_eq!(response.day, today);
    assert!(validate_session_token(&response.token, &config.session_secret, today).is_ok());
}

#[tokio::test]
async fn test_wrong_password_is_auth_error() {
    let repository = Arc::new(MemoryCredentials::default());
    *repository.hash.lock().unwrap() = Some(PasswordService::hash_password("gigi-sehat-99").unwrap());
    let auth = service_with(repository, None);

    let result = login(State(auth), Json(LoginRequest { password: "tebakan".to_string() })).await;

    match result {
        Err(AppError::Auth(_)) => {}
        other => panic!("Expected Auth error, got {:?}", other.map(|j| j.0.day)),
    }
}

#[tokio::test]
async fn test_bootstrap_password_seeds_hash() {
    let repository = Arc::new(MemoryCredentials::default());
    let auth = service_with(repository.clone(), Some("awal-klinik-1"));

    assert!(!auth.verify_admin_password("bukan").await.unwrap());
    assert!(repository.hash.lock().unwrap().is_none());

    assert!(auth.verify_admin_password("awal-klinik-1").await.unwrap());
    let stored = repository.hash.lock().unwrap().clone().unwrap();
    assert!(PasswordService::verify_password("awal-klinik-1", &stored).unwrap());
}

#[tokio::test]
async fn test_change_password_requires_session() {
    let repository = Arc::new(MemoryCredentials::default());
    let auth = service_with(repository, Some("awal-klinik-1"));
    let app = auth_routes(auth);

    let body = r#"{"current_password":"awal-klinik-1","new_password":"baru-klinik-2"}"#;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/password")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/password")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", TestConfig::default().session_token()))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_weak_new_password_rejected() {
    let repository = Arc::new(MemoryCredentials::default());
    let auth = service_with(repository, Some("awal-klinik-1"));

    let result = auth.change_password("awal-klinik-1", "pendek").await;
    assert!(matches!(result, Err(auth_cell::AuthError::WeakPassword(_))));
}
