//! Registration and login.

use axum::extract::State;
use axum::Json;
use database::models::User;
use database::{user, validation, DatabaseError};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::encode_jwt;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, Result};
use crate::state::AppState;
use reflection::time;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User fields safe to return to clients.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("Name must not be empty".to_string()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash: hash_password(&req.password)?,
        name: req.name.trim().to_string(),
        created_at: time::now(),
    };
    user::create_user(state.db.pool(), &user).await?;
    info!(user_id = %user.id, "user registered");

    let token = encode_jwt(
        &user.id,
        &user.email,
        &user.name,
        &state.jwt_secret,
        state.token_expiry_secs,
    )?;
    Ok(Json(AuthResponse {
        token,
        user: UserView {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

/// `POST /api/auth/login`
///
/// Unknown email and wrong password produce the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = match user::get_user_by_email(state.db.pool(), &req.email.trim().to_lowercase())
        .await
    {
        Ok(user) => user,
        Err(DatabaseError::NotFound { .. }) => return Err(invalid()),
        Err(err) => return Err(err.into()),
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = encode_jwt(
        &user.id,
        &user.email,
        &user.name,
        &state.jwt_secret,
        state.token_expiry_secs,
    )?;
    Ok(Json(AuthResponse {
        token,
        user: UserView {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{request, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_login() {
        let app = test_app().await;

        let (status, body) = request(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "alice@example.com", "password": "hunter2hunter2", "name": "Alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some());
        assert_eq!(body["user"]["email"], "alice@example.com");
        // No hash in the response.
        assert!(body["user"]["password_hash"].is_null());

        let (status, body) = request(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "hunter2hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let app = test_app().await;
        let payload =
            json!({"email": "alice@example.com", "password": "hunter2hunter2", "name": "Alice"});
        let (status, _) =
            request(&app, Method::POST, "/api/auth/register", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) =
            request(&app, Method::POST, "/api/auth/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let app = test_app().await;
        let (status, _) = request(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "not-an-email", "password": "hunter2hunter2", "name": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@example.com", "password": "short", "name": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_the_same_401() {
        let app = test_app().await;
        crate::routes::tests::register(&app, "alice@example.com").await;

        let (status, wrong_pw) = request(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "wrongwrongwrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, unknown) = request(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "hunter2hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_pw["error"], unknown["error"]);
    }
}
