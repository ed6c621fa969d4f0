use crate::application::auth_service::RegisterOutcome;
use crate::domain::user::{RegisterUser, TokenRequest};
use crate::presentation::handlers::{AppState, ShopError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::ops::Deref;
use tracing::{error, info, instrument, warn};

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub insert_id: Option<String>,
}

#[derive(Serialize)]
pub struct AdminStatusResponse {
    pub admin: bool,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn issue_token(
    state: web::Data<AppState>,
    req: web::Json<TokenRequest>,
) -> Result<HttpResponse, ShopError> {
    info!(email = %req.email, "Token request received");

    let token = state.auth.issue_token(req.deref()).map_err(|e| {
        error!(error = %e, "Failed to issue token");
        ShopError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterUser>,
) -> Result<HttpResponse, ShopError> {
    info!(email = %req.email, "Registration request received");

    let outcome = state
        .auth
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ShopError::from(e)
        })?;

    let response = match outcome {
        RegisterOutcome::Created(user) => {
            info!(user_id = %user.id, email = %user.email, "User registered successfully");
            RegisterResponse {
                message: "user created".to_string(),
                insert_id: Some(user.id),
            }
        }
        RegisterOutcome::AlreadyExists => RegisterResponse {
            message: "user already exists".to_string(),
            insert_id: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ShopError> {
    let users = state.auth.list_users().await.map_err(|e| {
        error!(error = %e, "Error fetching users");
        ShopError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(users))
}

/// `GET /users/admin/{email}`. The identity-match check runs before any
/// directory lookup: a caller may only ask about the email in their own
/// token, admin or not.
#[instrument(skip(state, user), fields(email = %*path, token_email = %user.email()))]
pub async fn admin_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let email = path.into_inner();
    if email != user.email() {
        warn!(
            requested = %email,
            token_email = %user.email(),
            "Admin status requested for another identity"
        );
        return Err(ShopError::Forbidden);
    }

    let admin = state
        .auth
        .admin_status(&email)
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(AdminStatusResponse { admin }))
}

/// `PATCH /users/admin/{id}`. The source of this API left role promotion
/// ungated; here it requires an authenticated admin.
#[instrument(skip(state, user), fields(user_id = %*path, email = %user.email()))]
pub async fn promote_admin(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    state
        .auth
        .require_admin(user.email())
        .await
        .map_err(ShopError::from)?;

    state
        .auth
        .promote_to_admin(&path)
        .await
        .map_err(ShopError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User promoted to admin"
    })))
}

#[instrument(skip(state, user), fields(user_id = %*path, email = %user.email()))]
pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    state
        .auth
        .require_admin(user.email())
        .await
        .map_err(ShopError::from)?;

    state.auth.delete_user(&path).await.map_err(ShopError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully."
    })))
}
