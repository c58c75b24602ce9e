//! Admin login: verify the password against the configured argon2id hash and
//! issue a JWT.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use garage_core::{new_id, ServiceError};

use crate::auth_middleware::Claims;
use crate::bootstrap::verify_admin_password;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let config = &state.server_config;

    if body.username != config.admin.username
        || !verify_admin_password(&body.password, &config.admin.password_hash)
    {
        warn!(username = %body.username, "failed admin login");
        return Err(ServiceError::Unauthorized("invalid credentials".into()));
    }

    let now = chrono::Utc::now().timestamp();
    let expire_secs = config.jwt.expire_secs;
    let claims = Claims {
        sub: config.admin.username.clone(),
        sid: new_id(),
        iat: now,
        exp: now + expire_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt.secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key).map_err(|e| {
        error!("Failed to encode JWT: {}", e);
        ServiceError::Internal("failed to issue token".into())
    })?;

    info!(username = %claims.sub, sid = %claims.sid, "admin logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expire_secs,
    }))
}
