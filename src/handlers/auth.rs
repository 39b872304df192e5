use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

use crate::entities::user::{self, DriverStatus, UserRole};
use crate::error::{AppError, AppResult};
use crate::otp::OtpCheck;
use crate::utils::codes;
use crate::utils::jwt::create_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerificationRequest {
    pub email: String,
    pub otp: String,
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// First login step: check credentials and email a one-time code.
///
/// Unknown emails and wrong passwords get the same generic answer, so the
/// endpoint leaks nothing about which accounts exist.
pub async fn login_step1(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    if !verify_password(&payload.password, hash) {
        return Err(AppError::Unauthorized("Invalid email or password.".to_string()));
    }

    if user.role == UserRole::Driver && user.driver_status != Some(DriverStatus::Active) {
        return Err(AppError::Unauthorized(
            "Your account is not active. Please contact the admin.".to_string(),
        ));
    }

    let code = codes::otp_code();
    state.otps.issue(&user.email, code.clone());

    // The login flow cannot continue without the code, so a failed send is
    // fatal here, unlike the booking confirmation.
    if let Err(e) = state.mailer.send_login_otp(&user.email, &user.name, &code).await {
        tracing::error!(email = %user.email, "failed to send OTP email: {}", e);
        return Err(AppError::Internal(
            "Failed to send OTP. Please try again later.".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "message": "OTP sent to your email. Please verify."
    })))
}

/// Second login step: exchange the emailed code for a bearer token.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerificationRequest>,
) -> AppResult<Json<serde_json::Value>> {
    match state.otps.verify(&payload.email, &payload.otp) {
        OtpCheck::MissingOrExpired => {
            return Err(AppError::BadRequest("Invalid or expired OTP.".to_string()));
        }
        OtpCheck::Mismatch => {
            return Err(AppError::BadRequest("Incorrect OTP.".to_string()));
        }
        OtpCheck::Valid => {}
    }

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

    let token = create_token(
        user.id,
        &user.email,
        &user.name,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(serde_json::json!({ "token": token })))
}
