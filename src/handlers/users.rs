use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, DriverStatus, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::hash_password;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
    pub role: String,
    #[serde(default)]
    pub is_guest: bool,
    pub license_number: Option<String>,
    pub license_image: Option<String>,
    pub license_expiry: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    #[serde(default)]
    pub is_guest: bool,
    pub license_number: Option<String>,
    pub license_image: Option<String>,
    pub license_expiry: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub is_guest: bool,
    pub license_number: Option<String>,
    pub license_image: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub driver_status: Option<DriverStatus>,
}

fn to_response(user: user::Model) -> UserResponse {
    UserResponse {
        user_id: user.id,
        name: user.name,
        email: user.email,
        phone: user.phone,
        role: user.role,
        is_guest: user.is_guest,
        license_number: user.license_number,
        license_image: user.license_image,
        license_expiry: user.license_expiry,
        driver_status: user.driver_status,
    }
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(&state.db).await?;
    Ok(Json(users.into_iter().map(to_response).collect()))
}

/// Get one user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(to_response(user)))
}

/// List all drivers
pub async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let drivers = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Driver))
        .all(&state.db)
        .await?;

    Ok(Json(drivers.into_iter().map(to_response).collect()))
}

/// The account behind the presented bearer token
pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<UserResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(to_response(user)))
}

/// Create a user.
///
/// Guest customers carry no credentials; everyone else must bring a
/// password. Driver-only fields are dropped for other roles, and new
/// drivers start out Inactive until an admin activates them.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let role = UserRole::parse(&payload.role)
        .ok_or_else(|| AppError::BadRequest("Invalid user role".to_string()))?;

    let needs_password = role != UserRole::Customer || !payload.is_guest;
    let password_hash = if needs_password {
        let password = payload
            .password
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
        Some(hash_password(password)?)
    } else {
        None
    };

    let is_driver = role == UserRole::Driver;
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        role: Set(role),
        is_guest: Set(payload.is_guest),
        license_number: Set(payload.license_number.filter(|_| is_driver)),
        license_image: Set(payload.license_image.filter(|_| is_driver)),
        license_expiry: Set(payload.license_expiry.filter(|_| is_driver)),
        driver_status: Set(is_driver.then_some(DriverStatus::Inactive)),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(to_response(user))))
}

/// Driver self-registration from the public site
pub async fn register_driver(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        role: Set(UserRole::Driver),
        is_guest: Set(false),
        license_number: Set(payload.license_number),
        license_image: Set(payload.license_image),
        license_expiry: Set(payload.license_expiry),
        driver_status: Set(Some(DriverStatus::Inactive)),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await?;

    Ok(Json(serde_json::json!({
        "message": "Driver registration successful. Awaiting admin approval.",
        "user": to_response(user),
    })))
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<StatusCode> {
    let user = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let role = UserRole::parse(&payload.role)
        .ok_or_else(|| AppError::BadRequest("Invalid user role".to_string()))?;

    let is_driver = role == UserRole::Driver;
    if is_driver && payload.license_number.as_deref().unwrap_or("").is_empty() {
        return Err(AppError::BadRequest(
            "LicenseNumber is required for Driver role.".to_string(),
        ));
    }

    let mut active: user::ActiveModel = user.into();
    active.name = Set(payload.name);
    active.email = Set(payload.email);
    active.phone = Set(payload.phone);
    active.role = Set(role);
    active.is_guest = Set(payload.is_guest);
    active.license_number = Set(payload.license_number.filter(|_| is_driver));
    active.license_image = Set(payload.license_image.filter(|_| is_driver));
    active.license_expiry = Set(payload.license_expiry.filter(|_| is_driver));
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Admin override of a driver's duty status
pub async fn update_driver_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> AppResult<StatusCode> {
    let user = user::Entity::find_by_id(id).one(&state.db).await?;
    let user = match user {
        Some(u) if u.role == UserRole::Driver => u,
        _ => return Err(AppError::NotFound("Driver not found".to_string())),
    };

    let status = DriverStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest("Invalid driver status".to_string()))?;

    let mut active: user::ActiveModel = user.into();
    active.driver_status = Set(Some(status));
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = user::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
