use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bus;
use crate::entities::bus_maintenance::{self, MaintenanceStatus};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    pub bus_id: Uuid,
    pub maintenance_date: NaiveDate,
    pub description: String,
    pub cost: Decimal,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResponse {
    pub maintenance_id: Uuid,
    pub bus_id: Uuid,
    pub maintenance_date: NaiveDate,
    pub description: String,
    pub cost: Decimal,
    pub status: MaintenanceStatus,
}

fn to_response(record: bus_maintenance::Model) -> MaintenanceResponse {
    MaintenanceResponse {
        maintenance_id: record.id,
        bus_id: record.bus_id,
        maintenance_date: record.maintenance_date,
        description: record.description,
        cost: record.cost,
        status: record.status,
    }
}

/// Maintenance history for one bus
pub async fn bus_maintenance(
    State(state): State<AppState>,
    Path(bus_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceResponse>>> {
    bus::Entity::find_by_id(bus_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;

    let records = bus_maintenance::Entity::find()
        .filter(bus_maintenance::Column::BusId.eq(bus_id))
        .all(&state.db)
        .await?;

    Ok(Json(records.into_iter().map(to_response).collect()))
}

/// Book a bus into the workshop
pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaintenanceRequest>,
) -> AppResult<(StatusCode, Json<MaintenanceResponse>)> {
    bus::Entity::find_by_id(payload.bus_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid bus ID".to_string()))?;

    let status = MaintenanceStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid maintenance status".to_string()))?;

    let new_record = bus_maintenance::ActiveModel {
        id: Set(Uuid::new_v4()),
        bus_id: Set(payload.bus_id),
        maintenance_date: Set(payload.maintenance_date),
        description: Set(payload.description),
        cost: Set(payload.cost),
        status: Set(status),
        ..Default::default()
    };

    let record = new_record.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(to_response(record))))
}

/// Move a maintenance record through the workshop pipeline
pub async fn update_maintenance_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> AppResult<StatusCode> {
    let record = bus_maintenance::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance record not found".to_string()))?;

    let status = MaintenanceStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest("Invalid maintenance status".to_string()))?;

    let mut active: bus_maintenance::ActiveModel = record.into();
    active.status = Set(status);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a maintenance record
pub async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = bus_maintenance::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Maintenance record not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
