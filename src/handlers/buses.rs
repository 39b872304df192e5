use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bus::{self, BusStatus};
use crate::entities::bus_maintenance::{self, MaintenanceStatus};
use crate::entities::schedule::{self, ScheduleStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::schedules::DateParam;
use crate::utils::dates::parse_date;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusRequest {
    pub bus_number: String,
    pub model: String,
    pub capacity: i32,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResponse {
    pub bus_id: Uuid,
    pub bus_number: String,
    pub model: String,
    pub capacity: i32,
    pub status: BusStatus,
}

fn to_response(bus: bus::Model) -> BusResponse {
    BusResponse {
        bus_id: bus.id,
        bus_number: bus.number,
        model: bus.model,
        capacity: bus.capacity,
        status: bus.status,
    }
}

/// List all buses
pub async fn list_buses(State(state): State<AppState>) -> AppResult<Json<Vec<BusResponse>>> {
    let buses = bus::Entity::find().all(&state.db).await?;
    Ok(Json(buses.into_iter().map(to_response).collect()))
}

/// Get one bus
pub async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BusResponse>> {
    let bus = bus::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;

    Ok(Json(to_response(bus)))
}

/// Buses free for a new schedule on the given date: active, not already
/// scheduled or driving, and not booked into a workshop.
pub async fn available_buses(
    State(state): State<AppState>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<Vec<BusResponse>>> {
    let date = parse_date(&params.date)?;

    let in_use: HashSet<Uuid> = schedule::Entity::find()
        .filter(schedule::Column::TripDate.eq(date))
        .filter(
            schedule::Column::Status
                .is_in([ScheduleStatus::Scheduled, ScheduleStatus::InProgress]),
        )
        .all(&state.db)
        .await?
        .into_iter()
        .map(|s| s.bus_id)
        .collect();

    let in_workshop: HashSet<Uuid> = bus_maintenance::Entity::find()
        .filter(bus_maintenance::Column::MaintenanceDate.eq(date))
        .filter(
            bus_maintenance::Column::Status
                .is_in([MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress]),
        )
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| m.bus_id)
        .collect();

    let buses = bus::Entity::find()
        .filter(bus::Column::Status.eq(BusStatus::Active))
        .all(&state.db)
        .await?;

    let available: Vec<BusResponse> = buses
        .into_iter()
        .filter(|b| !in_use.contains(&b.id) && !in_workshop.contains(&b.id))
        .map(to_response)
        .collect();

    Ok(Json(available))
}

/// Register a bus
pub async fn create_bus(
    State(state): State<AppState>,
    Json(payload): Json<CreateBusRequest>,
) -> AppResult<(StatusCode, Json<BusResponse>)> {
    let status = BusStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid bus status".to_string()))?;

    let new_bus = bus::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set(payload.bus_number),
        model: Set(payload.model),
        capacity: Set(payload.capacity),
        status: Set(status),
        ..Default::default()
    };

    let bus = new_bus.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(to_response(bus))))
}

/// Update a bus
pub async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateBusRequest>,
) -> AppResult<StatusCode> {
    let bus = bus::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;

    let status = BusStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid bus status".to_string()))?;

    let mut active: bus::ActiveModel = bus.into();
    active.number = Set(payload.bus_number);
    active.model = Set(payload.model);
    active.capacity = Set(payload.capacity);
    active.status = Set(status);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a bus
pub async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = bus::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Bus not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
