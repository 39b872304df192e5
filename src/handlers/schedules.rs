use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::schedule::{self, ScheduleStatus};
use crate::entities::user::{self, UserRole};
use crate::entities::{bus, route};
use crate::error::{AppError, AppResult};
use crate::utils::dates::parse_date_range;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub driver_id: Uuid,
    pub departure_time: String,
    pub trip_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub route_id: Uuid,
    pub bus_id: Uuid,
    pub driver_id: Uuid,
    pub departure_time: String,
    pub trip_date: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub schedule_id: Uuid,
    pub route_id: Uuid,
    pub route_name: String,
    pub bus_id: Uuid,
    pub bus_number: String,
    pub driver_id: Uuid,
    pub driver_name: String,
    pub departure_time: NaiveTime,
    pub trip_date: NaiveDate,
    pub price: Decimal,
    pub status: ScheduleStatus,
    pub actual_departure_time: Option<DateTime<Utc>>,
    pub actual_arrival_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DateParam {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: String,
    pub end: String,
}

/// Shape a schedule with the route/bus/driver names the admin console shows.
pub(crate) async fn to_response(
    state: &AppState,
    schedule: schedule::Model,
) -> AppResult<ScheduleResponse> {
    let route = route::Entity::find_by_id(schedule.route_id)
        .one(&state.db)
        .await?;
    let bus = bus::Entity::find_by_id(schedule.bus_id).one(&state.db).await?;
    let driver = user::Entity::find_by_id(schedule.driver_id)
        .one(&state.db)
        .await?;

    Ok(ScheduleResponse {
        schedule_id: schedule.id,
        route_id: schedule.route_id,
        route_name: route.map(|r| r.name).unwrap_or_else(|| "N/A".to_string()),
        bus_id: schedule.bus_id,
        bus_number: bus.map(|b| b.number).unwrap_or_else(|| "N/A".to_string()),
        driver_id: schedule.driver_id,
        driver_name: driver.map(|d| d.name).unwrap_or_else(|| "N/A".to_string()),
        departure_time: schedule.departure_time,
        trip_date: schedule.trip_date,
        price: schedule.price,
        status: schedule.status,
        actual_departure_time: schedule.actual_departure_time.map(|t| t.with_timezone(&Utc)),
        actual_arrival_time: schedule.actual_arrival_time.map(|t| t.with_timezone(&Utc)),
    })
}

async fn to_responses(
    state: &AppState,
    schedules: Vec<schedule::Model>,
) -> AppResult<Vec<ScheduleResponse>> {
    let mut responses = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        responses.push(to_response(state, schedule).await?);
    }
    Ok(responses)
}

fn parse_departure_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| {
            AppError::BadRequest("Invalid departure time format. Use HH:MM:SS format.".to_string())
        })
}

fn parse_trip_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest("Invalid trip date format. Use YYYY-MM-DD format.".to_string())
    })
}

/// Check the referenced bus/route/driver and fail like the admin forms expect.
async fn validate_references(
    state: &AppState,
    route_id: Uuid,
    bus_id: Uuid,
    driver_id: Uuid,
) -> AppResult<route::Model> {
    bus::Entity::find_by_id(bus_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid bus ID".to_string()))?;

    let route = route::Entity::find_by_id(route_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid route ID".to_string()))?;

    let driver = user::Entity::find_by_id(driver_id).one(&state.db).await?;
    match driver {
        Some(d) if d.role == UserRole::Driver => {}
        _ => return Err(AppError::BadRequest("Invalid driver ID".to_string())),
    }

    Ok(route)
}

/// List all schedules
pub async fn list_schedules(State(state): State<AppState>) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let schedules = schedule::Entity::find().all(&state.db).await?;
    Ok(Json(to_responses(&state, schedules).await?))
}

/// Get one schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScheduleResponse>> {
    let schedule = schedule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    Ok(Json(to_response(&state, schedule).await?))
}

/// List schedules departing on one trip date
pub async fn schedules_by_date(
    State(state): State<AppState>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let date = parse_trip_date(&params.date)?;

    let schedules = schedule::Entity::find()
        .filter(schedule::Column::TripDate.eq(date))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, schedules).await?))
}

/// List schedules with trip dates in an inclusive range
pub async fn schedules_by_date_range(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let (start, end) = parse_date_range(&params.start, &params.end)?;

    let schedules = schedule::Entity::find()
        .filter(schedule::Column::TripDate.gte(start))
        .filter(schedule::Column::TripDate.lte(end))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, schedules).await?))
}

/// List schedules for a route
pub async fn schedules_by_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    route::Entity::find_by_id(route_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

    let schedules = schedule::Entity::find()
        .filter(schedule::Column::RouteId.eq(route_id))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, schedules).await?))
}

/// List schedules assigned to a driver
pub async fn schedules_by_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let driver = user::Entity::find_by_id(driver_id).one(&state.db).await?;
    match driver {
        Some(d) if d.role == UserRole::Driver => {}
        _ => return Err(AppError::NotFound("Driver not found".to_string())),
    }

    let schedules = schedule::Entity::find()
        .filter(schedule::Column::DriverId.eq(driver_id))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, schedules).await?))
}

/// Create a schedule; the price is snapshotted from the route
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> AppResult<(StatusCode, Json<ScheduleResponse>)> {
    let route = validate_references(&state, payload.route_id, payload.bus_id, payload.driver_id)
        .await?;

    let departure_time = parse_departure_time(&payload.departure_time)?;
    let trip_date = parse_trip_date(&payload.trip_date)?;

    let new_schedule = schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        route_id: Set(payload.route_id),
        bus_id: Set(payload.bus_id),
        driver_id: Set(payload.driver_id),
        departure_time: Set(departure_time),
        trip_date: Set(trip_date),
        price: Set(route.price),
        status: Set(ScheduleStatus::Scheduled),
        actual_departure_time: Set(None),
        actual_arrival_time: Set(None),
        ..Default::default()
    };

    let schedule = new_schedule.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, schedule).await?)))
}

/// Full update; re-snapshots the price and applies status side effects
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> AppResult<StatusCode> {
    let schedule = schedule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    let route = validate_references(&state, payload.route_id, payload.bus_id, payload.driver_id)
        .await?;

    let departure_time = parse_departure_time(&payload.departure_time)?;
    let trip_date = parse_trip_date(&payload.trip_date)?;
    let status = ScheduleStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid schedule status".to_string()))?;

    let (actual_departure, actual_arrival) = schedule.stamped_times(&status, Utc::now().into());

    let mut active: schedule::ActiveModel = schedule.into();
    active.route_id = Set(payload.route_id);
    active.bus_id = Set(payload.bus_id);
    active.driver_id = Set(payload.driver_id);
    active.departure_time = Set(departure_time);
    active.trip_date = Set(trip_date);
    active.price = Set(route.price);
    active.status = Set(status);
    active.actual_departure_time = Set(actual_departure);
    active.actual_arrival_time = Set(actual_arrival);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Status override; entering InProgress/Completed stamps the actual times once
pub async fn update_schedule_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> AppResult<StatusCode> {
    let schedule = schedule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    let status = ScheduleStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest("Invalid schedule status".to_string()))?;

    let (actual_departure, actual_arrival) = schedule.stamped_times(&status, Utc::now().into());

    let mut active: schedule::ActiveModel = schedule.into();
    active.status = Set(status);
    active.actual_departure_time = Set(actual_departure);
    active.actual_arrival_time = Set(actual_arrival);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a schedule
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = schedule::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
