use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

use crate::entities::bus::{self, BusStatus};
use crate::entities::schedule;
use crate::entities::user::{self, UserRole};
use crate::entities::{booking, route};
use crate::error::AppResult;
use crate::handlers::bookings::{self, BookingResponse};
use crate::utils::dates::day_bounds;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub active_buses: u64,
    pub todays_bookings: u64,
    pub total_routes: u64,
    pub registered_drivers: u64,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Headline numbers for the admin landing page
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let today = Utc::now().date_naive();
    let (from, to) = day_bounds(today, today);

    let active_buses = bus::Entity::find()
        .filter(bus::Column::Status.eq(BusStatus::Active))
        .count(&state.db)
        .await?;

    let todays_bookings = booking::Entity::find()
        .filter(booking::Column::CreatedAt.gte(from))
        .filter(booking::Column::CreatedAt.lt(to))
        .count(&state.db)
        .await?;

    let total_routes = route::Entity::find().count(&state.db).await?;

    let registered_drivers = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Driver))
        .count(&state.db)
        .await?;

    Ok(Json(StatsResponse {
        active_buses,
        todays_bookings,
        total_routes,
        registered_drivers,
    }))
}

/// Fleet warnings plus a couple of today's arrival notices
pub async fn alerts(State(state): State<AppState>) -> AppResult<Json<Vec<AlertResponse>>> {
    let mut alerts = Vec::new();

    let flagged_buses = bus::Entity::find()
        .filter(bus::Column::Status.is_in([BusStatus::Maintenance, BusStatus::OutOfService]))
        .all(&state.db)
        .await?;

    for bus in flagged_buses {
        match bus.status {
            BusStatus::Maintenance => alerts.push(AlertResponse {
                kind: "maintenance".to_string(),
                message: format!("Request for maintenance: Bus {} requires assistance.", bus.number),
            }),
            BusStatus::OutOfService => alerts.push(AlertResponse {
                kind: "OutOfService".to_string(),
                message: format!("Bus Out Of Service: Bus {} is Out of Service.", bus.number),
            }),
            BusStatus::Active => {}
        }
    }

    let now = Utc::now();
    let today = now.date_naive();
    let todays_schedules = schedule::Entity::find()
        .filter(schedule::Column::TripDate.eq(today))
        .all(&state.db)
        .await?;

    let routes = route::Entity::find().all(&state.db).await?;

    let departed = todays_schedules
        .into_iter()
        .filter(|s| s.trip_date.and_time(s.departure_time).and_utc() < now)
        .take(2);

    for trip in departed {
        let route_name = routes
            .iter()
            .find(|r| r.id == trip.route_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| "N/A".to_string());

        alerts.push(AlertResponse {
            kind: "trip".to_string(),
            message: format!(
                "Trip Notification: Trip for route #{} arrived at the destination.",
                route_name
            ),
        });
    }

    Ok(Json(alerts))
}

/// The five most recent bookings
pub async fn latest_bookings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let recent = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .limit(5)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(recent.len());
    for booking in recent {
        responses.push(bookings::to_response(&state, booking).await?);
    }

    Ok(Json(responses))
}
