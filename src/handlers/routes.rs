use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::route::{self, PickupPoint, PickupPoints};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub route_name: String,
    pub start_location: String,
    pub end_location: String,
    pub pickup_points: Vec<PickupPoint>,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub route_id: Uuid,
    pub route_name: String,
    pub start_location: String,
    pub end_location: String,
    pub pickup_points: Vec<PickupPoint>,
    pub price: Decimal,
}

fn to_response(route: route::Model) -> RouteResponse {
    RouteResponse {
        route_id: route.id,
        route_name: route.name,
        start_location: route.start_location,
        end_location: route.end_location,
        pickup_points: route.pickup_points.0,
        price: route.price,
    }
}

/// List all routes
pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<RouteResponse>>> {
    let routes = route::Entity::find().all(&state.db).await?;
    Ok(Json(routes.into_iter().map(to_response).collect()))
}

/// Get one route
pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RouteResponse>> {
    let route = route::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

    Ok(Json(to_response(route)))
}

/// Create a route
pub async fn create_route(
    State(state): State<AppState>,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<(StatusCode, Json<RouteResponse>)> {
    let new_route = route::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.route_name),
        start_location: Set(payload.start_location),
        end_location: Set(payload.end_location),
        pickup_points: Set(PickupPoints(payload.pickup_points)),
        price: Set(payload.price),
        ..Default::default()
    };

    let route = new_route.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(to_response(route))))
}

/// Update a route
pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<StatusCode> {
    let route = route::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".to_string()))?;

    let mut active: route::ActiveModel = route.into();
    active.name = Set(payload.route_name);
    active.start_location = Set(payload.start_location);
    active.end_location = Set(payload.end_location);
    active.pickup_points = Set(PickupPoints(payload.pickup_points));
    active.price = Set(payload.price);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a route
pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = route::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Route not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
