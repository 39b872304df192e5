use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::payment::{self, PaymentMethod, PaymentStatus};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
}

pub(crate) fn to_response(payment: payment::Model) -> PaymentResponse {
    PaymentResponse {
        payment_id: payment.id,
        booking_id: payment.booking_id,
        amount: payment.amount,
        payment_method: payment.method,
        transaction_id: payment.transaction_id,
        payment_status: payment.status,
    }
}

/// List all payments
pub async fn list_payments(State(state): State<AppState>) -> AppResult<Json<Vec<PaymentResponse>>> {
    let payments = payment::Entity::find().all(&state.db).await?;
    Ok(Json(payments.into_iter().map(to_response).collect()))
}

/// Get one payment
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PaymentResponse>> {
    let payment = payment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    Ok(Json(to_response(payment)))
}

/// Get the payment attached to a booking
pub async fn payment_by_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<PaymentResponse>> {
    booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let payment = payment::Entity::find()
        .filter(payment::Column::BookingId.eq(booking_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    Ok(Json(to_response(payment)))
}

/// Admin override of a payment's status.
///
/// Cascades one way to the owning booking: Successful confirms it, any
/// other value sends it back to Pending.
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> AppResult<StatusCode> {
    let payment = payment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    let status = PaymentStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest("Invalid payment status".to_string()))?;

    let booking_id = payment.booking_id;
    let mut active: payment::ActiveModel = payment.into();
    active.status = Set(status.clone());
    active.update(&state.db).await?;

    if let Some(booking) = booking::Entity::find_by_id(booking_id).one(&state.db).await? {
        let mut active: booking::ActiveModel = booking.into();
        active.booking_status = Set(if status == PaymentStatus::Successful {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        });
        active.update(&state.db).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a payment
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = payment::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Payment not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
