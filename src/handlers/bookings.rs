use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::BookingConfirmation;
use crate::entities::booking::{self, BookingStatus, VerificationStatus};
use crate::entities::payment::{self, PaymentMethod, PaymentStatus};
use crate::entities::schedule;
use crate::error::{AppError, AppResult};
use crate::handlers::payments::{self, PaymentResponse};
use crate::handlers::schedules::{self, DateRangeParams, ScheduleResponse};
use crate::utils::codes;
use crate::utils::dates::{day_bounds, parse_date_range};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub schedule_id: Uuid,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub pickup_point: String,
    pub number_of_seats: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: String,
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub schedule_id: Uuid,
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub pickup_point: String,
    pub booking_reference: String,
    pub ticket_code: String,
    pub qr_code_data: String,
    pub number_of_seats: i32,
    pub booking_status: BookingStatus,
    pub verification_status: VerificationStatus,
    pub notification_sent: bool,
    pub amount: Decimal,
    pub schedule: Option<ScheduleResponse>,
    pub created_at: DateTime<Utc>,
}

/// Shape a booking with its nested schedule snapshot.
pub(crate) async fn to_response(
    state: &AppState,
    booking: booking::Model,
) -> AppResult<BookingResponse> {
    let schedule = schedule::Entity::find_by_id(booking.schedule_id)
        .one(&state.db)
        .await?;

    let schedule = match schedule {
        Some(s) => Some(schedules::to_response(state, s).await?),
        None => None,
    };

    Ok(BookingResponse {
        booking_id: booking.id,
        schedule_id: booking.schedule_id,
        passenger_name: booking.passenger_name,
        passenger_email: booking.passenger_email,
        passenger_phone: booking.passenger_phone,
        pickup_point: booking.pickup_point,
        booking_reference: booking.reference,
        ticket_code: booking.ticket_code,
        qr_code_data: booking.qr_code_data,
        number_of_seats: booking.seats,
        booking_status: booking.booking_status,
        verification_status: booking.verification_status,
        notification_sent: booking.notification_sent,
        amount: booking.amount,
        schedule,
        created_at: booking.created_at.with_timezone(&Utc),
    })
}

async fn to_responses(
    state: &AppState,
    bookings: Vec<booking::Model>,
) -> AppResult<Vec<BookingResponse>> {
    let mut responses = Vec::with_capacity(bookings.len());
    for booking in bookings {
        responses.push(to_response(state, booking).await?);
    }
    Ok(responses)
}

/// List all bookings
pub async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = booking::Entity::find().all(&state.db).await?;
    Ok(Json(to_responses(&state, bookings).await?))
}

/// Get one booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(to_response(&state, booking).await?))
}

/// Look a booking up by its human-readable reference
pub async fn booking_by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<BookingResponse>> {
    let booking = booking::Entity::find()
        .filter(booking::Column::Reference.eq(&reference))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(to_response(&state, booking).await?))
}

/// List bookings on a schedule
pub async fn bookings_by_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    schedule::Entity::find_by_id(schedule_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    let bookings = booking::Entity::find()
        .filter(booking::Column::ScheduleId.eq(schedule_id))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, bookings).await?))
}

/// List bookings created in an inclusive day range
pub async fn bookings_by_date_range(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let (start, end) = parse_date_range(&params.start, &params.end)?;
    let (from, to) = day_bounds(start, end);

    let bookings = booking::Entity::find()
        .filter(booking::Column::CreatedAt.gte(from))
        .filter(booking::Column::CreatedAt.lt(to))
        .all(&state.db)
        .await?;

    Ok(Json(to_responses(&state, bookings).await?))
}

/// Create a booking against a schedule.
///
/// The booking lands in (Pending, Pending) with freshly generated
/// reference/ticket/QR identifiers; no email goes out until payment.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let schedule = schedule::Entity::find_by_id(payload.schedule_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid schedule ID".to_string()))?;

    if payload.number_of_seats < 1 {
        return Err(AppError::BadRequest("Must book at least 1 seat".to_string()));
    }

    let reference = codes::booking_reference();
    let ticket_code = codes::ticket_code();
    let qr_code_data = codes::qr_payload(&reference, &ticket_code);
    let amount = schedule.price * Decimal::from(payload.number_of_seats);

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        schedule_id: Set(schedule.id),
        passenger_name: Set(payload.passenger_name),
        passenger_email: Set(payload.passenger_email),
        passenger_phone: Set(payload.passenger_phone),
        pickup_point: Set(payload.pickup_point),
        reference: Set(reference),
        ticket_code: Set(ticket_code),
        qr_code_data: Set(qr_code_data),
        seats: Set(payload.number_of_seats),
        amount: Set(amount),
        booking_status: Set(BookingStatus::Pending),
        verification_status: Set(VerificationStatus::Pending),
        notification_sent: Set(false),
        ..Default::default()
    };

    // A reference/ticket collision surfaces as a unique-constraint Conflict;
    // it is not retried.
    let booking = new_booking.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, booking).await?)))
}

/// Attach a payment to a booking, confirming it.
///
/// The caller-supplied amount overwrites the booking amount without
/// re-checking it against the schedule price; adjusted/promotional pricing
/// goes through this door on purpose.
pub async fn process_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<PaymentResponse>> {
    let booking = booking::Entity::find_by_id(payload.booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let method = PaymentMethod::parse(&payload.payment_method)
        .filter(|m| *m != PaymentMethod::Cash)
        .ok_or_else(|| {
            AppError::BadRequest(
                "Invalid payment method. Expected CreditCard or MobileMoney.".to_string(),
            )
        })?;

    // Friendly duplicate check; the unique index on booking_id backstops the
    // race where two requests pass it at once.
    let existing = payment::Entity::find()
        .filter(payment::Column::BookingId.eq(booking.id))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A payment already exists for this booking".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.amount = Set(payload.amount);
    active.booking_status = Set(BookingStatus::Confirmed);
    let booking = active.update(&state.db).await?;

    // Confirmation email is best-effort: the booking stays confirmed even
    // when the send fails.
    let email_sent = match send_confirmation(&state, &booking).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(booking_id = %booking.id, "confirmation email failed: {}", e);
            false
        }
    };

    let booking = if email_sent {
        let mut active: booking::ActiveModel = booking.into();
        active.notification_sent = Set(true);
        active.update(&state.db).await?
    } else {
        booking
    };

    let new_payment = payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        amount: Set(payload.amount),
        method: Set(method),
        transaction_id: Set(payload.transaction_id),
        status: Set(PaymentStatus::Successful),
        ..Default::default()
    };
    let payment = new_payment.insert(&state.db).await?;

    Ok(Json(payments::to_response(payment)))
}

async fn send_confirmation(state: &AppState, booking: &booking::Model) -> AppResult<()> {
    let schedule = schedule::Entity::find_by_id(booking.schedule_id)
        .one(&state.db)
        .await?;

    let (departure_time, trip_date) = match &schedule {
        Some(s) => (s.departure_time.to_string(), s.trip_date.to_string()),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    let confirmation = BookingConfirmation {
        reference: &booking.reference,
        ticket_code: &booking.ticket_code,
        passenger_name: &booking.passenger_name,
        pickup_point: &booking.pickup_point,
        departure_time,
        trip_date,
        seats: booking.seats,
        amount: booking.amount,
        qr_data: &booking.qr_code_data,
    };

    state
        .mailer
        .send_booking_confirmation(&booking.passenger_email, &booking.passenger_name, &confirmation)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Admin override of the booking status; any value is reachable
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<String>,
) -> AppResult<StatusCode> {
    let booking = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let status = BookingStatus::parse(&status)
        .ok_or_else(|| AppError::BadRequest("Invalid booking status".to_string()))?;

    let mut active: booking::ActiveModel = booking.into();
    active.booking_status = Set(status);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Driver check-in: mark the scanned booking as boarded
pub async fn verify_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    set_verification(&state, id, VerificationStatus::Verified).await
}

/// Driver check-in: mark the booking as a no-show
pub async fn mark_no_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    set_verification(&state, id, VerificationStatus::NoShow).await
}

async fn set_verification(
    state: &AppState,
    id: Uuid,
    status: VerificationStatus,
) -> AppResult<StatusCode> {
    let booking = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let mut active: booking::ActiveModel = booking.into();
    active.verification_status = Set(status);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a booking
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let result = booking::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
