use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use chrono::NaiveDate;
use rentora_db::models::{Booking, BookingStatus, FinancialSnapshot, PaymentStatus};
use rentora_services::booking::FeeInputs;
use rentora_services::dao::base::{DaoError, PaginationParams};
use rentora_services::dao::booking::NewBooking;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub unit_id: String,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    #[serde(flatten)]
    pub fees: FeeInputs,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub unit_id: String,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub status: String,
    pub payment_status: String,
    pub financials: FinancialSnapshot,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub payment_ref: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub fn to_response(booking: Booking) -> BookingResponse {
    BookingResponse {
        id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
        unit_id: booking.unit_id.to_hex(),
        guest_id: booking.guest_id.to_hex(),
        check_in: booking.check_in,
        check_out: booking.check_out,
        guest_count: booking.guest_count,
        status: booking.status.as_str().to_string(),
        payment_status: booking.payment_status.as_str().to_string(),
        financials: booking.financials,
        contact_email: booking.contact_email,
        contact_phone: booking.contact_phone,
        special_requests: booking.special_requests,
        payment_ref: booking.payment_ref,
        created_at: rfc3339(booking.created_at),
        updated_at: rfc3339(booking.updated_at),
    }
}

fn rfc3339(dt: bson::DateTime) -> String {
    dt.try_to_rfc3339_string().unwrap_or_default()
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let unit_id = parse_id(&body.unit_id, "unit_id")?;
    let guest_id = parse_id(&body.guest_id, "guest_id")?;

    let unit = state.units.get(unit_id).await.map_err(|err| match err {
        DaoError::NotFound => ApiError::NotFound("Rental unit not found".to_string()),
        other => ApiError::Internal(other.to_string()),
    })?;

    let booking = state
        .bookings
        .create(
            &unit,
            NewBooking {
                guest_id,
                check_in: body.check_in,
                check_out: body.check_out,
                guest_count: body.guest_count,
                fees: body.fees,
                contact_email: body.contact_email,
                contact_phone: body.contact_phone,
                special_requests: body.special_requests,
            },
            auth.actor_id,
        )
        .await?;

    if let Some(id) = booking.id {
        state.notifier.notify(id, "booking_created");
    }

    Ok(Json(to_response(booking)))
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&booking_id, "booking_id")?;
    let booking = state.bookings.get(id).await?;

    // Display enrichment only; a missing or unreadable profile is omitted
    let guest = state
        .guests
        .get_profile(booking.guest_id)
        .await
        .ok()
        .flatten()
        .map(|profile| {
            serde_json::json!({
                "display_name": profile.display_name,
                "photo_url": profile.photo_url,
            })
        });

    let events: Vec<serde_json::Value> = state
        .bookings
        .recent_events(id)
        .await?
        .into_iter()
        .map(|ev| {
            serde_json::json!({
                "kind": ev.kind.as_str(),
                "actor_id": ev.actor_id.to_hex(),
                "from_status": ev.from_status.map(|s| s.as_str()),
                "to_status": ev.to_status.map(|s| s.as_str()),
                "payment_status": ev.payment_status.map(|s| s.as_str()),
                "token_id": ev.token_id.map(|t| t.to_hex()),
                "at": rfc3339(ev.created_at),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "booking": to_response(booking),
        "guest": guest,
        "events": events,
    })))
}

pub async fn list_for_unit(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(unit_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uid = parse_id(&unit_id, "unit_id")?;

    let result = state.bookings.list_by_unit(uid, &params).await?;
    let items: Vec<BookingResponse> = result.items.into_iter().map(to_response).collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn confirm(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    transition(state, auth, path, BookingStatus::Confirmed, "booking_confirmed").await
}

pub async fn check_in(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    transition(state, auth, path, BookingStatus::CheckedIn, "guest_checked_in").await
}

pub async fn check_out(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    transition(state, auth, path, BookingStatus::CheckedOut, "guest_checked_out").await
}

pub async fn complete(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    transition(state, auth, path, BookingStatus::Completed, "booking_completed").await
}

pub async fn cancel(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    transition(state, auth, path, BookingStatus::Cancelled, "booking_cancelled").await
}

async fn transition(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
    target: BookingStatus,
    event_type: &'static str,
) -> Result<Json<BookingResponse>, ApiError> {
    let id = parse_id(&booking_id, "booking_id")?;

    let booking = state.bookings.transition(id, target, auth.actor_id).await?;
    state.notifier.notify(id, event_type);

    Ok(Json(to_response(booking)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    pub payment_ref: Option<String>,
}

pub async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let id = parse_id(&booking_id, "booking_id")?;

    let booking = state
        .bookings
        .update_payment_status(id, body.payment_status, body.payment_ref, auth.actor_id)
        .await?;
    state.notifier.notify(id, "payment_updated");

    Ok(Json(to_response(booking)))
}

pub(crate) fn parse_id(raw: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}
