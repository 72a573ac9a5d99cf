use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::booking::parse_id;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Read-only overlap probe. A same-day turnover (one stay's checkout on
/// another's check-in date) is available.
pub async fn check(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(unit_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uid = parse_id(&unit_id, "unit_id")?;

    let blocking = state
        .bookings
        .check_availability(uid, query.check_in, query.check_out)
        .await?;

    Ok(Json(serde_json::json!({
        "available": blocking.is_empty(),
        "blocking": blocking.iter().map(|id| id.to_hex()).collect::<Vec<_>>(),
    })))
}
