use axum::{
    Json,
    extract::{Query, State},
};
use rentora_services::booking::BookingStats;
use serde::Deserialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::booking::parse_id;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct StatsQuery {
    /// Restrict to one unit; omitted means the whole portfolio.
    pub unit_id: Option<String>,
}

pub async fn bookings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<BookingStats>, ApiError> {
    let unit_id = query
        .unit_id
        .as_deref()
        .map(|raw| parse_id(raw, "unit_id"))
        .transpose()?;

    let stats = state.bookings.stats(unit_id).await?;
    Ok(Json(stats))
}
