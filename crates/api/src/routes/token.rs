use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rentora_db::models::{AccessToken, TokenKind};
use rentora_services::access::RedemptionOutcome;
use rentora_services::dao::access_token::NewAccessToken;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::booking::parse_id;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct IssueTokenRequest {
    pub kind: TokenKind,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub payload_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub id: String,
    pub booking_id: String,
    pub kind: String,
    pub payload_ref: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub valid_from: String,
    pub valid_until: String,
    pub usage_limit: Option<u32>,
    pub times_used: u32,
    pub status: String,
}

fn to_response(token: AccessToken) -> TokenResponse {
    TokenResponse {
        id: token.id.map(|id| id.to_hex()).unwrap_or_default(),
        booking_id: token.booking_id.to_hex(),
        kind: kind_str(token.kind).to_string(),
        payload_ref: token.payload_ref,
        label: token.label,
        description: token.description,
        valid_from: token.valid_from.try_to_rfc3339_string().unwrap_or_default(),
        valid_until: token.valid_until.try_to_rfc3339_string().unwrap_or_default(),
        usage_limit: token.usage_limit,
        times_used: token.times_used,
        status: token.status.as_str().to_string(),
    }
}

fn kind_str(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "access",
        TokenKind::Parking => "parking",
        TokenKind::Gate => "gate",
        TokenKind::Elevator => "elevator",
        TokenKind::Pool => "pool",
        TokenKind::Gym => "gym",
        TokenKind::Amenity => "amenity",
    }
}

pub async fn issue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
    Json(body): Json<IssueTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let id = parse_id(&booking_id, "booking_id")?;

    let token = state
        .tokens
        .issue(
            id,
            NewAccessToken {
                kind: body.kind,
                valid_from: body.valid_from.map(bson::DateTime::from_chrono),
                valid_until: body.valid_until.map(bson::DateTime::from_chrono),
                usage_limit: body.usage_limit,
                label: body.label,
                description: body.description,
                payload_ref: body.payload_ref,
            },
            auth.actor_id,
        )
        .await?;
    state.notifier.notify(id, "token_issued");

    Ok(Json(to_response(token)))
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<Vec<TokenResponse>>, ApiError> {
    let id = parse_id(&booking_id, "booking_id")?;

    let tokens = state.tokens.list_for_booking(id).await?;
    Ok(Json(tokens.into_iter().map(to_response).collect()))
}

pub async fn revoke(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token_id): Path<String>,
) -> Result<Json<TokenResponse>, ApiError> {
    let id = parse_id(&token_id, "token_id")?;

    let token = state.tokens.revoke(id, auth.actor_id).await?;
    state.notifier.notify(token.booking_id, "token_revoked");

    Ok(Json(to_response(token)))
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RedeemRequest {
    /// Instant of presentation; defaults to now. Explicit values let
    /// gate hardware with delayed uplinks report the actual swipe time.
    pub presented_at: Option<DateTime<Utc>>,
}

pub async fn redeem(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(token_id): Path<String>,
    Json(body): Json<RedeemRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&token_id, "token_id")?;
    let presented_at = body
        .presented_at
        .map(bson::DateTime::from_chrono)
        .unwrap_or_else(bson::DateTime::now);

    let outcome = state.tokens.redeem(id, presented_at).await?;

    // A denial is a normal outcome (200), distinguishable from faults
    let response = match outcome {
        RedemptionOutcome::Authorized { times_used } => serde_json::json!({
            "authorized": true,
            "times_used": times_used,
        }),
        RedemptionOutcome::Denied { reason } => serde_json::json!({
            "authorized": false,
            "reason": reason.as_str(),
        }),
    };

    Ok(Json(response))
}
