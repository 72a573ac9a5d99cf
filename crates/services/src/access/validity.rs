use bson::DateTime;
use rentora_db::models::{AccessToken, TokenStatus};
use serde::Serialize;

/// Result of presenting a token at a gate/amenity reader. A denial is an
/// expected outcome with an actionable reason, distinct from storage
/// faults which surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum RedemptionOutcome {
    Authorized { times_used: u32 },
    Denied { reason: DenialReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    Revoked,
    NotYetValid,
    Expired,
    UsageExceeded,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Revoked => "revoked",
            DenialReason::NotYetValid => "not_yet_valid",
            DenialReason::Expired => "expired",
            DenialReason::UsageExceeded => "usage_exceeded",
        }
    }
}

/// Evaluates a token snapshot against a presentation instant. The window
/// is inclusive on both ends; an absent usage_limit means unlimited use.
pub fn evaluate(token: &AccessToken, presented_at: DateTime) -> Result<(), DenialReason> {
    if token.status == TokenStatus::Revoked {
        return Err(DenialReason::Revoked);
    }
    if presented_at < token.valid_from {
        return Err(DenialReason::NotYetValid);
    }
    if presented_at > token.valid_until {
        return Err(DenialReason::Expired);
    }
    if let Some(limit) = token.usage_limit {
        if token.times_used >= limit {
            return Err(DenialReason::UsageExceeded);
        }
    }
    Ok(())
}

/// Status for listings: an active token past its window reads as expired
/// without ever being written back, so no sweeper job is needed.
pub fn effective_status(token: &AccessToken, now: DateTime) -> TokenStatus {
    if token.status == TokenStatus::Active && now > token.valid_until {
        TokenStatus::Expired
    } else {
        token.status
    }
}
