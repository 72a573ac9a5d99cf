use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A scoped access credential (QR-style digital key) owned by a booking.
///
/// The engine governs validity only; the actual credential content lives
/// behind `payload_ref` and is rendered elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub booking_id: ObjectId,
    #[serde(default)]
    pub kind: TokenKind,
    /// Opaque reference to the credential image/code.
    pub payload_ref: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub valid_from: DateTime,
    pub valid_until: DateTime,
    /// Absent means unlimited use.
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub times_used: u32,
    #[serde(default)]
    pub status: TokenStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Open category: properties add new amenity kinds without a schema
/// change, so anything unrecognized collapses to `Amenity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    #[default]
    Access,
    Parking,
    Gate,
    Elevator,
    Pool,
    Gym,
    #[serde(other)]
    Amenity,
}

/// Only `active` and `revoked` are ever written. `Expired` is derived on
/// read from `valid_until`, so no scheduler has to sweep tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    #[default]
    Active,
    Revoked,
    Expired,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Active => "active",
            TokenStatus::Revoked => "revoked",
            TokenStatus::Expired => "expired",
        }
    }
}

impl AccessToken {
    pub const COLLECTION: &'static str = "access_tokens";
}
