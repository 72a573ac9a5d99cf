use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::booking::{BookingStatus, PaymentStatus};

/// Append-only audit record for a booking. Written alongside every
/// lifecycle mutation, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub booking_id: ObjectId,
    pub kind: BookingEventKind,
    pub actor_id: ObjectId,
    pub from_status: Option<BookingStatus>,
    pub to_status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub token_id: Option<ObjectId>,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Created,
    StatusChanged,
    PaymentUpdated,
    TokenIssued,
    TokenRevoked,
}

impl BookingEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingEventKind::Created => "created",
            BookingEventKind::StatusChanged => "status_changed",
            BookingEventKind::PaymentUpdated => "payment_updated",
            BookingEventKind::TokenIssued => "token_issued",
            BookingEventKind::TokenRevoked => "token_revoked",
        }
    }
}

impl BookingEvent {
    pub const COLLECTION: &'static str = "booking_events";
}
