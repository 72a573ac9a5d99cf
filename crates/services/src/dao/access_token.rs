use bson::{Bson, DateTime, doc, oid::ObjectId};
use chrono::NaiveTime;
use mongodb::Database;
use rand::Rng;
use rentora_db::models::{
    AccessToken, Booking, BookingEvent, BookingEventKind, BookingStatus, TokenKind, TokenStatus,
};
use tracing::{debug, info};

use crate::access::validity;
use crate::access::{DenialReason, RedemptionOutcome};
use crate::error::{CoreError, CoreResult};

use super::base::BaseDao;

/// Issuance parameters. Window and payload default when omitted: the
/// window to [check-in − 1 day, end of check-out day] (operators commonly
/// grant access the evening before arrival), the payload to a freshly
/// generated credential code.
#[derive(Debug, Clone, Default)]
pub struct NewAccessToken {
    pub kind: TokenKind,
    pub valid_from: Option<DateTime>,
    pub valid_until: Option<DateTime>,
    pub usage_limit: Option<u32>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub payload_ref: Option<String>,
}

pub struct AccessTokenDao {
    pub base: BaseDao<AccessToken>,
    bookings: BaseDao<Booking>,
    events: BaseDao<BookingEvent>,
}

impl AccessTokenDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, AccessToken::COLLECTION),
            bookings: BaseDao::new(db, Booking::COLLECTION),
            events: BaseDao::new(db, BookingEvent::COLLECTION),
        }
    }

    /// Mints a token for an eligible booking (confirmed, checked-in or
    /// checked-out stays only).
    pub async fn issue(
        &self,
        booking_id: ObjectId,
        params: NewAccessToken,
        actor_id: ObjectId,
    ) -> CoreResult<AccessToken> {
        let booking = self.bookings.find_by_id(booking_id).await?;
        if !matches!(
            booking.status,
            BookingStatus::Confirmed | BookingStatus::CheckedIn | BookingStatus::CheckedOut
        ) {
            return Err(CoreError::BookingNotEligible {
                status: booking.status,
            });
        }

        let (default_from, default_until) = default_window(&booking);
        let valid_from = params.valid_from.unwrap_or(default_from);
        let valid_until = params.valid_until.unwrap_or(default_until);
        if valid_from >= valid_until {
            return Err(CoreError::InvalidValidityWindow);
        }

        let now = DateTime::now();
        let token = AccessToken {
            id: None,
            booking_id,
            kind: params.kind,
            payload_ref: params.payload_ref.unwrap_or_else(generate_credential_code),
            label: params.label,
            description: params.description,
            valid_from,
            valid_until,
            usage_limit: params.usage_limit,
            times_used: 0,
            status: TokenStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&token).await?;
        self.events
            .insert_one(&token_event(
                booking_id,
                BookingEventKind::TokenIssued,
                actor_id,
                id,
            ))
            .await?;

        self.base.find_by_id(id).await.map_err(Into::into)
    }

    /// Revokes a single token. Idempotent: revoking an already-revoked
    /// token is a no-op success.
    pub async fn revoke(&self, token_id: ObjectId, actor_id: ObjectId) -> CoreResult<AccessToken> {
        let token = self.base.find_by_id(token_id).await?;
        if token.status == TokenStatus::Revoked {
            return Ok(token);
        }

        self.base
            .update_by_id(token_id, doc! { "$set": { "status": "revoked" } })
            .await?;
        self.events
            .insert_one(&token_event(
                token.booking_id,
                BookingEventKind::TokenRevoked,
                actor_id,
                token_id,
            ))
            .await?;

        self.base.find_by_id(token_id).await.map_err(Into::into)
    }

    /// Revokes every still-active token owned by a booking. Invoked by
    /// the lifecycle manager when the booking is cancelled.
    pub async fn cascade_revoke_for_booking(&self, booking_id: ObjectId) -> CoreResult<u64> {
        let revoked = self
            .base
            .update_many(
                doc! { "booking_id": booking_id, "status": "active" },
                doc! { "$set": { "status": "revoked" } },
            )
            .await?;
        if revoked > 0 {
            info!(%booking_id, revoked, "Cascade-revoked access tokens");
        }
        Ok(revoked)
    }

    /// Tokens of a booking, newest first, with the lazily-derived status
    /// (an active token past its window reads as expired).
    pub async fn list_for_booking(&self, booking_id: ObjectId) -> CoreResult<Vec<AccessToken>> {
        let tokens = self
            .base
            .find_many(
                doc! { "booking_id": booking_id },
                Some(doc! { "created_at": -1 }),
            )
            .await?;

        let now = DateTime::now();
        Ok(tokens
            .into_iter()
            .map(|mut token| {
                token.status = validity::effective_status(&token, now);
                token
            })
            .collect())
    }

    /// Evaluates a presented token and, when authorized, consumes one use.
    ///
    /// The grant itself is a single atomic find-and-increment whose filter
    /// encodes status, window and usage cap, so two simultaneous attempts
    /// against a last remaining use produce exactly one authorization.
    pub async fn redeem(
        &self,
        token_id: ObjectId,
        presented_at: DateTime,
    ) -> CoreResult<RedemptionOutcome> {
        let token = self.base.find_by_id(token_id).await?;
        let booking = self.bookings.find_by_id(token.booking_id).await?;
        if booking.status == BookingStatus::Cancelled {
            // A cancelled stay grants nothing. The cancellation already
            // revokes its tokens; re-running the sweep here repairs any
            // token the sweep did not reach.
            self.cascade_revoke_for_booking(token.booking_id).await?;
            return Ok(RedemptionOutcome::Denied {
                reason: DenialReason::Revoked,
            });
        }

        let filter = doc! {
            "_id": token_id,
            "status": "active",
            "valid_from": { "$lte": presented_at },
            "valid_until": { "$gte": presented_at },
            "$expr": {
                "$or": [
                    { "$eq": [ { "$ifNull": ["$usage_limit", Bson::Null] }, Bson::Null ] },
                    { "$lt": ["$times_used", "$usage_limit"] },
                ]
            },
        };

        let updated = self
            .base
            .find_one_and_update(filter, doc! { "$inc": { "times_used": 1 } })
            .await?;

        match updated {
            Some(token) => {
                debug!(%token_id, times_used = token.times_used, "Token redeemed");
                Ok(RedemptionOutcome::Authorized {
                    times_used: token.times_used,
                })
            }
            None => {
                // Classify the miss for the operator. A token that vanished
                // entirely is a fault, not a denial.
                let token = self.base.find_by_id(token_id).await?;
                let reason = validity::evaluate(&token, presented_at)
                    .err()
                    // times_used only grows and revocation is one-way, so a
                    // clean re-read after a filter miss means the cap was
                    // consumed in between.
                    .unwrap_or(DenialReason::UsageExceeded);
                Ok(RedemptionOutcome::Denied { reason })
            }
        }
    }
}

fn default_window(booking: &Booking) -> (DateTime, DateTime) {
    let from = booking
        .check_in
        .pred_opt()
        .unwrap_or(booking.check_in)
        .and_time(NaiveTime::MIN)
        .and_utc();
    let until = booking
        .check_out
        .and_hms_opt(23, 59, 59)
        .expect("constant wall-clock time")
        .and_utc();
    (DateTime::from_chrono(from), DateTime::from_chrono(until))
}

fn token_event(
    booking_id: ObjectId,
    kind: BookingEventKind,
    actor_id: ObjectId,
    token_id: ObjectId,
) -> BookingEvent {
    BookingEvent {
        id: None,
        booking_id,
        kind,
        actor_id,
        from_status: None,
        to_status: None,
        payment_status: None,
        token_id: Some(token_id),
        created_at: DateTime::now(),
    }
}

fn generate_credential_code() -> String {
    let mut rng = rand::rng();
    let parts: Vec<String> = (0..4)
        .map(|_| {
            let n: u32 = rng.random_range(1000..9999);
            n.to_string()
        })
        .collect();
    format!("qr-{}", parts.join("-"))
}
