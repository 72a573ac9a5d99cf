use std::sync::Arc;

use bson::{DateTime, doc, oid::ObjectId};
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use mongodb::Database;
use rentora_db::models::{
    Booking, BookingEvent, BookingEventKind, BookingStatus, PaymentStatus, RentalUnit,
};
use tokio::sync::Mutex;
use tracing::info;

use crate::booking::{FeeInputs, TransitionPolicy, overlap, pricing, stats};
use crate::error::{CoreError, CoreResult};

use super::access_token::AccessTokenDao;
use super::base::{BaseDao, PaginatedResult, PaginationParams};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub guest_id: ObjectId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub fees: FeeInputs,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// Owns the booking lifecycle: creation behind the overlap guard, the
/// status state machine, payment-status bookkeeping and the audit trail.
/// A booking and its access tokens form one consistency unit, which is
/// why cancellation revokes tokens from inside `transition` rather than
/// leaving it to a separate job.
pub struct BookingDao {
    pub base: BaseDao<Booking>,
    events: BaseDao<BookingEvent>,
    tokens: Arc<AccessTokenDao>,
    /// One creation at a time per unit: the overlap check and the insert
    /// must be atomic with respect to other creations on the same unit.
    unit_locks: DashMap<ObjectId, Arc<Mutex<()>>>,
    policy: TransitionPolicy,
}

impl BookingDao {
    pub fn new(db: &Database, tokens: Arc<AccessTokenDao>, policy: TransitionPolicy) -> Self {
        Self {
            base: BaseDao::new(db, Booking::COLLECTION),
            events: BaseDao::new(db, BookingEvent::COLLECTION),
            tokens,
            unit_locks: DashMap::new(),
            policy,
        }
    }

    /// Creates a booking in `pending`/`payment: pending`, or fails with
    /// `DateRangeConflict` naming the blocking booking ids. No write
    /// happens on conflict.
    pub async fn create(
        &self,
        unit: &RentalUnit,
        new: NewBooking,
        actor_id: ObjectId,
    ) -> CoreResult<Booking> {
        if new.check_out <= new.check_in {
            return Err(CoreError::InvalidStayWindow);
        }
        if new.guest_count == 0 || new.guest_count > unit.max_guests {
            return Err(CoreError::CapacityExceeded {
                requested: new.guest_count,
                max: unit.max_guests,
            });
        }

        let unit_id = unit.id.ok_or(CoreError::NotFound)?;
        let lock = self
            .unit_locks
            .entry(unit_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let blocking = self
            .conflicting_ids(unit_id, new.check_in, new.check_out)
            .await?;
        if !blocking.is_empty() {
            return Err(CoreError::DateRangeConflict { blocking });
        }

        let financials =
            pricing::compute_snapshot(unit.nightly_rate, new.check_in, new.check_out, &new.fees);
        let now = DateTime::now();
        let booking = Booking {
            id: None,
            unit_id,
            guest_id: new.guest_id,
            check_in: new.check_in,
            check_out: new.check_out,
            guest_count: new.guest_count,
            financials,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            special_requests: new.special_requests,
            payment_ref: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&booking).await?;
        self.events
            .insert_one(&event(id, BookingEventKind::Created, actor_id))
            .await?;
        info!(booking_id = %id, %unit_id, "Booking created");

        self.base.find_by_id(id).await.map_err(Into::into)
    }

    /// Read-only overlap probe for operator tooling; empty result means
    /// the range is free.
    pub async fn check_availability(
        &self,
        unit_id: ObjectId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> CoreResult<Vec<ObjectId>> {
        if check_out <= check_in {
            return Err(CoreError::InvalidStayWindow);
        }
        self.conflicting_ids(unit_id, check_in, check_out).await
    }

    async fn conflicting_ids(
        &self,
        unit_id: ObjectId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> CoreResult<Vec<ObjectId>> {
        // Stay windows are ISO date strings in BSON, so the range filter
        // stays index-friendly; the half-open interval semantics live in
        // the pure overlap module.
        let candidates = self
            .base
            .find_many(
                doc! {
                    "unit_id": unit_id,
                    "status": { "$ne": "cancelled" },
                    "check_in": { "$lt": check_out.to_string() },
                    "check_out": { "$gt": check_in.to_string() },
                },
                None,
            )
            .await?;

        Ok(overlap::blocking_ids(&candidates, check_in, check_out))
    }

    /// Drives the state machine. The status write is a compare-and-set on
    /// the expected current status, so concurrent transitions on one
    /// booking serialize against each other; on entering `cancelled` every
    /// active token of the booking is revoked in the same call.
    pub async fn transition(
        &self,
        booking_id: ObjectId,
        target: BookingStatus,
        actor_id: ObjectId,
    ) -> CoreResult<Booking> {
        let booking = self.base.find_by_id(booking_id).await?;
        let today = Utc::now().date_naive();

        crate::booking::state::validate_transition(
            booking.status,
            target,
            booking.payment_status,
            booking.check_in,
            today,
            &self.policy,
        )?;

        let mut filter = doc! { "_id": booking_id, "status": booking.status.as_str() };
        if target == BookingStatus::Completed {
            // Paid-before-completed is re-checked at commit time so a
            // racing payment update cannot slip an unpaid booking into
            // completed.
            filter.insert("payment_status", "paid");
        }

        let updated = self
            .base
            .update_one(filter, doc! { "$set": { "status": target.as_str() } })
            .await?;
        if !updated {
            // Lost a race: someone else moved the booking first.
            let fresh = self.base.find_by_id(booking_id).await?;
            return Err(CoreError::InvalidTransition {
                from: fresh.status,
                to: target,
            });
        }

        if target == BookingStatus::Cancelled {
            self.tokens.cascade_revoke_for_booking(booking_id).await?;
        }

        let mut ev = event(booking_id, BookingEventKind::StatusChanged, actor_id);
        ev.from_status = Some(booking.status);
        ev.to_status = Some(target);
        self.events.insert_one(&ev).await?;
        info!(%booking_id, from = %booking.status, to = %target, "Booking transitioned");

        self.base.find_by_id(booking_id).await.map_err(Into::into)
    }

    /// Payment status moves independently of the booking status, with one
    /// guard: a completed booking's payment truth is immutable (it can
    /// only be restated as `paid`).
    pub async fn update_payment_status(
        &self,
        booking_id: ObjectId,
        payment_status: PaymentStatus,
        payment_ref: Option<String>,
        actor_id: ObjectId,
    ) -> CoreResult<Booking> {
        let mut filter = doc! { "_id": booking_id };
        if payment_status != PaymentStatus::Paid {
            // The lock lives in the filter so a payment update racing a
            // completion cannot slip past a pre-read check.
            filter.insert("status", doc! { "$ne": BookingStatus::Completed.as_str() });
        }

        let mut set = doc! { "payment_status": payment_status.as_str() };
        if let Some(ref payment_ref) = payment_ref {
            set.insert("payment_ref", payment_ref);
        }
        let updated = self.base.update_one(filter, doc! { "$set": set }).await?;
        if !updated {
            // Missing the filter with an existing booking means the status
            // guard blocked the write.
            self.base.find_by_id(booking_id).await?;
            return Err(CoreError::PaymentLocked);
        }

        let mut ev = event(booking_id, BookingEventKind::PaymentUpdated, actor_id);
        ev.payment_status = Some(payment_status);
        self.events.insert_one(&ev).await?;

        self.base.find_by_id(booking_id).await.map_err(Into::into)
    }

    pub async fn get(&self, booking_id: ObjectId) -> CoreResult<Booking> {
        self.base.find_by_id(booking_id).await.map_err(Into::into)
    }

    pub async fn list_by_unit(
        &self,
        unit_id: ObjectId,
        params: &PaginationParams,
    ) -> CoreResult<PaginatedResult<Booking>> {
        self.base
            .find_paginated(
                doc! { "unit_id": unit_id },
                Some(doc! { "check_in": 1 }),
                params,
            )
            .await
            .map_err(Into::into)
    }

    pub async fn recent_events(&self, booking_id: ObjectId) -> CoreResult<Vec<BookingEvent>> {
        self.events
            .find_many(
                doc! { "booking_id": booking_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
            .map_err(Into::into)
    }

    /// Dashboard aggregates for one unit or the whole portfolio.
    /// Lock-free snapshot read; reporting tolerates slight staleness.
    pub async fn stats(&self, unit_id: Option<ObjectId>) -> CoreResult<stats::BookingStats> {
        let filter = match unit_id {
            Some(unit_id) => doc! { "unit_id": unit_id },
            None => doc! {},
        };
        let bookings = self.base.find_many(filter, None).await?;
        Ok(stats::aggregate(&bookings))
    }
}

fn event(booking_id: ObjectId, kind: BookingEventKind, actor_id: ObjectId) -> BookingEvent {
    BookingEvent {
        id: None,
        booking_id,
        kind,
        actor_id,
        from_status: None,
        to_status: None,
        payment_status: None,
        token_id: None,
        created_at: DateTime::now(),
    }
}
