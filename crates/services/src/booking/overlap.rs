use bson::oid::ObjectId;
use chrono::NaiveDate;
use rentora_db::models::{Booking, BookingStatus};

/// Half-open interval overlap: [a1, a2) conflicts with [b1, b2) iff
/// a1 < b2 and b1 < a2. A checkout on the same day as another stay's
/// check-in is NOT a conflict.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Ids of non-cancelled bookings whose stay window overlaps the proposed
/// range. Cancelled bookings release their dates.
pub fn blocking_ids(
    existing: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Vec<ObjectId> {
    existing
        .iter()
        .filter(|b| b.status != BookingStatus::Cancelled)
        .filter(|b| ranges_overlap(b.check_in, b.check_out, check_in, check_out))
        .filter_map(|b| b.id)
        .collect()
}
