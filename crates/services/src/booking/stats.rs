use rentora_db::models::{Booking, BookingStatus, PaymentStatus};
use serde::Serialize;

/// Dashboard aggregates over committed bookings. Recomputed on demand
/// from a snapshot read; slight staleness is acceptable for reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingStats {
    pub total: u64,
    pub by_status: StatusCounts,
    /// Sum of total_amount across bookings whose payment is settled.
    pub paid_revenue: i64,
    pub average_nightly_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub confirmed: u64,
    pub checked_in: u64,
    pub checked_out: u64,
    pub cancelled: u64,
    pub completed: u64,
}

pub fn aggregate(bookings: &[Booking]) -> BookingStats {
    let mut stats = BookingStats::default();
    let mut rate_sum: i64 = 0;

    for booking in bookings {
        stats.total += 1;
        match booking.status {
            BookingStatus::Pending => stats.by_status.pending += 1,
            BookingStatus::Confirmed => stats.by_status.confirmed += 1,
            BookingStatus::CheckedIn => stats.by_status.checked_in += 1,
            BookingStatus::CheckedOut => stats.by_status.checked_out += 1,
            BookingStatus::Cancelled => stats.by_status.cancelled += 1,
            BookingStatus::Completed => stats.by_status.completed += 1,
        }
        if booking.payment_status == PaymentStatus::Paid {
            stats.paid_revenue += booking.financials.total_amount;
        }
        rate_sum += booking.financials.nightly_rate;
    }

    if stats.total > 0 {
        stats.average_nightly_rate = rate_sum as f64 / stats.total as f64;
    }

    stats
}
