use chrono::NaiveDate;
use rentora_config::BookingSettings;
use rentora_db::models::{BookingStatus, PaymentStatus};

use crate::error::CoreError;

/// Configurable guards on `confirmed -> checked_in`. The source platform
/// let operators check guests in early and before any deposit was
/// collected; both remain allowed unless a property opts in to the
/// stricter behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionPolicy {
    /// Reject check-in while today < the stay's check-in date.
    pub enforce_checkin_date: bool,
    /// Reject check-in while payment_status is still `pending`.
    pub require_payment_for_checkin: bool,
}

impl From<&BookingSettings> for TransitionPolicy {
    fn from(settings: &BookingSettings) -> Self {
        Self {
            enforce_checkin_date: settings.enforce_checkin_date,
            require_payment_for_checkin: settings.require_payment_for_checkin,
        }
    }
}

/// Validates a booking status transition without touching storage.
///
/// The table:
///
/// ```text
/// pending     -> confirmed | cancelled
/// confirmed   -> checked_in | cancelled     (policy guards apply)
/// checked_in  -> checked_out | cancelled
/// checked_out -> completed                  (requires payment == paid)
/// cancelled, completed: terminal
/// ```
pub fn validate_transition(
    from: BookingStatus,
    to: BookingStatus,
    payment: PaymentStatus,
    check_in: NaiveDate,
    today: NaiveDate,
    policy: &TransitionPolicy,
) -> Result<(), CoreError> {
    use BookingStatus::*;

    let invalid = || CoreError::InvalidTransition { from, to };

    let allowed = match (from, to) {
        (Pending, Confirmed) | (Pending, Cancelled) => true,
        (Confirmed, CheckedIn) => {
            if policy.enforce_checkin_date && today < check_in {
                return Err(invalid());
            }
            if policy.require_payment_for_checkin && payment == PaymentStatus::Pending {
                return Err(invalid());
            }
            true
        }
        (Confirmed, Cancelled) => true,
        (CheckedIn, CheckedOut) | (CheckedIn, Cancelled) => true,
        (CheckedOut, Completed) => {
            // A completed booking is a paid booking.
            if payment != PaymentStatus::Paid {
                return Err(invalid());
            }
            true
        }
        _ => false,
    };

    if allowed { Ok(()) } else { Err(invalid()) }
}
