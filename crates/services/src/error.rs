use bson::oid::ObjectId;
use rentora_db::models::BookingStatus;
use thiserror::Error;

use crate::dao::base::DaoError;

/// Engine-level error taxonomy, independent of any transport.
///
/// Redemption denials are deliberately NOT here: a denied access attempt
/// is an expected outcome, not a fault (see `access::validity`).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("date range conflicts with {} existing booking(s)", blocking.len())]
    DateRangeConflict { blocking: Vec<ObjectId> },
    #[error("transition from {from} to {to} is not permitted")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("booking in status {status} is not eligible for access tokens")]
    BookingNotEligible { status: BookingStatus },
    #[error("valid_from must be before valid_until")]
    InvalidValidityWindow,
    #[error("check_out must be after check_in")]
    InvalidStayWindow,
    #[error("guest count {requested} exceeds unit capacity {max}")]
    CapacityExceeded { requested: u32, max: u32 },
    #[error("payment status of a completed booking can only be paid")]
    PaymentLocked,
    #[error("entity not found")]
    NotFound,
    #[error(transparent)]
    Storage(DaoError),
}

impl From<DaoError> for CoreError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => CoreError::NotFound,
            other => CoreError::Storage(other),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
