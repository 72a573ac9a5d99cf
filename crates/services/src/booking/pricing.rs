use chrono::NaiveDate;
use rentora_db::models::FinancialSnapshot;
use serde::{Deserialize, Serialize};

/// Fees charged on top of the nightly subtotal, supplied by the caller
/// (how they are derived is the pricing component's business, not ours).
/// Minor currency units throughout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeInputs {
    #[serde(default)]
    pub cleaning_fee: i64,
    #[serde(default)]
    pub security_deposit: i64,
    #[serde(default)]
    pub platform_fee: i64,
}

pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    (check_out - check_in).num_days().max(0) as u32
}

/// Computes the financial snapshot once, at creation. The snapshot is
/// immutable afterwards: total = subtotal + cleaning + deposit + platform.
pub fn compute_snapshot(
    nightly_rate: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    fees: &FeeInputs,
) -> FinancialSnapshot {
    let nights = nights(check_in, check_out);
    let nights_subtotal = nightly_rate * nights as i64;
    let total_amount =
        nights_subtotal + fees.cleaning_fee + fees.security_deposit + fees.platform_fee;

    FinancialSnapshot {
        nightly_rate,
        nights,
        nights_subtotal,
        cleaning_fee: fees.cleaning_fee,
        security_deposit: fees.security_deposit,
        platform_fee: fees.platform_fee,
        total_amount,
    }
}
