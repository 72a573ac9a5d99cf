pub mod validity;

pub use validity::{DenialReason, RedemptionOutcome};
