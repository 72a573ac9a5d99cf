pub mod overlap;
pub mod pricing;
pub mod state;
pub mod stats;

pub use pricing::FeeInputs;
pub use state::TransitionPolicy;
pub use stats::BookingStats;
