pub mod access_token;
pub mod booking;
pub mod booking_event;
pub mod guest_profile;
pub mod rental_unit;

pub use access_token::{AccessToken, TokenKind, TokenStatus};
pub use booking::{Booking, BookingStatus, FinancialSnapshot, PaymentStatus};
pub use booking_event::{BookingEvent, BookingEventKind};
pub use guest_profile::GuestProfile;
pub use rental_unit::RentalUnit;
