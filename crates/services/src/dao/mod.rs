pub mod access_token;
pub mod base;
pub mod booking;
pub mod guest;
pub mod rental_unit;

pub use access_token::{AccessTokenDao, NewAccessToken};
pub use base::BaseDao;
pub use booking::{BookingDao, NewBooking};
pub use guest::GuestDao;
pub use rental_unit::RentalUnitDao;
