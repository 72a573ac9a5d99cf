pub mod access;
pub mod auth;
pub mod booking;
pub mod dao;
pub mod error;
pub mod notify;

pub use auth::AuthService;
pub use dao::*;
pub use error::CoreError;
pub use notify::NotificationService;
