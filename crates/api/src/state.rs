use mongodb::Database;
use rentora_config::Settings;
use rentora_services::{
    AuthService, NotificationService,
    booking::TransitionPolicy,
    dao::{
        access_token::AccessTokenDao, booking::BookingDao, guest::GuestDao,
        rental_unit::RentalUnitDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub units: Arc<RentalUnitDao>,
    pub guests: Arc<GuestDao>,
    pub bookings: Arc<BookingDao>,
    pub tokens: Arc<AccessTokenDao>,
    pub notifier: NotificationService,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let units = Arc::new(RentalUnitDao::new(&db));
        let guests = Arc::new(GuestDao::new(&db));
        let tokens = Arc::new(AccessTokenDao::new(&db));
        let bookings = Arc::new(BookingDao::new(
            &db,
            tokens.clone(),
            TransitionPolicy::from(&settings.booking),
        ));
        let notifier = NotificationService::new(&settings.notifications);

        Self {
            db,
            settings,
            auth,
            units,
            guests,
            bookings,
            tokens,
            notifier,
        }
    }
}
