pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Booking lifecycle + per-booking token issuance
    let booking_routes = Router::new()
        .route("/", post(routes::booking::create))
        .route("/{booking_id}", get(routes::booking::get))
        .route("/{booking_id}/confirm", post(routes::booking::confirm))
        .route("/{booking_id}/check-in", post(routes::booking::check_in))
        .route("/{booking_id}/check-out", post(routes::booking::check_out))
        .route("/{booking_id}/complete", post(routes::booking::complete))
        .route("/{booking_id}/cancel", post(routes::booking::cancel))
        .route("/{booking_id}/payment", put(routes::booking::update_payment))
        .route(
            "/{booking_id}/token",
            get(routes::token::list).post(routes::token::issue),
        );

    // Per-unit calendar views
    let unit_routes = Router::new()
        .route("/{unit_id}/availability", get(routes::availability::check))
        .route("/{unit_id}/booking", get(routes::booking::list_for_unit));

    // Token-facing operations (gates, amenity readers)
    let token_routes = Router::new()
        .route("/{token_id}/revoke", post(routes::token::revoke))
        .route("/{token_id}/redeem", post(routes::token::redeem));

    Router::new()
        .route("/healthz", get(routes::health))
        .nest("/api/booking", booking_routes)
        .nest("/api/unit", unit_routes)
        .nest("/api/token", token_routes)
        .route("/api/stats/booking", get(routes::stats::bookings))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
