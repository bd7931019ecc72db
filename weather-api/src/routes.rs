//! Route definitions

use axum::{Router, routing::get};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{error::panic_response, handlers, state::AppState};

/// Create the router with all routes and middleware attached.
pub fn create_router(state: AppState) -> Router {
    let weather = Router::new()
        .route("/cities", get(handlers::forecast_for_cities))
        .route("/location", get(handlers::forecast_by_location))
        .route("/{city}/details", get(handlers::conditions))
        .route("/cities/current", get(handlers::current_for_cities))
        .route("/{city}/units", get(handlers::current_with_units))
        .route("/{city}/sun", get(handlers::sun_times))
        .route("/{city}/stats", get(handlers::temperature_stats))
        .route("/{city}/daily", get(handlers::daily_forecast))
        .route("/zipcode/{zipcode}", get(handlers::current_by_zipcode))
        .route("/{city}", get(handlers::current_by_city));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/weather", weather)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
