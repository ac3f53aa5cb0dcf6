use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::AppointmentCell;

/// Every appointment route requires an authenticated principal; per-record
/// authorization happens in the handlers.
pub fn appointment_routes(config: Arc<AppConfig>, cell: Arc<AppointmentCell>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route(
            "/{appointment_id}/cancel-by-doctor",
            post(handlers::cancel_appointment_by_doctor),
        )
        .route(
            "/{appointment_id}/complete",
            post(handlers::complete_appointment),
        )
        .route("/{appointment_id}/pay", post(handlers::pay_appointment))
        .route(
            "/patients/{patient_id}",
            get(handlers::list_patient_appointments),
        )
        .route(
            "/doctors/{doctor_id}",
            get(handlers::list_doctor_appointments),
        )
        .route(
            "/doctors/{doctor_id}/slots",
            get(handlers::doctor_booked_slots),
        )
        .route(
            "/doctors/{doctor_id}/dashboard",
            get(handlers::doctor_dashboard),
        )
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(cell)
}
