use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::directory::DoctorDirectory;

pub fn doctor_routes(config: Arc<AppConfig>, directory: Arc<DoctorDirectory>) -> Router {
    // Listing and profile reads are public; roster management requires a
    // doctor or admin principal.
    let public_routes = Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor));

    let protected_routes = Router::new()
        .route("/{doctor_id}", patch(handlers::update_doctor_profile))
        .route("/{doctor_id}/availability", post(handlers::toggle_availability))
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(directory)
}
