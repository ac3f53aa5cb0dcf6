use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::AppointmentCell;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::directory::DoctorDirectory;
use patient_cell::services::registry::PatientRegistry;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let directory = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientRegistry::new());
    let cell = Arc::new(AppointmentCell::new(directory.clone(), patients.clone()));

    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/doctors", doctor_routes(config.clone(), directory))
        .nest("/appointments", appointment_routes(config, cell))
}
