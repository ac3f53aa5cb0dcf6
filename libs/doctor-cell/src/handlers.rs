use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{DoctorError, DoctorProfile, UpdateDoctorProfileRequest};
use crate::services::directory::DoctorDirectory;

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
    }
}

/// Only the doctor themselves or an admin may manage a roster entry.
fn authorize_doctor(user: &AuthUser, doctor_id: Uuid) -> Result<(), AppError> {
    let is_self = user.is_doctor() && user.id == doctor_id.to_string();
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to manage this doctor".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
) -> Result<Json<Value>, AppError> {
    let doctors = directory.list_available().await;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.get(doctor_id).await.map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": DoctorProfile::from(&doctor)
    })))
}

#[axum::debug_handler]
pub async fn toggle_availability(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    authorize_doctor(&user, doctor_id)?;

    let doctor = directory
        .toggle_availability(doctor_id)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "available": doctor.available,
        "message": "Availability changed"
    })))
}

#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateDoctorProfileRequest>,
) -> Result<Json<Value>, AppError> {
    authorize_doctor(&user, doctor_id)?;

    let doctor = directory
        .update_profile(doctor_id, request)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({
        "success": true,
        "doctor": DoctorProfile::from(&doctor),
        "message": "Profile updated"
    })))
}
