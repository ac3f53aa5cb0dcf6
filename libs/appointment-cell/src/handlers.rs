use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::AppointmentCell;

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound
        | AppointmentError::DoctorNotFound
        | AppointmentError::PatientNotFound => AppError::NotFound(e.to_string()),
        AppointmentError::DoctorUnavailable => AppError::BadRequest(e.to_string()),
        AppointmentError::SlotTaken
        | AppointmentError::AlreadyCancelled
        | AppointmentError::AlreadyPaid
        | AppointmentError::InvalidTransition(_) => AppError::Conflict(e.to_string()),
        AppointmentError::Unauthorized => AppError::Forbidden(e.to_string()),
        AppointmentError::InvalidSlot(_) => AppError::ValidationError(e.to_string()),
    }
}

/// Token subjects are opaque strings; appointment records key on UUIDs.
fn principal_id(user: &AuthUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Invalid principal in token".to_string()))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = principal_id(&user)?;

    let appointment = cell
        .booking
        .book(patient_id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = cell
        .records
        .get(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    // Visible to its patient, its doctor, or an admin.
    let principal = principal_id(&user)?;
    let involved = principal == appointment.patient_id || principal == appointment.doctor_id;
    if !involved && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this appointment".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient_id = principal_id(&user)?;

    let appointment = cell
        .lifecycle
        .cancel_by_patient(patient_id, appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment_by_doctor(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Doctor credentials required".to_string(),
        ));
    }
    let doctor_id = principal_id(&user)?;

    let appointment = cell
        .lifecycle
        .cancel_by_doctor(doctor_id, appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Doctor credentials required".to_string(),
        ));
    }
    let doctor_id = principal_id(&user)?;

    let appointment = cell
        .lifecycle
        .complete(doctor_id, appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment completed"
    })))
}

#[axum::debug_handler]
pub async fn pay_appointment(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    // Payment is patient-initiated; the record must belong to the caller.
    let patient_id = principal_id(&user)?;
    let appointment = cell
        .records
        .get(appointment_id)
        .await
        .map_err(map_appointment_error)?;
    if appointment.patient_id != patient_id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to pay for this appointment".to_string(),
        ));
    }

    let appointment = cell
        .payments
        .pay(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Payment successful"
    })))
}

#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let principal = principal_id(&user)?;
    if principal != patient_id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these appointments".to_string(),
        ));
    }

    let appointments = cell.records.list_by_patient(patient_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let principal = principal_id(&user)?;
    let is_self = user.is_doctor() && principal == doctor_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these appointments".to_string(),
        ));
    }

    let appointments = cell.records.list_by_doctor(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

/// Booked-slot map for the slot picker. Authenticated but not restricted:
/// any signed-in patient needs it to see what is already taken.
#[axum::debug_handler]
pub async fn doctor_booked_slots(
    State(cell): State<Arc<AppointmentCell>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booked = cell.ledger.booked(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "slots_booked": booked
    })))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    State(cell): State<Arc<AppointmentCell>>,
    Extension(user): Extension<AuthUser>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let principal = principal_id(&user)?;
    let is_self = user.is_doctor() && principal == doctor_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this dashboard".to_string(),
        ));
    }

    let stats = cell.dashboard.stats(doctor_id).await;

    Ok(Json(json!({
        "success": true,
        "dashboard": stats
    })))
}
