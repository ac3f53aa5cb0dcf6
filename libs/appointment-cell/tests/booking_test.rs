use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentError, AppointmentStatus, BookAppointmentRequest, SlotDate, TimeLabel,
};
use appointment_cell::services::AppointmentCell;
use doctor_cell::models::{Doctor, RegisterDoctorRequest, UpdateDoctorProfileRequest};
use doctor_cell::services::directory::DoctorDirectory;
use patient_cell::models::{Patient, RegisterPatientRequest};
use patient_cell::services::registry::PatientRegistry;

struct TestContext {
    directory: Arc<DoctorDirectory>,
    patients: Arc<PatientRegistry>,
    cell: AppointmentCell,
}

fn setup() -> TestContext {
    let directory = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientRegistry::new());
    let cell = AppointmentCell::new(directory.clone(), patients.clone());
    TestContext {
        directory,
        patients,
        cell,
    }
}

async fn register_doctor(directory: &DoctorDirectory, name: &str, fees: u32) -> Doctor {
    directory
        .register(RegisterDoctorRequest {
            name: name.to_string(),
            email: format!("{}@clinic.example", name.to_lowercase()),
            specialty: "General physician".to_string(),
            about: None,
            image_url: None,
            address: None,
            fees,
        })
        .await
}

async fn register_patient(patients: &PatientRegistry, name: &str) -> Patient {
    patients
        .register(RegisterPatientRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            date_of_birth: None,
            image_url: None,
        })
        .await
}

fn slot(date: &str, time: &str) -> (SlotDate, TimeLabel) {
    (date.parse().unwrap(), time.parse().unwrap())
}

fn book_request(doctor_id: Uuid, date: &str, time: &str) -> BookAppointmentRequest {
    let (slot_date, slot_time) = slot(date, time);
    BookAppointmentRequest {
        doctor_id,
        slot_date,
        slot_time,
    }
}

#[tokio::test]
async fn booking_reserves_the_slot_and_records_the_appointment() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let patient = register_patient(&ctx.patients, "Ada").await;

    let appointment = ctx
        .cell
        .booking
        .book(patient.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
        .await
        .unwrap();

    assert_eq!(appointment.doctor_id, doctor.id);
    assert_eq!(appointment.patient_id, patient.id);
    assert_eq!(appointment.amount, 100);
    assert_eq!(appointment.status, AppointmentStatus::Pending);

    let (date, time) = slot("5_6_2026", "10:00 AM");
    assert!(ctx.cell.ledger.is_booked(doctor.id, &date, &time).await);

    let fetched = ctx.cell.records.get(appointment.id).await.unwrap();
    assert_eq!(fetched.slot_date, date);
    assert_eq!(fetched.slot_time, time);
}

#[tokio::test]
async fn second_booking_for_same_slot_is_refused() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let ada = register_patient(&ctx.patients, "Ada").await;
    let grace = register_patient(&ctx.patients, "Grace").await;

    ctx.cell
        .booking
        .book(ada.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
        .await
        .unwrap();

    assert_matches!(
        ctx.cell
            .booking
            .book(grace.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
            .await,
        Err(AppointmentError::SlotTaken)
    );

    // Only the first booking left a record.
    assert_eq!(ctx.cell.records.list_by_doctor(doctor.id).await.len(), 1);
}

#[tokio::test]
async fn adjacent_slots_do_not_conflict() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let patient = register_patient(&ctx.patients, "Ada").await;

    ctx.cell
        .booking
        .book(patient.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
        .await
        .unwrap();

    assert!(ctx
        .cell
        .booking
        .book(patient.id, book_request(doctor.id, "5_6_2026", "10:30 AM"))
        .await
        .is_ok());
    assert!(ctx
        .cell
        .booking
        .book(patient.id, book_request(doctor.id, "6_6_2026", "10:00 AM"))
        .await
        .is_ok());
}

#[tokio::test]
async fn unavailable_doctor_cannot_be_booked_and_no_slot_is_held() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let patient = register_patient(&ctx.patients, "Ada").await;

    ctx.directory.set_availability(doctor.id, false).await.unwrap();

    assert_matches!(
        ctx.cell
            .booking
            .book(patient.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
            .await,
        Err(AppointmentError::DoctorUnavailable)
    );

    let (date, time) = slot("5_6_2026", "10:00 AM");
    assert!(!ctx.cell.ledger.is_booked(doctor.id, &date, &time).await);
    assert!(ctx.cell.records.list_by_doctor(doctor.id).await.is_empty());
}

#[tokio::test]
async fn unknown_doctor_or_patient_is_refused_without_reserving() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let patient = register_patient(&ctx.patients, "Ada").await;

    assert_matches!(
        ctx.cell
            .booking
            .book(patient.id, book_request(Uuid::new_v4(), "5_6_2026", "10:00 AM"))
            .await,
        Err(AppointmentError::DoctorNotFound)
    );

    assert_matches!(
        ctx.cell
            .booking
            .book(Uuid::new_v4(), book_request(doctor.id, "5_6_2026", "10:00 AM"))
            .await,
        Err(AppointmentError::PatientNotFound)
    );

    // The failed attempts must not strand a reservation.
    let (date, time) = slot("5_6_2026", "10:00 AM");
    assert!(!ctx.cell.ledger.is_booked(doctor.id, &date, &time).await);
    assert!(ctx
        .cell
        .booking
        .book(patient.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
        .await
        .is_ok());
}

#[tokio::test]
async fn booking_freezes_fee_and_snapshots_at_booking_time() {
    let ctx = setup();
    let doctor = register_doctor(&ctx.directory, "Meredith", 100).await;
    let patient = register_patient(&ctx.patients, "Ada").await;

    let appointment = ctx
        .cell
        .booking
        .book(patient.id, book_request(doctor.id, "5_6_2026", "10:00 AM"))
        .await
        .unwrap();

    // Raising the fee afterwards does not touch the existing record.
    ctx.directory
        .update_profile(
            doctor.id,
            UpdateDoctorProfileRequest {
                fees: Some(250),
                address: None,
                about: None,
                available: None,
            },
        )
        .await
        .unwrap();

    let fetched = ctx.cell.records.get(appointment.id).await.unwrap();
    assert_eq!(fetched.amount, 100);
    assert_eq!(fetched.doctor_snapshot.fees, 100);
    assert_eq!(fetched.doctor_snapshot.name, "Meredith");
    assert_eq!(fetched.patient_snapshot.name, "Ada");
}
