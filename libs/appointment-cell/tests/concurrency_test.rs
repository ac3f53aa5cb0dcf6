use std::sync::Arc;

use uuid::Uuid;

use appointment_cell::models::{AppointmentError, BookAppointmentRequest};
use appointment_cell::services::AppointmentCell;
use doctor_cell::models::RegisterDoctorRequest;
use doctor_cell::services::directory::DoctorDirectory;
use patient_cell::models::RegisterPatientRequest;
use patient_cell::services::registry::PatientRegistry;

async fn setup() -> (Arc<AppointmentCell>, Uuid, Vec<Uuid>) {
    let directory = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientRegistry::new());

    let doctor = directory
        .register(RegisterDoctorRequest {
            name: "Meredith".to_string(),
            email: "meredith@clinic.example".to_string(),
            specialty: "General physician".to_string(),
            about: None,
            image_url: None,
            address: None,
            fees: 100,
        })
        .await;

    let mut patient_ids = Vec::new();
    for n in 0..16 {
        let patient = patients
            .register(RegisterPatientRequest {
                name: format!("Patient {}", n),
                email: format!("patient{}@example.com", n),
                phone: None,
                date_of_birth: None,
                image_url: None,
            })
            .await;
        patient_ids.push(patient.id);
    }

    let cell = Arc::new(AppointmentCell::new(directory, patients));
    (cell, doctor.id, patient_ids)
}

fn request(doctor_id: Uuid) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        slot_date: "5_6_2026".parse().unwrap(),
        slot_time: "10:00 AM".parse().unwrap(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let (cell, doctor_id, patient_ids) = setup().await;

    let handles: Vec<_> = patient_ids
        .iter()
        .map(|&patient_id| {
            let cell = cell.clone();
            tokio::spawn(async move { cell.booking.book(patient_id, request(doctor_id)).await })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppointmentError::SlotTaken) => conflicts += 1,
            Err(e) => panic!("unexpected booking error: {:?}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(cell.records.list_by_doctor(doctor_id).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_cancels_of_one_appointment_admit_exactly_one() {
    let (cell, doctor_id, patient_ids) = setup().await;
    let owner = patient_ids[0];

    let appointment = cell.booking.book(owner, request(doctor_id)).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cell = cell.clone();
            let appointment_id = appointment.id;
            tokio::spawn(async move {
                cell.lifecycle.cancel_by_patient(owner, appointment_id).await
            })
        })
        .collect();

    let mut successes = 0;
    let mut already_cancelled = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppointmentError::AlreadyCancelled) => already_cancelled += 1,
            Err(e) => panic!("unexpected cancel error: {:?}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(already_cancelled, 7);

    // The slot came free exactly once and can be booked again.
    assert!(cell
        .booking
        .book(patient_ids[1], request(doctor_id))
        .await
        .is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_payment_and_cancellation_never_lose_the_payment() {
    let (cell, doctor_id, patient_ids) = setup().await;
    let owner = patient_ids[0];

    let appointment = cell.booking.book(owner, request(doctor_id)).await.unwrap();

    let pay = {
        let cell = cell.clone();
        let id = appointment.id;
        tokio::spawn(async move { cell.payments.pay(id).await })
    };
    let cancel = {
        let cell = cell.clone();
        let id = appointment.id;
        tokio::spawn(async move { cell.lifecycle.cancel_by_patient(owner, id).await })
    };

    let pay_result = pay.await.unwrap();
    let cancel_result = cancel.await.unwrap();

    let record = cell.records.get(appointment.id).await.unwrap();
    match (pay_result, cancel_result) {
        // Payment settled first: the cancellation keeps it on the record.
        (Ok(_), Ok(cancelled)) => {
            assert!(cancelled.status.is_paid());
            assert!(record.status.is_paid());
        }
        // Cancellation won: the payment must have been refused.
        (Err(AppointmentError::AlreadyCancelled), Ok(_)) => {
            assert!(!record.status.is_paid());
        }
        (pay_result, cancel_result) => {
            panic!("unexpected outcome: {:?} / {:?}", pay_result, cancel_result)
        }
    }
    assert!(record.status.is_cancelled());
}
