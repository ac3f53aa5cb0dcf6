use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::services::directory::DoctorDirectory;
use patient_cell::services::registry::PatientRegistry;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest, DoctorSnapshot,
    PatientSnapshot,
};
use crate::services::ledger::SlotLedger;
use crate::services::records::AppointmentStore;

/// Books appointments against the slot ledger.
///
/// Everything that can fail is checked before the slot is reserved;
/// once `try_reserve` succeeds, writing the appointment record cannot
/// fail, so a reserved slot always has a matching record.
pub struct BookingService {
    directory: Arc<DoctorDirectory>,
    patients: Arc<PatientRegistry>,
    ledger: Arc<SlotLedger>,
    records: Arc<AppointmentStore>,
}

impl BookingService {
    pub fn new(
        directory: Arc<DoctorDirectory>,
        patients: Arc<PatientRegistry>,
        ledger: Arc<SlotLedger>,
        records: Arc<AppointmentStore>,
    ) -> Self {
        Self {
            directory,
            patients,
            ledger,
            records,
        }
    }

    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking request: patient {} -> doctor {} at {} {}",
            patient_id, request.doctor_id, request.slot_date, request.slot_time
        );

        // Step 1: the doctor must exist and be taking appointments.
        let doctor = self
            .directory
            .get(request.doctor_id)
            .await
            .map_err(|_| AppointmentError::DoctorNotFound)?;

        if !doctor.available {
            return Err(AppointmentError::DoctorUnavailable);
        }

        // Step 2: resolve the patient up front, so nothing fallible runs
        // between reserving the slot and writing the record.
        let patient = self
            .patients
            .get(patient_id)
            .await
            .map_err(|_| AppointmentError::PatientNotFound)?;

        // Step 3: claim the slot. Exactly one of any set of concurrent
        // bookings for the same slot gets past this line.
        self.ledger
            .try_reserve(doctor.id, &request.slot_date, &request.slot_time)
            .await?;

        // Step 4: record the appointment with snapshots frozen at booking
        // time and the doctor's current fee as the amount due.
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            patient_snapshot: PatientSnapshot::from(&patient),
            doctor_snapshot: DoctorSnapshot::from(&doctor),
            slot_date: request.slot_date,
            slot_time: request.slot_time,
            amount: doctor.fees,
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        };

        self.records.create(appointment.clone()).await;

        info!(
            "Booked appointment {}: patient {} with doctor {} at {} {}",
            appointment.id,
            appointment.patient_id,
            appointment.doctor_id,
            appointment.slot_date,
            appointment.slot_time
        );

        Ok(appointment)
    }
}
