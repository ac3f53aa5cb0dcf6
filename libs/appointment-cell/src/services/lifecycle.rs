use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError};
use crate::services::ledger::SlotLedger;
use crate::services::records::AppointmentStore;

/// Cancellation and completion of booked appointments.
///
/// Cancelling releases the slot so it can be booked again; completing
/// leaves the slot occupied, since the visit happened.
pub struct LifecycleService {
    records: Arc<AppointmentStore>,
    ledger: Arc<SlotLedger>,
}

impl LifecycleService {
    pub fn new(records: Arc<AppointmentStore>, ledger: Arc<SlotLedger>) -> Self {
        Self { records, ledger }
    }

    /// Cancel on behalf of the patient who booked. Anyone else is refused
    /// before the state is touched.
    pub async fn cancel_by_patient(
        &self,
        patient_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.records.get(appointment_id).await?;
        if appointment.patient_id != patient_id {
            return Err(AppointmentError::Unauthorized);
        }

        let appointment = self.records.mark_cancelled(appointment_id).await?;
        self.release_slot(&appointment).await;

        info!(
            "Appointment {} cancelled by patient {}",
            appointment.id, patient_id
        );
        Ok(appointment)
    }

    /// Cancel on behalf of the doctor who holds the appointment.
    pub async fn cancel_by_doctor(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.records.get(appointment_id).await?;
        if appointment.doctor_id != doctor_id {
            return Err(AppointmentError::Unauthorized);
        }

        let appointment = self.records.mark_cancelled(appointment_id).await?;
        self.release_slot(&appointment).await;

        info!(
            "Appointment {} cancelled by doctor {}",
            appointment.id, doctor_id
        );
        Ok(appointment)
    }

    /// Mark the visit as completed. Only the appointment's doctor may do
    /// this, and the slot stays occupied.
    pub async fn complete(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.records.get(appointment_id).await?;
        if appointment.doctor_id != doctor_id {
            return Err(AppointmentError::Unauthorized);
        }

        let appointment = self.records.mark_completed(appointment_id).await?;

        info!(
            "Appointment {} completed by doctor {}",
            appointment.id, doctor_id
        );
        Ok(appointment)
    }

    async fn release_slot(&self, appointment: &Appointment) {
        self.ledger
            .release(
                appointment.doctor_id,
                &appointment.slot_date,
                &appointment.slot_time,
            )
            .await;
    }
}
