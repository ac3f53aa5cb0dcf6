use uuid::Uuid;

use shared_store::Collection;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// Appointment records keyed by id.
///
/// State transitions run inside `Collection::try_update` so the guard and
/// the write happen under one lock acquisition; two racing transitions
/// cannot both observe the pre-transition state.
pub struct AppointmentStore {
    appointments: Collection<Appointment>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self {
            appointments: Collection::new(),
        }
    }

    pub async fn create(&self, appointment: Appointment) {
        self.appointments
            .insert(appointment.id, appointment)
            .await;
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .get(id)
            .await
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .appointments
            .find(|a| a.patient_id == patient_id)
            .await;
        appointments.sort_by_key(|a| a.created_at);
        appointments
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .appointments
            .find(|a| a.doctor_id == doctor_id)
            .await;
        appointments.sort_by_key(|a| a.created_at);
        appointments
    }

    /// Move the appointment into `Cancelled`, preserving payment state.
    pub async fn mark_cancelled(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .try_update(id, |appointment| match appointment.status {
                AppointmentStatus::Cancelled { .. } => Err(AppointmentError::AlreadyCancelled),
                AppointmentStatus::Completed { .. } => {
                    Err(AppointmentError::InvalidTransition(appointment.status))
                }
                AppointmentStatus::Pending => {
                    appointment.status = AppointmentStatus::Cancelled { paid: false };
                    Ok(())
                }
                AppointmentStatus::Paid => {
                    appointment.status = AppointmentStatus::Cancelled { paid: true };
                    Ok(())
                }
            })
            .await
            .ok_or(AppointmentError::NotFound)?
    }

    /// Move the appointment into `Completed`, preserving payment state.
    pub async fn mark_completed(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .try_update(id, |appointment| match appointment.status {
                AppointmentStatus::Cancelled { .. } | AppointmentStatus::Completed { .. } => {
                    Err(AppointmentError::InvalidTransition(appointment.status))
                }
                AppointmentStatus::Pending => {
                    appointment.status = AppointmentStatus::Completed { paid: false };
                    Ok(())
                }
                AppointmentStatus::Paid => {
                    appointment.status = AppointmentStatus::Completed { paid: true };
                    Ok(())
                }
            })
            .await
            .ok_or(AppointmentError::NotFound)?
    }

    /// Record a settled payment on a pending appointment.
    pub async fn mark_paid(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .try_update(id, |appointment| match appointment.status {
                AppointmentStatus::Cancelled { .. } => Err(AppointmentError::AlreadyCancelled),
                AppointmentStatus::Paid => Err(AppointmentError::AlreadyPaid),
                AppointmentStatus::Completed { .. } => {
                    Err(AppointmentError::InvalidTransition(appointment.status))
                }
                AppointmentStatus::Pending => {
                    appointment.status = AppointmentStatus::Paid;
                    Ok(())
                }
            })
            .await
            .ok_or(AppointmentError::NotFound)?
    }
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}
