use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};
use crate::services::records::AppointmentStore;

/// Settles payment for an appointment through the mock gateway.
///
/// The gateway always settles; the real integration point is behind
/// `settle_with_gateway` so swapping in a provider later only touches
/// this service.
pub struct PaymentService {
    records: Arc<AppointmentStore>,
}

impl PaymentService {
    pub fn new(records: Arc<AppointmentStore>) -> Self {
        Self { records }
    }

    pub async fn pay(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        // Refuse before charging: cancelled, completed and already-paid
        // appointments never reach the gateway. `mark_paid` re-checks under
        // the lock, so a racing cancel still cannot slip a payment through.
        let appointment = self.records.get(appointment_id).await?;
        match appointment.status {
            AppointmentStatus::Pending => {}
            AppointmentStatus::Cancelled { .. } => return Err(AppointmentError::AlreadyCancelled),
            AppointmentStatus::Paid => return Err(AppointmentError::AlreadyPaid),
            AppointmentStatus::Completed { .. } => {
                return Err(AppointmentError::InvalidTransition(appointment.status))
            }
        }

        let transaction_id = self.settle_with_gateway(&appointment).await;

        let appointment = self.records.mark_paid(appointment_id).await?;

        info!(
            "Payment settled for appointment {} (amount {}, transaction {})",
            appointment.id, appointment.amount, transaction_id
        );
        Ok(appointment)
    }

    async fn settle_with_gateway(&self, appointment: &Appointment) -> Uuid {
        // Mock gateway: mint a transaction id and treat it as captured.
        let transaction_id = Uuid::new_v4();
        info!(
            "Mock gateway charged {} for appointment {}",
            appointment.amount, appointment.id
        );
        transaction_id
    }
}
