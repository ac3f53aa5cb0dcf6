use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::DashboardStats;
use crate::services::records::AppointmentStore;

const LATEST_APPOINTMENTS: usize = 5;

/// Doctor-facing aggregates over the appointment records.
pub struct DashboardService {
    records: Arc<AppointmentStore>,
}

impl DashboardService {
    pub fn new(records: Arc<AppointmentStore>) -> Self {
        Self { records }
    }

    /// Earnings count every appointment whose fee the doctor keeps:
    /// completed visits plus settled payments, including payments retained
    /// through a cancellation.
    pub async fn stats(&self, doctor_id: Uuid) -> DashboardStats {
        let appointments = self.records.list_by_doctor(doctor_id).await;

        let earnings: u64 = appointments
            .iter()
            .filter(|a| a.status.counts_toward_earnings())
            .map(|a| u64::from(a.amount))
            .sum();

        let patients: HashSet<Uuid> = appointments.iter().map(|a| a.patient_id).collect();

        let mut latest_appointments = appointments.clone();
        latest_appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        latest_appointments.truncate(LATEST_APPOINTMENTS);

        DashboardStats {
            earnings,
            appointments: appointments.len(),
            patients: patients.len(),
            latest_appointments,
        }
    }
}
