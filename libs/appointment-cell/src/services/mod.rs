use std::sync::Arc;

use doctor_cell::services::directory::DoctorDirectory;
use patient_cell::services::registry::PatientRegistry;

pub mod booking;
pub mod dashboard;
pub mod ledger;
pub mod lifecycle;
pub mod payment;
pub mod records;

use booking::BookingService;
use dashboard::DashboardService;
use ledger::SlotLedger;
use lifecycle::LifecycleService;
use payment::PaymentService;
use records::AppointmentStore;

/// The appointment cell's service graph, wired over one shared record
/// store and one shared slot ledger.
pub struct AppointmentCell {
    pub booking: BookingService,
    pub lifecycle: LifecycleService,
    pub payments: PaymentService,
    pub dashboard: DashboardService,
    pub records: Arc<AppointmentStore>,
    pub ledger: Arc<SlotLedger>,
}

impl AppointmentCell {
    pub fn new(directory: Arc<DoctorDirectory>, patients: Arc<PatientRegistry>) -> Self {
        let records = Arc::new(AppointmentStore::new());
        let ledger = Arc::new(SlotLedger::new());

        Self {
            booking: BookingService::new(
                directory,
                patients,
                ledger.clone(),
                records.clone(),
            ),
            lifecycle: LifecycleService::new(records.clone(), ledger.clone()),
            payments: PaymentService::new(records.clone()),
            dashboard: DashboardService::new(records.clone()),
            records,
            ledger,
        }
    }
}
