use uuid::Uuid;

use shared_store::{SlotLedgerStore, StoreError};

use crate::models::{AppointmentError, SlotDate, TimeLabel};

/// Typed facade over the raw slot ledger: callers work with validated
/// dates and time labels, the store keys on their canonical strings.
pub struct SlotLedger {
    store: SlotLedgerStore,
}

impl SlotLedger {
    pub fn new() -> Self {
        Self {
            store: SlotLedgerStore::new(),
        }
    }

    pub async fn try_reserve(
        &self,
        doctor_id: Uuid,
        date: &SlotDate,
        time: &TimeLabel,
    ) -> Result<(), AppointmentError> {
        self.store
            .try_reserve(doctor_id, &date.to_string(), time.as_str())
            .await
            .map_err(|e| match e {
                StoreError::SlotTaken => AppointmentError::SlotTaken,
            })
    }

    pub async fn release(&self, doctor_id: Uuid, date: &SlotDate, time: &TimeLabel) {
        self.store
            .release(doctor_id, &date.to_string(), time.as_str())
            .await;
    }

    pub async fn is_booked(&self, doctor_id: Uuid, date: &SlotDate, time: &TimeLabel) -> bool {
        self.store
            .is_booked(doctor_id, &date.to_string(), time.as_str())
            .await
    }

    pub async fn booked(
        &self,
        doctor_id: Uuid,
    ) -> std::collections::BTreeMap<String, std::collections::BTreeSet<String>> {
        self.store.booked(doctor_id).await
    }
}

impl Default for SlotLedger {
    fn default() -> Self {
        Self::new()
    }
}
