use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("slot is already booked")]
    SlotTaken,
}

/// Per-doctor record of booked slots, keyed by date and time label.
///
/// Slot state is held here rather than inside the doctor profile document,
/// so the reserve/release read-modify-write contends only on this store.
/// `try_reserve` is a conditional update under a single write-lock
/// acquisition: a time label is inserted only if absent, which is what
/// keeps two racing bookings for the same slot from both succeeding.
pub struct SlotLedgerStore {
    slots: RwLock<HashMap<Uuid, BTreeMap<String, BTreeSet<String>>>>,
}

impl SlotLedgerStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Reserve `time` under `date` for the doctor, creating the date entry
    /// if absent. Fails with `SlotTaken` when the label is already present.
    pub async fn try_reserve(
        &self,
        doctor_id: Uuid,
        date: &str,
        time: &str,
    ) -> Result<(), StoreError> {
        let mut slots = self.slots.write().await;
        let booked = slots
            .entry(doctor_id)
            .or_default()
            .entry(date.to_string())
            .or_default();

        if !booked.insert(time.to_string()) {
            return Err(StoreError::SlotTaken);
        }

        debug!("Reserved slot {} {} for doctor {}", date, time, doctor_id);
        Ok(())
    }

    /// Remove `time` from the date's set. Idempotent: releasing an absent
    /// slot is a no-op. A date whose set empties is pruned entirely.
    pub async fn release(&self, doctor_id: Uuid, date: &str, time: &str) {
        let mut slots = self.slots.write().await;
        let Some(ledger) = slots.get_mut(&doctor_id) else {
            return;
        };
        let Some(booked) = ledger.get_mut(date) else {
            return;
        };

        if booked.remove(time) {
            debug!("Released slot {} {} for doctor {}", date, time, doctor_id);
        }
        if booked.is_empty() {
            ledger.remove(date);
        }
        if ledger.is_empty() {
            slots.remove(&doctor_id);
        }
    }

    pub async fn is_booked(&self, doctor_id: Uuid, date: &str, time: &str) -> bool {
        self.slots
            .read()
            .await
            .get(&doctor_id)
            .and_then(|ledger| ledger.get(date))
            .is_some_and(|booked| booked.contains(time))
    }

    /// Snapshot of the doctor's booked slots, date-ordered.
    pub async fn booked(&self, doctor_id: Uuid) -> BTreeMap<String, BTreeSet<String>> {
        self.slots
            .read()
            .await
            .get(&doctor_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for SlotLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
