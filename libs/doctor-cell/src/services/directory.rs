use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{Doctor, DoctorError, DoctorProfile, RegisterDoctorRequest, UpdateDoctorProfileRequest};

/// Roster of doctors. Slot state is deliberately not part of the doctor
/// record; it lives in the appointment cell's ledger so that profile edits
/// and bookings never contend on the same row.
pub struct DoctorDirectory {
    doctors: Collection<Doctor>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self {
            doctors: Collection::new(),
        }
    }

    pub async fn get(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.doctors
            .get(doctor_id)
            .await
            .ok_or(DoctorError::NotFound)
    }

    pub async fn register(&self, request: RegisterDoctorRequest) -> Doctor {
        let now = Utc::now();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            specialty: request.specialty,
            about: request.about,
            image_url: request.image_url,
            address: request.address,
            fees: request.fees,
            available: true,
            created_at: now,
            updated_at: now,
        };

        self.doctors.insert(doctor.id, doctor.clone()).await;
        info!("Registered doctor {} ({})", doctor.id, doctor.specialty);
        doctor
    }

    pub async fn set_availability(
        &self,
        doctor_id: Uuid,
        available: bool,
    ) -> Result<Doctor, DoctorError> {
        let updated = self
            .doctors
            .update(doctor_id, |doctor| {
                doctor.available = available;
                doctor.updated_at = Utc::now();
            })
            .await
            .ok_or(DoctorError::NotFound)?;

        debug!("Doctor {} availability set to {}", doctor_id, available);
        Ok(updated)
    }

    /// Flip the availability flag, returning the updated record.
    pub async fn toggle_availability(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let updated = self
            .doctors
            .update(doctor_id, |doctor| {
                doctor.available = !doctor.available;
                doctor.updated_at = Utc::now();
            })
            .await
            .ok_or(DoctorError::NotFound)?;

        debug!("Doctor {} availability toggled to {}", doctor_id, updated.available);
        Ok(updated)
    }

    pub async fn update_profile(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorProfileRequest,
    ) -> Result<Doctor, DoctorError> {
        self.doctors
            .update(doctor_id, |doctor| {
                if let Some(fees) = request.fees {
                    doctor.fees = fees;
                }
                if let Some(address) = request.address.clone() {
                    doctor.address = Some(address);
                }
                if let Some(about) = request.about.clone() {
                    doctor.about = Some(about);
                }
                if let Some(available) = request.available {
                    doctor.available = available;
                }
                doctor.updated_at = Utc::now();
            })
            .await
            .ok_or(DoctorError::NotFound)
    }

    /// Public listing with contact fields stripped, name-ordered.
    pub async fn list_available(&self) -> Vec<DoctorProfile> {
        let mut profiles: Vec<DoctorProfile> = self
            .doctors
            .find(|doctor| doctor.available)
            .await
            .iter()
            .map(DoctorProfile::from)
            .collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }

    pub async fn list_all(&self) -> Vec<DoctorProfile> {
        let mut profiles: Vec<DoctorProfile> = self
            .doctors
            .all()
            .await
            .iter()
            .map(DoctorProfile::from)
            .collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new()
    }
}
