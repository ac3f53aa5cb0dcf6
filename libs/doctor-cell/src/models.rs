use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full roster record. Credentials are held by the identity collaborator;
/// only profile and scheduling-relevant fields live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub about: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
    /// Consultation fee; copied onto every appointment at booking time.
    pub fees: u32,
    /// Toggled by the doctor; bookings are rejected while false.
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a doctor with contact fields stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub about: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
    pub fees: u32,
    pub available: bool,
}

impl From<&Doctor> for DoctorProfile {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            about: doctor.about.clone(),
            image_url: doctor.image_url.clone(),
            address: doctor.address.clone(),
            fees: doctor.fees,
            available: doctor.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub about: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
    pub fees: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorProfileRequest {
    pub fees: Option<u32>,
    pub address: Option<String>,
    pub about: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,
}
