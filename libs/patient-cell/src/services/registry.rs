use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{Patient, PatientError, RegisterPatientRequest, UpdatePatientRequest};

/// Read side of the identity collaborator: the booking engine only ever
/// needs `get` to snapshot display data at booking time.
pub struct PatientRegistry {
    patients: Collection<Patient>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self {
            patients: Collection::new(),
        }
    }

    pub async fn get(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.patients
            .get(patient_id)
            .await
            .ok_or(PatientError::NotFound)
    }

    pub async fn register(&self, request: RegisterPatientRequest) -> Patient {
        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            image_url: request.image_url,
            created_at: now,
            updated_at: now,
        };

        self.patients.insert(patient.id, patient.clone()).await;
        debug!("Registered patient {}", patient.id);
        patient
    }

    pub async fn update_profile(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        self.patients
            .update(patient_id, |patient| {
                if let Some(name) = request.name.clone() {
                    patient.name = name;
                }
                if let Some(phone) = request.phone.clone() {
                    patient.phone = Some(phone);
                }
                if let Some(dob) = request.date_of_birth {
                    patient.date_of_birth = Some(dob);
                }
                if let Some(image_url) = request.image_url.clone() {
                    patient.image_url = Some(image_url);
                }
                patient.updated_at = Utc::now();
            })
            .await
            .ok_or(PatientError::NotFound)
    }
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
