// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use patient_cell::models::Patient;

// ==============================================================================
// SLOT KEYS
// ==============================================================================

/// Calendar date of a slot, carried on the wire as `D_M_YYYY` (1-based
/// month, no zero padding). The underscore format is kept for
/// compatibility with the existing frontend client rather than upgrading
/// to ISO-8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotDate(NaiveDate);

impl SlotDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SlotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.0.day(), self.0.month(), self.0.year())
    }
}

impl FromStr for SlotDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid slot date '{}': expected D_M_YYYY", s));
        }

        let day: u32 = parts[0]
            .parse()
            .map_err(|_| format!("Invalid day in slot date '{}'", s))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid month in slot date '{}'", s))?;
        let year: i32 = parts[2]
            .parse()
            .map_err(|_| format!("Invalid year in slot date '{}'", s))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(SlotDate)
            .ok_or_else(|| format!("Invalid calendar date '{}'", s))
    }
}

impl TryFrom<String> for SlotDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotDate> for String {
    fn from(value: SlotDate) -> Self {
        value.to_string()
    }
}

/// 12-hour clock label for a slot ("10:00 AM"). Validated on the way in
/// and canonicalized so that "1:00 PM" and "01:00 PM" key the same slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeLabel(String);

impl TimeLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveTime::parse_from_str(s.trim(), "%I:%M %p")
            .map_err(|_| format!("Invalid time label '{}': expected e.g. \"10:00 AM\"", s))?;
        Ok(TimeLabel(parsed.format("%I:%M %p").to_string()))
    }
}

impl TryFrom<String> for TimeLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeLabel> for String {
    fn from(value: TimeLabel) -> Self {
        value.0
    }
}

// ==============================================================================
// APPOINTMENT STATE
// ==============================================================================

/// Appointment lifecycle as a single tagged state. `Completed` and
/// `Cancelled` are terminal; both remember whether the visit was paid, so
/// a paid-then-cancelled appointment keeps its payment record (there is no
/// refund path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Paid,
    Completed { paid: bool },
    Cancelled { paid: bool },
}

impl AppointmentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Paid
                | AppointmentStatus::Completed { paid: true }
                | AppointmentStatus::Cancelled { paid: true }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AppointmentStatus::Completed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        self.is_cancelled() || self.is_completed()
    }

    /// Whether the appointment's amount counts toward doctor earnings:
    /// completed visits and settled payments, including payments retained
    /// through a cancellation.
    pub fn counts_toward_earnings(&self) -> bool {
        match self {
            AppointmentStatus::Pending => false,
            AppointmentStatus::Paid => true,
            AppointmentStatus::Completed { .. } => true,
            AppointmentStatus::Cancelled { paid } => *paid,
        }
    }

    /// The permitted one-way transitions. Payment state is carried
    /// forward, never invented and never cleared.
    pub fn can_transition(&self, next: &AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Completed { paid: false })
                | (Pending, Cancelled { paid: false })
                | (Paid, Completed { paid: true })
                | (Paid, Cancelled { paid: true })
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Paid => write!(f, "paid"),
            AppointmentStatus::Completed { .. } => write!(f, "completed"),
            AppointmentStatus::Cancelled { .. } => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// SNAPSHOTS
// ==============================================================================

/// Doctor display data frozen into the appointment at booking time,
/// deliberately decoupled from later profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub fees: u32,
    pub image_url: Option<String>,
    pub address: Option<String>,
}

impl From<&Doctor> for DoctorSnapshot {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            fees: doctor.fees,
            image_url: doctor.image_url.clone(),
            address: doctor.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub image_url: Option<String>,
}

impl From<&Patient> for PatientSnapshot {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            date_of_birth: patient.date_of_birth,
            image_url: patient.image_url.clone(),
        }
    }
}

// ==============================================================================
// APPOINTMENT RECORD
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_snapshot: PatientSnapshot,
    pub doctor_snapshot: DoctorSnapshot,
    pub slot_date: SlotDate,
    pub slot_time: TimeLabel,
    /// Doctor fee at booking time.
    pub amount: u32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub slot_date: SlotDate,
    pub slot_time: TimeLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub earnings: u64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not available")]
    DoctorUnavailable,

    #[error("Slot not available")]
    SlotTaken,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Appointment already paid")]
    AlreadyPaid,

    #[error("Unauthorized action")]
    Unauthorized,

    #[error("Appointment cannot be modified in current state: {0}")]
    InvalidTransition(AppointmentStatus),

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_date_round_trips_wire_format() {
        let date: SlotDate = "5_6_2026".parse().unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2026, 6, 5).unwrap());
        assert_eq!(date.to_string(), "5_6_2026");

        let padded: SlotDate = "05_06_2026".parse().unwrap();
        assert_eq!(padded, date);
    }

    #[test]
    fn slot_date_rejects_garbage() {
        assert!("2026-06-05".parse::<SlotDate>().is_err());
        assert!("5_6".parse::<SlotDate>().is_err());
        assert!("32_1_2026".parse::<SlotDate>().is_err());
        assert!("5_13_2026".parse::<SlotDate>().is_err());
        assert!("a_b_c".parse::<SlotDate>().is_err());
    }

    #[test]
    fn time_label_canonicalizes_and_validates() {
        let label: TimeLabel = "1:00 PM".parse().unwrap();
        assert_eq!(label.as_str(), "01:00 PM");
        assert_eq!("01:00 PM".parse::<TimeLabel>().unwrap(), label);

        assert!("25:00 PM".parse::<TimeLabel>().is_err());
        assert!("13:00".parse::<TimeLabel>().is_err());
        assert!("noonish".parse::<TimeLabel>().is_err());
    }

    #[test]
    fn status_transitions_are_one_way() {
        use AppointmentStatus::*;

        assert!(Pending.can_transition(&Paid));
        assert!(Pending.can_transition(&Cancelled { paid: false }));
        assert!(Pending.can_transition(&Completed { paid: false }));
        assert!(Paid.can_transition(&Completed { paid: true }));
        assert!(Paid.can_transition(&Cancelled { paid: true }));

        // Payment can neither be invented nor cleared by a transition.
        assert!(!Pending.can_transition(&Completed { paid: true }));
        assert!(!Paid.can_transition(&Completed { paid: false }));
        assert!(!Paid.can_transition(&Pending));

        // Terminal states stay terminal.
        for terminal in [Completed { paid: true }, Cancelled { paid: true }] {
            assert!(!terminal.can_transition(&Pending));
            assert!(!terminal.can_transition(&Paid));
            assert!(!terminal.can_transition(&Completed { paid: true }));
            assert!(!terminal.can_transition(&Cancelled { paid: true }));
        }
    }

    #[test]
    fn earnings_follow_payment_and_completion() {
        use AppointmentStatus::*;

        assert!(!Pending.counts_toward_earnings());
        assert!(Paid.counts_toward_earnings());
        assert!(Completed { paid: false }.counts_toward_earnings());
        assert!(Completed { paid: true }.counts_toward_earnings());
        assert!(Cancelled { paid: true }.counts_toward_earnings());
        assert!(!Cancelled { paid: false }.counts_toward_earnings());
    }
}
