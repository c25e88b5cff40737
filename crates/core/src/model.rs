//! Ward domain records.
//!
//! These are the records owned by the store. The rules engine only reads them; every mutation
//! goes through [`crate::WardStore`] via [`crate::WardService`].

use crate::WardError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ward_types::{BedId, NonEmptyText, PatientId, PendingTaskId, ProblemId};

/// SAPS severity-of-illness score. Higher is worse; no upper bound is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SapsScore(u32);

impl SapsScore {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SapsScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status shown for a bed on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedStatus {
    Critical,
    Attention,
    Stable,
    Available,
}

impl BedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Critical => "critical",
            BedStatus::Attention => "attention",
            BedStatus::Stable => "stable",
            BedStatus::Available => "available",
        }
    }
}

impl fmt::Display for BedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BedStatus {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(BedStatus::Critical),
            "attention" => Ok(BedStatus::Attention),
            "stable" => Ok(BedStatus::Stable),
            "available" => Ok(BedStatus::Available),
            other => Err(WardError::InvalidInput(format!("unknown bed status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(WardError::InvalidInput(format!("unknown gender: {other}"))),
        }
    }
}

/// A physical bed in the unit.
///
/// `status` is a cache. For an occupied bed the dashboard always recomputes it from the
/// occupant's SAPS score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bed {
    pub id: BedId,
    pub bed_number: NonEmptyText,
    pub wing: NonEmptyText,
    pub floor: i32,
    pub status: BedStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewBed {
    pub bed_number: NonEmptyText,
    pub wing: NonEmptyText,
    pub floor: i32,
    #[serde(default)]
    pub status: Option<BedStatus>,
}

/// A patient admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub medical_record_number: NonEmptyText,
    pub main_diagnosis: NonEmptyText,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Vec<String>,
    pub bed_id: Option<BedId>,
    pub admission_date: DateTime<Utc>,
    pub discharge_date: Option<DateTime<Utc>>,
    pub saps_score: Option<SapsScore>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub medical_record_number: NonEmptyText,
    pub main_diagnosis: NonEmptyText,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Vec<String>,
    pub bed_id: Option<BedId>,
    pub saps_score: Option<SapsScore>,
    /// Admission instant; the store uses the current time when absent.
    pub admitted_at: Option<DateTime<Utc>>,
}

/// Partial update of a patient. `None` leaves the field unchanged.
///
/// Setting `bed_id` to a different bed is a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    pub name: Option<NonEmptyText>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub main_diagnosis: Option<NonEmptyText>,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Option<Vec<String>>,
    pub saps_score: Option<SapsScore>,
    pub bed_id: Option<BedId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub id: ProblemId,
    pub patient_id: PatientId,
    pub description: NonEmptyText,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProblem {
    pub description: NonEmptyText,
    pub is_resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTask {
    pub id: PendingTaskId,
    pub patient_id: PatientId,
    pub description: NonEmptyText,
    pub deadline: Option<DateTime<Utc>>,
    pub responsible: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPendingTask {
    pub description: NonEmptyText,
    pub deadline: Option<DateTime<Utc>>,
    pub responsible: Option<String>,
    pub is_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bed_status_parses_and_displays_lowercase() {
        for status in [
            BedStatus::Critical,
            BedStatus::Attention,
            BedStatus::Stable,
            BedStatus::Available,
        ] {
            assert_eq!(status.to_string().parse::<BedStatus>().unwrap(), status);
        }
        assert!("Critical".parse::<BedStatus>().is_err());
    }

    #[test]
    fn gender_rejects_unknown_values() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        let err = "unknown".parse::<Gender>().expect_err("should reject");
        assert!(matches!(err, WardError::InvalidInput(_)));
    }

    #[test]
    fn new_bed_defaults_status_to_none() {
        let bed: NewBed =
            serde_json::from_str(r#"{"bed_number":"101","wing":"North","floor":1}"#).unwrap();
        assert_eq!(bed.status, None);
        assert_eq!(bed.bed_number.as_str(), "101");
    }
}
