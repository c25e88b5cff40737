//! Patient/bed projection used by the dashboard and the patient detail view.

use super::duration::days_hospitalized_as_of;
use super::severity::{classify_occupant, UnscoredOccupantPolicy};
use crate::{Bed, BedStatus, Gender, Patient, SapsScore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ward_types::{BedId, NonEmptyText, PatientId};

/// Bed summary nested in a [`PatientView`]. Its `status` is the computed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BedSummary {
    pub id: BedId,
    pub bed_number: NonEmptyText,
    pub wing: NonEmptyText,
    pub floor: i32,
    pub status: BedStatus,
}

/// Read-only projection of a patient with derived status and length of stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientView {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u32,
    pub gender: Gender,
    pub medical_record_number: NonEmptyText,
    pub main_diagnosis: NonEmptyText,
    pub diagnosis_code: Option<String>,
    pub secondary_diagnoses: Vec<String>,
    pub admission_date: DateTime<Utc>,
    pub discharge_date: Option<DateTime<Utc>>,
    pub days_hospitalized: u32,
    pub saps_score: Option<SapsScore>,
    pub status: BedStatus,
    pub active: bool,
    pub bed: Option<BedSummary>,
}

/// Builds the view for `patient`, optionally placed in `bed`.
///
/// A patient only counts as occupying a bed when it is active and a bed is supplied; anyone
/// else is `available`. The bed's stored status is ignored and replaced by the computed one.
pub fn aggregate(
    patient: &Patient,
    bed: Option<&Bed>,
    policy: UnscoredOccupantPolicy,
    as_of: DateTime<Utc>,
) -> PatientView {
    let status = if patient.active && bed.is_some() {
        classify_occupant(patient.saps_score, policy)
    } else {
        BedStatus::Available
    };

    PatientView {
        id: patient.id,
        name: patient.name.clone(),
        age: patient.age,
        gender: patient.gender,
        medical_record_number: patient.medical_record_number.clone(),
        main_diagnosis: patient.main_diagnosis.clone(),
        diagnosis_code: patient.diagnosis_code.clone(),
        secondary_diagnoses: patient.secondary_diagnoses.clone(),
        admission_date: patient.admission_date,
        discharge_date: patient.discharge_date,
        days_hospitalized: days_hospitalized_as_of(
            patient.admission_date,
            patient.discharge_date,
            as_of,
        ),
        saps_score: patient.saps_score,
        status,
        active: patient.active,
        bed: bed.map(|b| BedSummary {
            id: b.id,
            bed_number: b.bed_number.clone(),
            wing: b.wing.clone(),
            floor: b.floor,
            status,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{admitted_at, bed, patient};
    use chrono::Duration;

    #[test]
    fn nested_bed_status_is_recomputed_not_copied() {
        let mut stored = bed(1, "101");
        stored.status = BedStatus::Stable;
        let p = patient(10, Some(1), Some(70));

        let view = aggregate(&p, Some(&stored), UnscoredOccupantPolicy::Stable, admitted_at());

        assert_eq!(view.status, BedStatus::Critical);
        let summary = view.bed.expect("bed summary");
        assert_eq!(summary.status, BedStatus::Critical);
        assert_eq!(summary.bed_number.as_str(), "101");
    }

    #[test]
    fn patient_without_bed_is_available_even_when_scored() {
        let p = patient(10, None, Some(70));
        let view = aggregate(&p, None, UnscoredOccupantPolicy::Stable, admitted_at());
        assert_eq!(view.status, BedStatus::Available);
        assert!(view.bed.is_none());
    }

    #[test]
    fn unscored_occupant_uses_policy() {
        let b = bed(1, "101");
        let p = patient(10, Some(1), None);

        let stable = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Stable, admitted_at());
        assert_eq!(stable.status, BedStatus::Stable);

        let legacy = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Available, admitted_at());
        assert_eq!(legacy.status, BedStatus::Available);
    }

    #[test]
    fn discharged_patient_is_not_an_occupant() {
        let b = bed(1, "101");
        let mut p = patient(10, Some(1), Some(65));
        p.active = false;
        p.discharge_date = Some(admitted_at() + Duration::days(3));

        let as_of = admitted_at() + Duration::days(9);
        let view = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Stable, as_of);
        assert_eq!(view.status, BedStatus::Available);
        assert_eq!(view.days_hospitalized, 3);
    }

    #[test]
    fn carries_clinical_fields_and_duration() {
        let b = bed(1, "101");
        let p = patient(10, Some(1), Some(45));
        let as_of = admitted_at() + Duration::days(6);
        let view = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Stable, as_of);

        assert_eq!(view.id, p.id);
        assert_eq!(view.main_diagnosis.as_str(), "Septic shock");
        assert_eq!(view.diagnosis_code.as_deref(), Some("A41.9"));
        assert_eq!(view.secondary_diagnoses, vec!["Acute kidney injury".to_string()]);
        assert_eq!(view.days_hospitalized, 6);
        assert_eq!(view.status, BedStatus::Attention);
        assert!(view.active);
    }

    #[test]
    fn aggregating_same_snapshot_twice_is_identical() {
        let b = bed(1, "101");
        let p = patient(10, Some(1), Some(52));
        let as_of = admitted_at() + Duration::hours(50);

        let first = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Stable, as_of);
        let second = aggregate(&p, Some(&b), UnscoredOccupantPolicy::Stable, as_of);
        assert_eq!(first, second);
    }
}
